//! Per-run crawl context

use crate::page::Page;
use crate::storage::RunCounts;
use crate::PageError;
use std::collections::{BTreeMap, BTreeSet};

/// Where a resolved page came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOrigin {
    /// Already committed by an earlier run
    Store,
    /// Fetched and committed during this run
    Fetched,
}

/// The in-memory state of one crawl run
///
/// An identifier is resolved at most once per run and stays resolved until
/// the context is dropped. Failed and excluded identifiers are remembered so
/// later sweeps do not retry them.
#[derive(Debug, Default)]
pub struct CrawlContext {
    resolved: BTreeMap<String, Page>,
    failures: BTreeMap<String, PageError>,
    excluded: BTreeSet<String>,
    loaded: u64,
    fetched: u64,
    sweeps: u32,
}

impl CrawlContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_resolved(&self, identifier: &str) -> bool {
        self.resolved.contains_key(identifier)
    }

    pub fn has_failed(&self, identifier: &str) -> bool {
        self.failures.contains_key(identifier)
    }

    pub fn is_excluded(&self, identifier: &str) -> bool {
        self.excluded.contains(identifier)
    }

    /// Returns true if nothing further will be attempted for the identifier
    pub fn is_settled(&self, identifier: &str) -> bool {
        self.is_resolved(identifier) || self.has_failed(identifier) || self.is_excluded(identifier)
    }

    /// Records a page as resolved
    ///
    /// Resolving an identifier twice keeps the first page.
    pub fn resolve(&mut self, page: Page, origin: PageOrigin) {
        if self.resolved.contains_key(&page.identifier) {
            return;
        }
        match origin {
            PageOrigin::Store => self.loaded += 1,
            PageOrigin::Fetched => self.fetched += 1,
        }
        self.resolved.insert(page.identifier.clone(), page);
    }

    pub fn record_failure(&mut self, identifier: String, error: PageError) {
        self.failures.entry(identifier).or_insert(error);
    }

    pub fn mark_excluded(&mut self, identifier: String) {
        self.excluded.insert(identifier);
    }

    pub fn finish_sweep(&mut self) {
        self.sweeps += 1;
    }

    pub fn page(&self, identifier: &str) -> Option<&Page> {
        self.resolved.get(identifier)
    }

    /// Resolved pages in identifier order
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.resolved.values()
    }

    pub fn sweeps(&self) -> u32 {
        self.sweeps
    }

    pub fn resolved_count(&self) -> usize {
        self.resolved.len()
    }

    pub fn failures(&self) -> &BTreeMap<String, PageError> {
        &self.failures
    }

    /// References of resolved pages that have not been settled yet
    pub fn pending_references(&self) -> BTreeSet<String> {
        self.resolved
            .values()
            .flat_map(|page| page.references())
            .filter(|identifier| !self.is_settled(identifier))
            .map(str::to_string)
            .collect()
    }

    pub fn counts(&self) -> RunCounts {
        RunCounts {
            loaded: self.loaded,
            fetched: self.fetched,
            failed: self.failures.len() as u64,
        }
    }

    /// Summarizes the run
    pub fn report(&self) -> CrawlReport {
        CrawlReport {
            resolved: self.resolved.len(),
            loaded: self.loaded,
            fetched: self.fetched,
            failed: self.failures.keys().cloned().collect(),
            excluded: self.excluded.len(),
            sweeps: self.sweeps,
        }
    }
}

/// Summary of a finished crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Pages resolved during the run
    pub resolved: usize,
    /// Pages taken from the store
    pub loaded: u64,
    /// Pages fetched and committed
    pub fetched: u64,
    /// Identifiers that could not be resolved
    pub failed: Vec<String>,
    /// Distinct referenced identifiers that were skipped by exclusion rules
    pub excluded: usize,
    /// Sweeps performed after the start page
    pub sweeps: u32,
}

impl CrawlReport {
    pub fn counts(&self) -> RunCounts {
        RunCounts {
            loaded: self.loaded,
            fetched: self.fetched,
            failed: self.failed.len() as u64,
        }
    }
}
