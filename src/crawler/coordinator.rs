//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the fixed-point crawl loop, including:
//! - Resolving identifiers from the store or by fetching
//! - Concurrent fetching with sequential, ordered commits
//! - Sweeping every resolved page's references until nothing new resolves
//! - Recording the run in the store

use crate::config::Config;
use crate::crawler::{
    build_http_client, FetchError, Fetcher, HtmlNormalizer, HttpFetcher, Normalizer,
};
use crate::extract::{ContentSource, ExtractionStrategy};
use crate::page::{EditPage, ExclusionRules, Page};
use crate::state::{CrawlContext, CrawlReport, PageOrigin};
use crate::storage::{open_storage, PageStore, StoredPage};
use crate::url::{EditUrlBuilder, PageUrl, RenderedUrlBuilder};
use crate::{MirrorError, PageError};
use futures::stream::{self, StreamExt};
use std::collections::BTreeSet;
use std::path::Path;

/// Main crawler structure
///
/// Owns the page store for the duration of a run, so commits are never
/// interleaved with lookups of the same identifier.
pub struct Crawler<F, N, S> {
    fetcher: F,
    normalizer: N,
    storage: S,
    urls: Box<dyn PageUrl>,
    template_urls: Option<Box<dyn PageUrl>>,
    strategy: ExtractionStrategy,
    exclusions: ExclusionRules,
    max_concurrent_fetches: usize,
}

impl<F, N, S> Crawler<F, N, S>
where
    F: Fetcher,
    N: Normalizer,
    S: PageStore,
{
    /// Creates a crawler with the default exclusion rules and one fetch at a time
    ///
    /// `urls` maps an identifier to the page whose content the strategy
    /// reads: the edit page for source strategies, the rendered article for
    /// anchors.
    pub fn new(
        fetcher: F,
        normalizer: N,
        storage: S,
        urls: impl PageUrl + 'static,
        strategy: ExtractionStrategy,
    ) -> Self {
        Self {
            fetcher,
            normalizer,
            storage,
            urls: Box::new(urls),
            template_urls: None,
            strategy,
            exclusions: ExclusionRules::default(),
            max_concurrent_fetches: 1,
        }
    }

    pub fn with_exclusions(mut self, exclusions: ExclusionRules) -> Self {
        self.exclusions = exclusions;
        self
    }

    pub fn with_max_concurrent_fetches(mut self, limit: usize) -> Self {
        self.max_concurrent_fetches = limit.max(1);
        self
    }

    /// Reads template lists from a second page when content is rendered
    ///
    /// Rendered articles carry no template list, so the anchors strategy
    /// takes it from the edit page. Source strategies read both from the
    /// same page and ignore this.
    pub fn with_template_urls(mut self, urls: impl PageUrl + 'static) -> Self {
        self.template_urls = Some(Box::new(urls));
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Crawls outward from `start_page` until no sweep resolves anything new
    ///
    /// Individual page failures are logged and recorded in the returned
    /// context; they never abort the crawl.
    ///
    /// # Arguments
    ///
    /// * `start_page` - Identifier of the first page to resolve
    ///
    /// # Returns
    ///
    /// The context holding every page resolved during this run
    pub async fn crawl(&mut self, start_page: &str) -> CrawlContext {
        let mut ctx = CrawlContext::new();
        tracing::info!(
            "Starting crawl from {} with {} extraction",
            start_page,
            self.strategy.name()
        );

        self.process(&mut ctx, start_page).await;

        loop {
            let before = ctx.resolved_count();
            let pending = ctx.pending_references();
            self.process_batch(&mut ctx, pending).await;
            ctx.finish_sweep();

            let counts = ctx.counts();
            tracing::info!(
                "Sweep {}: {} pages resolved ({} loaded, {} fetched, {} failed)",
                ctx.sweeps(),
                ctx.resolved_count(),
                counts.loaded,
                counts.fetched,
                counts.failed
            );

            if ctx.resolved_count() == before {
                break;
            }
        }

        tracing::info!("Crawl reached a fixed point");
        ctx
    }

    /// Resolves a single identifier
    ///
    /// Does nothing if the identifier is excluded, already resolved, or has
    /// already failed in this run.
    pub async fn process(&mut self, ctx: &mut CrawlContext, identifier: &str) {
        self.process_batch(ctx, std::iter::once(identifier.to_string()))
            .await;
    }

    /// Resolves a batch of identifiers
    ///
    /// Store hits are resolved immediately. Misses are fetched concurrently,
    /// then committed one at a time in identifier order; a page is marked
    /// resolved only after its commit succeeded.
    pub async fn process_batch<I>(&mut self, ctx: &mut CrawlContext, identifiers: I)
    where
        I: IntoIterator<Item = String>,
    {
        let candidates: BTreeSet<String> = identifiers.into_iter().collect();
        let mut misses = Vec::new();

        for identifier in candidates {
            if ctx.is_settled(&identifier) {
                continue;
            }
            if self.exclusions.is_excluded(&identifier) {
                tracing::debug!("Skipping excluded page {:?}", identifier);
                ctx.mark_excluded(identifier);
                continue;
            }

            match self.storage.load_page(&identifier) {
                Ok(Some(stored)) => {
                    tracing::debug!("Loaded {} from store", identifier);
                    let page = self.page_from_store(stored);
                    ctx.resolve(page, PageOrigin::Store);
                }
                Ok(None) => misses.push(identifier),
                Err(e) => {
                    tracing::warn!("Failed to load {} from store: {}", identifier, e);
                    ctx.record_failure(identifier, e.into());
                }
            }
        }

        if misses.is_empty() {
            return;
        }

        let fetched = self.fetch_all(misses).await;
        for (identifier, result) in fetched {
            let committed = result.and_then(|page| {
                self.storage
                    .commit_page(&page.identifier, &page.content, &page.templates)?;
                Ok(page)
            });

            match committed {
                Ok(page) => ctx.resolve(page, PageOrigin::Fetched),
                Err(e) => {
                    tracing::warn!("Failed to process {}: {}", identifier, e);
                    ctx.record_failure(identifier, e);
                }
            }
        }
    }

    /// Fetches and parses pages concurrently, returning results sorted by identifier
    async fn fetch_all(&self, identifiers: Vec<String>) -> Vec<(String, Result<Page, PageError>)> {
        let mut results: Vec<_> = stream::iter(identifiers)
            .map(|identifier| async move {
                let result = self.fetch_page(&identifier).await;
                (identifier, result)
            })
            .buffer_unordered(self.max_concurrent_fetches)
            .collect()
            .await;

        results.sort_by(|a, b| a.0.cmp(&b.0));
        results
    }

    async fn fetch_page(&self, identifier: &str) -> Result<Page, PageError> {
        tracing::info!("Fetching {}", identifier);
        let markup = self.fetch_markup(self.urls.page_url(identifier)).await?;

        let (content, templates) = match self.strategy.content_source() {
            ContentSource::WikiSource => {
                let mut edit = EditPage::parse(&markup)?;
                (edit.require_source()?, edit.templates)
            }
            ContentSource::Rendered => {
                let templates = match &self.template_urls {
                    Some(urls) => {
                        let edit_markup = self.fetch_markup(urls.page_url(identifier)).await?;
                        EditPage::parse(&edit_markup)?.templates
                    }
                    None => EditPage::parse(&markup)?.templates,
                };
                (markup, templates)
            }
        };
        let links = self.strategy.extract(identifier, &content);

        Ok(Page {
            identifier: identifier.to_string(),
            content,
            links,
            templates,
        })
    }

    /// Fetches a URL and repairs the body into well-formed markup
    async fn fetch_markup(&self, url: String) -> Result<String, PageError> {
        let response = self.fetcher.fetch(&url).await?;
        if !response.is_success() {
            return Err(FetchError::Status {
                url,
                status: response.status,
            }
            .into());
        }
        Ok(self.normalizer.normalize(&response.body)?)
    }

    fn page_from_store(&self, stored: StoredPage) -> Page {
        let links = self.strategy.extract(&stored.identifier, &stored.content);
        Page {
            identifier: stored.identifier,
            content: stored.content,
            links,
            templates: stored.templates,
        }
    }
}

/// Runs a complete crawl described by a configuration
///
/// Opens the store, records the run, crawls from the configured start page
/// over HTTP, and marks the run completed with its final counts.
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `config_hash` - Hash of the configuration file, stored with the run
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl reached its fixed point
/// * `Err(MirrorError)` - The store or HTTP client could not be set up
pub async fn run_crawl(config: &Config, config_hash: &str) -> Result<CrawlReport, MirrorError> {
    let mut storage = open_storage(Path::new(&config.output.database_path))?;
    let strategy = ExtractionStrategy::from_config(&config.crawler);
    let run_id = storage.create_run(config_hash, strategy.name())?;
    tracing::info!("Starting crawl run {}", run_id);

    let client = build_http_client(&config.user_agent)?;
    let edit_urls = EditUrlBuilder::from_config(&config.site)?;
    let exclusions = ExclusionRules::with_extra(&config.crawler.exclude_prefixes);
    let fetcher = HttpFetcher::new(client);

    let crawler = match strategy.content_source() {
        ContentSource::WikiSource => {
            Crawler::new(fetcher, HtmlNormalizer, storage, edit_urls, strategy)
        }
        ContentSource::Rendered => {
            let rendered_urls = RenderedUrlBuilder::from_config(&config.site)?;
            Crawler::new(fetcher, HtmlNormalizer, storage, rendered_urls, strategy)
                .with_template_urls(edit_urls)
        }
    };
    let mut crawler = crawler
        .with_exclusions(exclusions)
        .with_max_concurrent_fetches(config.crawler.max_concurrent_fetches as usize);

    let start_time = std::time::Instant::now();
    let report = crawler.crawl(&config.site.start_page).await.report();

    crawler
        .storage_mut()
        .complete_run(run_id, &report.counts())?;

    tracing::info!(
        "Run {} completed in {:.1}s: {} pages resolved, {} fetched, {} failed",
        run_id,
        start_time.elapsed().as_secs_f64(),
        report.resolved,
        report.fetched,
        report.failed.len()
    );

    Ok(report)
}
