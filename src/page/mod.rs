//! Wiki pages and page identifier policy
//!
//! # Components
//!
//! - `Page`: a resolved page with its content and outbound references
//! - `ExclusionRules`: identifier prefixes that are never crawled
//! - `EditPage`: the structure recovered from a fetched edit page

mod edit;
mod exclusion;

pub use edit::{EditPage, ParseError};
pub use exclusion::{ExclusionRules, DEFAULT_EXCLUDED_PREFIXES};

use std::collections::BTreeSet;

/// A page resolved during the current run
///
/// Pages are immutable once built: either loaded from the store or freshly
/// fetched and committed. `links` is always recomputed from `content`;
/// `templates` comes from the edit page or from the stored relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// The page identifier, e.g. `cpp/language/noreturn`
    pub identifier: String,

    /// Wiki source or normalized markup, depending on the extraction strategy
    pub content: String,

    /// Page identifiers referenced by links in `content`
    pub links: BTreeSet<String>,

    /// Page identifiers of the templates this page transcludes
    pub templates: BTreeSet<String>,
}

impl Page {
    /// Every identifier this page points at, links first
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.links
            .iter()
            .chain(self.templates.iter())
            .map(String::as_str)
    }
}
