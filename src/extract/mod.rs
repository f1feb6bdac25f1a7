//! Link extraction
//!
//! Turns page content into the set of page identifiers it references. The
//! rules are selected once per crawl through [`ExtractionStrategy`]; the
//! crawler only ever calls [`ExtractionStrategy::extract`].

mod anchors;
mod brackets;
mod scan;
mod templates;

pub use anchors::extract_anchor_links;
pub use brackets::extract_bracket_links;
pub use scan::{find_between, Between};
pub use templates::{extract_template_links, LINK_BEARING_PREFIXES};

use crate::config::{CrawlerConfig, StrategyKind};
use std::collections::BTreeSet;

/// Characters that mark a target as something other than a plain page link
const UNLINKABLE: [char; 4] = ['{', '#', '(', '<'];

fn is_unlinkable(target: &str) -> bool {
    target.contains(&UNLINKABLE[..])
}

/// What a page's stored content consists of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource {
    /// The wiki source from the edit page
    WikiSource,
    /// The whole normalized edit page
    Rendered,
}

/// The link extraction rules applied by a crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// Bracket links only
    Brackets,
    /// Bracket links and link-bearing template invocations
    Templates,
    /// Hyperlinks whose href starts with `prefix`
    Anchors { prefix: String },
}

impl ExtractionStrategy {
    /// Builds the strategy named by the crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Self {
        match config.strategy {
            StrategyKind::Brackets => Self::Brackets,
            StrategyKind::Templates => Self::Templates,
            StrategyKind::Anchors => Self::Anchors {
                prefix: config.anchor_prefix.clone(),
            },
        }
    }

    /// Which content this strategy reads, and therefore which content is stored
    pub fn content_source(&self) -> ContentSource {
        match self {
            Self::Brackets | Self::Templates => ContentSource::WikiSource,
            Self::Anchors { .. } => ContentSource::Rendered,
        }
    }

    /// Extracts the identifiers referenced by `content`
    ///
    /// `identifier` names the page the content belongs to; some template
    /// invocations resolve relative to it.
    pub fn extract(&self, identifier: &str, content: &str) -> BTreeSet<String> {
        match self {
            Self::Brackets => extract_bracket_links(content),
            Self::Templates => {
                let mut links = extract_bracket_links(content);
                links.extend(extract_template_links(identifier, content));
                links
            }
            Self::Anchors { prefix } => extract_anchor_links(content, prefix),
        }
    }

    /// Short name used in logs and run records
    pub fn name(&self) -> &'static str {
        match self {
            Self::Brackets => "brackets",
            Self::Templates => "templates",
            Self::Anchors { .. } => "anchors",
        }
    }
}
