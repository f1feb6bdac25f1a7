//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlContext`: the set of pages resolved during one run, plus the
//!   identifiers that failed or were excluded
//! - `CrawlReport`: the summary handed back when a run finishes

mod context;

pub use context::{CrawlContext, CrawlReport, PageOrigin};
