//! Markup normalization
//!
//! Fetched edit pages are not guaranteed to be well-formed. The normalizer
//! repairs them into a well-formed document before anything is extracted.

use scraper::{Html, Selector};
use thiserror::Error;

/// Errors raised when markup cannot be repaired
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("document is empty")]
    Empty,

    #[error("document has no recoverable content")]
    NoContent,
}

/// Turns raw fetched bytes into well-formed markup
pub trait Normalizer: Send + Sync {
    fn normalize(&self, raw: &[u8]) -> Result<String, NormalizeError>;
}

/// Best-effort HTML repair through the html5ever tree builder
///
/// Unclosed elements are closed, stray end tags dropped, and entities
/// resolved; the repaired tree is serialized back to markup. Invalid UTF-8
/// sequences are replaced rather than rejected.
///
/// # Example
///
/// ```
/// use wiki_mirror::crawler::{HtmlNormalizer, Normalizer};
///
/// let html = HtmlNormalizer.normalize(b"<p>unclosed <b>bold").unwrap();
/// assert!(html.contains("<b>bold</b></p>"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlNormalizer;

impl Normalizer for HtmlNormalizer {
    fn normalize(&self, raw: &[u8]) -> Result<String, NormalizeError> {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Err(NormalizeError::Empty);
        }

        let text = String::from_utf8_lossy(raw);
        let document = Html::parse_document(&text);
        let root = document.root_element();

        let has_elements = Selector::parse("head *, body *")
            .map(|selector| root.select(&selector).next().is_some())
            .unwrap_or(false);
        let has_text = root.text().any(|t| !t.trim().is_empty());
        if !has_elements && !has_text {
            return Err(NormalizeError::NoContent);
        }

        Ok(root.html())
    }
}
