//! Page URL construction
//!
//! Maps a page identifier to the URL it is fetched from. Every mapping is
//! deterministic: the same identifier always yields the same URL.
//!
//! - `EditUrlBuilder`: the edit form, carrying wiki source and template list
//! - `RenderedUrlBuilder`: the rendered article

use crate::config::SiteConfig;
use ::url::{ParseError, Url};

/// Maps a page identifier to the URL it is fetched from
pub trait PageUrl: Send + Sync {
    fn page_url(&self, identifier: &str) -> String;
}

/// Builds `index.php?title=<identifier>&action=edit` URLs for a wiki
///
/// # Examples
///
/// ```
/// use wiki_mirror::url::EditUrlBuilder;
///
/// let builder = EditUrlBuilder::new("https://en.cppreference.com", "mwiki").unwrap();
/// assert_eq!(
///     builder.edit_url("cpp/language/noreturn"),
///     "https://en.cppreference.com/mwiki/index.php?title=cpp%2Flanguage%2Fnoreturn&action=edit"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct EditUrlBuilder {
    index_url: Url,
}

impl EditUrlBuilder {
    /// Creates a builder for the wiki at `base_url` serving edits under `edit_path`
    pub fn new(base_url: &str, edit_path: &str) -> Result<Self, ParseError> {
        let base = Url::parse(base_url)?;
        let index_url = base.join(&format!("/{}/index.php", edit_path.trim_matches('/')))?;
        Ok(Self { index_url })
    }

    /// Creates a builder from the `[site]` configuration
    pub fn from_config(site: &SiteConfig) -> Result<Self, ParseError> {
        Self::new(&site.base_url, &site.edit_path)
    }

    /// Returns the edit page URL for `identifier`
    pub fn edit_url(&self, identifier: &str) -> String {
        let mut url = self.index_url.clone();
        url.query_pairs_mut()
            .append_pair("title", identifier)
            .append_pair("action", "edit");
        url.into()
    }
}

impl PageUrl for EditUrlBuilder {
    fn page_url(&self, identifier: &str) -> String {
        self.edit_url(identifier)
    }
}

/// Builds `<base>/<page-path>/<identifier>` URLs for rendered articles
///
/// # Examples
///
/// ```
/// use wiki_mirror::url::{PageUrl, RenderedUrlBuilder};
///
/// let builder = RenderedUrlBuilder::new("https://en.cppreference.com", "w").unwrap();
/// assert_eq!(
///     builder.page_url("cpp/language/noreturn"),
///     "https://en.cppreference.com/w/cpp/language/noreturn"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct RenderedUrlBuilder {
    base: Url,
    page_path: String,
}

impl RenderedUrlBuilder {
    pub fn new(base_url: &str, page_path: &str) -> Result<Self, ParseError> {
        let base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(ParseError::RelativeUrlWithCannotBeABaseBase);
        }
        Ok(Self {
            base,
            page_path: page_path.trim_matches('/').to_string(),
        })
    }

    /// Creates a builder from the `[site]` configuration
    pub fn from_config(site: &SiteConfig) -> Result<Self, ParseError> {
        Self::new(&site.base_url, &site.page_path)
    }
}

impl PageUrl for RenderedUrlBuilder {
    fn page_url(&self, identifier: &str) -> String {
        let mut url = self.base.clone();
        url.set_path(&format!("/{}/{}", self.page_path, identifier));
        url.into()
    }
}
