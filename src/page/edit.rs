//! Edit page parsing
//!
//! A wiki edit page carries two things the crawler needs: the page's wiki
//! source in the edit textarea, and the list of templates the page uses
//! below the edit form.

use scraper::{Html, Selector};
use std::collections::BTreeSet;
use thiserror::Error;

/// Selector for the edit textarea holding the wiki source
pub const SOURCE_SELECTOR: &str = "textarea[name='wpTextbox1']";

/// Selector for the entries of the "templates used on this page" list
const TEMPLATES_SELECTOR: &str = "div.templatesUsed li";

/// Errors raised while interpreting normalized markup
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("expected element `{0}` is missing")]
    MissingElement(&'static str),

    #[error("invalid selector `{selector}`: {message}")]
    Selector {
        selector: &'static str,
        message: String,
    },
}

/// Structure recovered from a fetched edit page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditPage {
    /// Wiki source from the edit textarea, if present
    pub source: Option<String>,

    /// Titles of the templates used by the page
    pub templates: BTreeSet<String>,
}

impl EditPage {
    /// Parses normalized edit page markup
    ///
    /// A missing textarea is not an error here; whether the source is
    /// required depends on the extraction strategy. See
    /// [`EditPage::require_source`].
    ///
    /// # Example
    ///
    /// ```
    /// use wiki_mirror::page::EditPage;
    ///
    /// let html = r#"<html><body>
    ///     <textarea name="wpTextbox1">See [[cpp/language]]</textarea>
    ///     <div class="templatesUsed"><ul><li><a href="/w/Template:mark">Template:mark</a></li></ul></div>
    /// </body></html>"#;
    /// let page = EditPage::parse(html).unwrap();
    /// assert_eq!(page.source.as_deref(), Some("See [[cpp/language]]"));
    /// assert!(page.templates.contains("Template:mark"));
    /// ```
    pub fn parse(markup: &str) -> Result<Self, ParseError> {
        let document = Html::parse_document(markup);

        let source_selector = selector(SOURCE_SELECTOR)?;
        let source = document
            .select(&source_selector)
            .next()
            .map(|element| element.text().collect::<String>());

        let item_selector = selector(TEMPLATES_SELECTOR)?;
        let anchor_selector = selector("a")?;
        let templates = document
            .select(&item_selector)
            .filter_map(|item| item.select(&anchor_selector).next())
            .map(|anchor| anchor.text().collect::<String>().trim().to_string())
            .filter(|title| !title.is_empty())
            .collect();

        Ok(Self { source, templates })
    }

    /// Returns the wiki source, or a parse error if the page had none
    pub fn require_source(&mut self) -> Result<String, ParseError> {
        self.source
            .take()
            .ok_or(ParseError::MissingElement(SOURCE_SELECTOR))
    }
}

fn selector(css: &'static str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|e| ParseError::Selector {
        selector: css,
        message: e.to_string(),
    })
}
