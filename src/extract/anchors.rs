use scraper::{Html, Selector};
use std::collections::BTreeSet;

/// Extracts page identifiers from hyperlinks in normalized markup
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` whose href starts with `prefix`
///
/// **Transform:**
/// - the prefix is stripped
/// - everything from the first `#` on is dropped
///
/// **Exclude:**
/// - hrefs outside the prefix (absolute URLs, `index.php` actions, mailto)
/// - hrefs that are empty once the prefix and fragment are removed
///
/// # Example
///
/// ```
/// use wiki_mirror::extract::extract_anchor_links;
///
/// let html = r##"<html><body><a href="/w/cpp/language/new#Syntax">new</a></body></html>"##;
/// let links = extract_anchor_links(html, "/w/");
/// assert!(links.contains("cpp/language/new"));
/// ```
pub fn extract_anchor_links(markup: &str, prefix: &str) -> BTreeSet<String> {
    let document = Html::parse_document(markup);
    let mut links = BTreeSet::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Some(rest) = href.strip_prefix(prefix) else {
                continue;
            };
            let identifier = rest.split('#').next().unwrap_or_default();
            if !identifier.is_empty() {
                links.insert(identifier.to_string());
            }
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_prefixed_links_are_extracted() {
        let html = r#"<html><body>
            <a href="/w/cpp/language/new">new</a>
            <a href="/w/c/language/goto">goto</a>
        </body></html>"#;
        assert_eq!(
            extract_anchor_links(html, "/w/"),
            set(&["cpp/language/new", "c/language/goto"])
        );
    }

    #[test]
    fn test_fragment_is_truncated() {
        let html = r##"<html><body><a href="/w/cpp/language/new#Syntax">x</a><a href="/w/#top">top</a></body></html>"##;
        assert_eq!(extract_anchor_links(html, "/w/"), set(&["cpp/language/new"]));
    }

    #[test]
    fn test_other_hrefs_are_ignored() {
        let html = r#"<html><body>
            <a href="https://en.cppreference.com/w/cpp">absolute</a>
            <a href="/mwiki/index.php?title=cpp&amp;action=edit">edit</a>
            <a href="mailto:admin@example.com">mail</a>
            <a name="anchor-only">no href</a>
        </body></html>"#;
        assert!(extract_anchor_links(html, "/w/").is_empty());
    }

    #[test]
    fn test_custom_prefix() {
        let html = r#"<html><body><a href="/w/cpp/io">io</a><a href="/w/c/io">c io</a></body></html>"#;
        assert_eq!(extract_anchor_links(html, "/w/c/"), set(&["io"]));
    }

    #[test]
    fn test_duplicates_collapse() {
        let html = r#"<html><body><a href="/w/cpp">a</a><a href="/w/cpp#x">b</a></body></html>"#;
        assert_eq!(extract_anchor_links(html, "/w/"), set(&["cpp"]));
    }
}
