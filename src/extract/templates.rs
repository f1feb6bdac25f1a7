use crate::extract::is_unlinkable;
use crate::extract::scan::find_between;
use std::collections::BTreeSet;

/// Invocation name prefixes whose second argument names a page
pub const LINK_BEARING_PREFIXES: &[&str] = &[
    "dsc", "ltt", "ltf", "lc", "lt", "ls", "tt", "header", "attr",
];

/// Extracts page references from `{{name|target|...}}` invocations
///
/// `identifier` is the page holding the source. It decides the language
/// root for `attr` and `header`, which name a page relative to it:
/// `{{attr|noreturn}}` on a `cpp/...` page refers to
/// `cpp/language/attributes/noreturn`. On pages outside `c/` and `cpp/`
/// those two invocations contribute nothing.
///
/// # Example
///
/// ```
/// use wiki_mirror::extract::extract_template_links;
///
/// let links = extract_template_links("cpp/language/attributes", "{{attr|noreturn}}");
/// assert!(links.contains("cpp/language/attributes/noreturn"));
/// ```
pub fn extract_template_links(identifier: &str, source: &str) -> BTreeSet<String> {
    find_between(source, "{{", "}}")
        .filter_map(|fragment| invocation_target(identifier, fragment))
        .collect()
}

fn invocation_target(identifier: &str, fragment: &str) -> Option<String> {
    let mut fields = fragment.split('|');
    let name = fields.next()?.trim();
    let target = fields.next()?.trim();

    if !LINK_BEARING_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
    {
        return None;
    }

    let target = target.replacen("dsc ", "", 1);
    if is_unlinkable(&target) {
        return None;
    }
    let target = target.trim();
    if target.is_empty() {
        return None;
    }

    match name {
        "attr" => language_root(identifier)
            .map(|lang| format!("{}/language/attributes/{}", lang, target)),
        "header" => language_root(identifier).map(|lang| format!("{}/header/{}", lang, target)),
        _ => Some(target.to_string()),
    }
}

/// The language section a page belongs to
fn language_root(identifier: &str) -> Option<&'static str> {
    if identifier.starts_with("c/") {
        Some("c")
    } else if identifier.starts_with("cpp/") {
        Some("cpp")
    } else {
        None
    }
}
