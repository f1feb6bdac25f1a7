use crate::extract::scan::find_between;
use crate::extract::is_unlinkable;
use std::collections::BTreeSet;

/// Extracts `[[target|text]]` link targets from wiki source
///
/// The target is the first `|`-separated field. Targets holding template
/// braces, section anchors, disambiguators or inline HTML are skipped.
///
/// # Example
///
/// ```
/// use wiki_mirror::extract::extract_bracket_links;
///
/// let links = extract_bracket_links(
///     "See [[cpp/language/new]] and [[c/language/goto|goto]] and [[#anchor]]",
/// );
/// assert_eq!(links.len(), 2);
/// assert!(links.contains("cpp/language/new"));
/// assert!(links.contains("c/language/goto"));
/// ```
pub fn extract_bracket_links(source: &str) -> BTreeSet<String> {
    find_between(source, "[[", "]]")
        .filter_map(|fragment| {
            let target = fragment.split('|').next()?;
            if is_unlinkable(target) {
                return None;
            }
            let target = target.trim();
            (!target.is_empty()).then(|| target.to_string())
        })
        .collect()
}
