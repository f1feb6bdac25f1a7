/// Identifier prefixes that are never crawled
///
/// Discussion and user namespaces, file namespaces, and the interlanguage
/// prefixes that point at non-English editions of the wiki.
pub const DEFAULT_EXCLUDED_PREFIXES: &[&str] = &[
    // Discussion namespaces
    "Talk:",
    "Template talk:",
    "Template_talk:",
    "Help talk:",
    "Help_talk:",
    "Cppreference talk:",
    "Cppreference_talk:",
    // User namespaces
    "User:",
    "User talk:",
    "User_talk:",
    // File namespaces
    "File:",
    "File talk:",
    "File_talk:",
    "Image:",
    "Media:",
    // Other language editions
    "ar:",
    "cs:",
    "de:",
    "el:",
    "es:",
    "fa:",
    "fi:",
    "fr:",
    "hu:",
    "it:",
    "ja:",
    "ko:",
    "nl:",
    "pl:",
    "pt:",
    "ru:",
    "sv:",
    "tr:",
    "vi:",
    "zh:",
];

/// Deny-list of identifier prefixes
///
/// # Examples
///
/// ```
/// use wiki_mirror::page::ExclusionRules;
///
/// let rules = ExclusionRules::default();
/// assert!(rules.is_excluded("Talk:Main_Page"));
/// assert!(rules.is_excluded("ru:cpp/language"));
/// assert!(!rules.is_excluded("cpp/language/noreturn"));
/// ```
#[derive(Debug, Clone)]
pub struct ExclusionRules {
    prefixes: Vec<String>,
}

impl ExclusionRules {
    /// Built-in prefixes plus the given extra ones
    pub fn with_extra(extra: &[String]) -> Self {
        let prefixes = DEFAULT_EXCLUDED_PREFIXES
            .iter()
            .map(|p| p.to_string())
            .chain(extra.iter().cloned())
            .collect();
        Self { prefixes }
    }

    /// Returns true if the identifier must never be fetched
    ///
    /// Blank identifiers are always excluded.
    pub fn is_excluded(&self, identifier: &str) -> bool {
        if identifier.trim().is_empty() {
            return true;
        }
        self.prefixes
            .iter()
            .any(|prefix| identifier.starts_with(prefix.as_str()))
    }
}

impl Default for ExclusionRules {
    fn default() -> Self {
        Self::with_extra(&[])
    }
}
