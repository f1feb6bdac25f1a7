use serde::Deserialize;

/// Main configuration structure for Wiki-Mirror
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// The wiki being mirrored
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Scheme and host of the wiki, e.g. `https://en.cppreference.com`
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path segment serving `index.php` for edit pages
    #[serde(rename = "edit-path", default = "default_edit_path")]
    pub edit_path: String,

    /// Path segment serving rendered articles, used by the anchors strategy
    #[serde(rename = "page-path", default = "default_page_path")]
    pub page_path: String,

    /// Page identifier the crawl starts from
    #[serde(rename = "start-page", default = "default_start_page")]
    pub start_page: String,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Which link extraction rules to apply
    #[serde(default)]
    pub strategy: StrategyKind,

    /// Site-relative href prefix recognized by the anchors strategy
    #[serde(rename = "anchor-prefix", default = "default_anchor_prefix")]
    pub anchor_prefix: String,

    /// Maximum number of page fetches in flight at once
    #[serde(
        rename = "max-concurrent-fetches",
        default = "default_max_concurrent_fetches"
    )]
    pub max_concurrent_fetches: u32,

    /// Extra identifier prefixes that are never crawled
    #[serde(rename = "exclude-prefixes", default)]
    pub exclude_prefixes: Vec<String>,
}

/// Link extraction rule set, chosen once per crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// `[[target|text]]` links in the wiki source
    Brackets,
    /// Bracket links plus link-bearing `{{name|target}}` invocations
    #[default]
    Templates,
    /// Hyperlinks in the normalized rendering of the page
    Anchors,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

fn default_edit_path() -> String {
    "mwiki".to_string()
}

fn default_page_path() -> String {
    "w".to_string()
}

fn default_start_page() -> String {
    "Main_Page".to_string()
}

fn default_anchor_prefix() -> String {
    "/w/".to_string()
}

fn default_max_concurrent_fetches() -> u32 {
    4
}
