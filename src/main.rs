//! Wiki-Mirror main entry point
//!
//! This is the command-line interface for the Wiki-Mirror crawler.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wiki_mirror::config::{load_config_with_hash, Config, StrategyKind};
use wiki_mirror::crawler::crawl;
use wiki_mirror::output::print_report;
use wiki_mirror::page::DEFAULT_EXCLUDED_PREFIXES;
use wiki_mirror::url::{EditUrlBuilder, PageUrl, RenderedUrlBuilder};

/// Wiki-Mirror: an incremental, resumable wiki crawler
///
/// Wiki-Mirror crawls a wiki outward from a start page, storing each page's
/// content and template usage in SQLite. Pages already stored are never
/// fetched again, so an interrupted mirror resumes where it stopped.
#[derive(Parser, Debug)]
#[command(name = "wiki-mirror")]
#[command(version)]
#[command(about = "An incremental, resumable wiki crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(&config, &config_hash, cli.quiet).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("wiki_mirror=info,warn"),
            1 => EnvFilter::new("wiki_mirror=debug,info"),
            2 => EnvFilter::new("wiki_mirror=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let edit_urls = EditUrlBuilder::from_config(&config.site)?;
    let start_page = &config.site.start_page;

    println!("=== Wiki-Mirror Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Start page: {}", config.site.start_page);
    if config.crawler.strategy == StrategyKind::Anchors {
        let rendered_urls = RenderedUrlBuilder::from_config(&config.site)?;
        println!("  First fetch: {}", rendered_urls.page_url(start_page));
        println!("  Templates from: {}", edit_urls.page_url(start_page));
    } else {
        println!("  First fetch: {}", edit_urls.page_url(start_page));
    }

    println!("\nCrawler Configuration:");
    println!("  Strategy: {:?}", config.crawler.strategy);
    println!("  Anchor prefix: {}", config.crawler.anchor_prefix);
    println!(
        "  Max concurrent fetches: {}",
        config.crawler.max_concurrent_fetches
    );

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    println!(
        "\nExcluded Prefixes ({} built in, {} configured):",
        DEFAULT_EXCLUDED_PREFIXES.len(),
        config.crawler.exclude_prefixes.len()
    );
    for prefix in &config.crawler.exclude_prefixes {
        println!("  - {}", prefix);
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    use std::path::Path;
    use wiki_mirror::output::{load_statistics, print_statistics};
    use wiki_mirror::storage::open_storage;

    println!("Database: {}\n", config.output.database_path);

    let storage = open_storage(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    config_hash: &str,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Mirroring {} from {}",
        config.site.base_url,
        config.site.start_page
    );

    match crawl(config, config_hash).await {
        Ok(report) => {
            tracing::info!("Crawl completed successfully");
            if !quiet {
                print_report(&report);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
