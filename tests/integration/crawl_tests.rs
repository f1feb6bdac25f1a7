//! Integration tests for the crawler
//!
//! These tests use wiremock to serve wiki edit and article pages and run the
//! full crawl cycle end-to-end against a SQLite file.

use std::collections::BTreeSet;
use tempfile::TempDir;
use wiki_mirror::config::{
    Config, CrawlerConfig, OutputConfig, SiteConfig, StrategyKind, UserAgentConfig,
};
use wiki_mirror::crawler::run_crawl;
use wiki_mirror::storage::{PageStore, RunStatus, SqliteStorage};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INDEX_PATH: &str = "/mwiki/index.php";

/// Creates a test configuration pointing at the mock wiki
fn create_test_config(base_url: &str, db_path: &str, strategy: StrategyKind) -> Config {
    Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
            edit_path: "mwiki".to_string(),
            page_path: "w".to_string(),
            start_page: "Main_Page".to_string(),
        },
        crawler: CrawlerConfig {
            strategy,
            anchor_prefix: "/w/".to_string(),
            max_concurrent_fetches: 4,
            exclude_prefixes: vec![],
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            database_path: db_path.to_string(),
        },
    }
}

/// Renders an edit page the way the wiki serves it
fn edit_page(title: &str, source: &str, templates: &[&str]) -> String {
    let items: String = templates
        .iter()
        .map(|t| format!(r#"<li><a href="/w/{t}" title="{t}">{t}</a> (<a href="/mwiki/index.php?title={t}&amp;action=edit">edit</a>)</li>"#))
        .collect();
    format!(
        r#"<!DOCTYPE html>
<html><head><title>Editing {title}</title></head><body>
<div id="content"><h1>Editing {title}</h1>
<form id="editform"><textarea name="wpTextbox1" rows="25">{source}</textarea></form>
<div class="templatesUsed"><p>Templates used on this page:</p><ul>{items}</ul></div>
</div></body></html>"#
    )
}

/// Mounts an edit page for `title`, expecting exactly `expected` requests
async fn mount_page(
    server: &MockServer,
    title: &str,
    source: &str,
    templates: &[&str],
    expected: u64,
) {
    Mock::given(method("GET"))
        .and(path(INDEX_PATH))
        .and(query_param("title", title))
        .and(query_param("action", "edit"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(edit_page(title, source, templates))
                .insert_header("content-type", "text/html; charset=UTF-8"),
        )
        .expect(expected)
        .mount(server)
        .await;
}

/// Mounts a rendered article at `/w/<title>`
async fn mount_rendered(server: &MockServer, title: &str, body: &str, expected: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/w/{title}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=UTF-8"),
        )
        .expect(expected)
        .mount(server)
        .await;
}

/// Every stored identifier with its template edges
fn store_snapshot(storage: &SqliteStorage) -> Vec<(String, BTreeSet<String>)> {
    storage
        .page_identifiers()
        .unwrap()
        .into_iter()
        .map(|id| {
            let templates = storage.get_templates(&id).unwrap();
            (id, templates)
        })
        .collect()
}

async fn mount_wiki(server: &MockServer, expected: u64) {
    mount_page(
        server,
        "Main_Page",
        "Welcome. See [[cpp|C++ reference]] and [[c]].\n[[Talk:Main_Page]] [[ru:Main_Page]]",
        &[],
        expected,
    )
    .await;
    mount_page(
        server,
        "cpp",
        "{{dsc begin}}\n{{dsc|cpp/language|Language}}\n{{dsc end}}",
        &["Template:dsc", "Template:dsc begin", "Template:dsc end"],
        expected,
    )
    .await;
    mount_page(server, "c", "[[Main_Page]] [[c]]", &[], expected).await;
    mount_page(
        server,
        "cpp/language",
        "{{attr|noreturn}} [[cpp]]",
        &["Template:attr"],
        expected,
    )
    .await;
    mount_page(
        server,
        "cpp/language/attributes/noreturn",
        "[[cpp/language]]",
        &[],
        expected,
    )
    .await;
    for template in ["Template:dsc", "Template:dsc begin", "Template:dsc end", "Template:attr"] {
        mount_page(server, template, "<includeonly>x</includeonly>", &[], expected).await;
    }
}

#[tokio::test]
async fn test_full_crawl_templates_strategy() {
    let mock_server = MockServer::start().await;
    mount_wiki(&mock_server, 1).await;

    // Excluded pages must never be requested
    Mock::given(method("GET"))
        .and(path(INDEX_PATH))
        .and(query_param("title", "Talk:Main_Page"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("mirror.db");
    let config = create_test_config(
        &mock_server.uri(),
        db_path.to_str().unwrap(),
        StrategyKind::Templates,
    );

    let report = run_crawl(&config, "test-hash").await.unwrap();

    assert_eq!(report.resolved, 9);
    assert_eq!(report.fetched, 9);
    assert_eq!(report.loaded, 0);
    assert!(report.failed.is_empty());
    assert_eq!(report.excluded, 2);

    let storage = SqliteStorage::new(&db_path).unwrap();
    assert_eq!(
        storage.page_identifiers().unwrap(),
        vec![
            "Main_Page",
            "Template:attr",
            "Template:dsc",
            "Template:dsc begin",
            "Template:dsc end",
            "c",
            "cpp",
            "cpp/language",
            "cpp/language/attributes/noreturn",
        ]
    );

    let cpp = storage.load_page("cpp").unwrap().unwrap();
    assert!(cpp.content.contains("{{dsc|cpp/language|Language}}"));
    assert_eq!(cpp.templates.len(), 3);
    assert_eq!(storage.count_edges().unwrap(), 4);
    assert_eq!(storage.count_missing_templates().unwrap(), 0);

    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.config_hash, "test-hash");
    assert_eq!(run.strategy, "templates");
    assert_eq!(run.counts.fetched, 9);
}

#[tokio::test]
async fn test_second_run_fetches_nothing() {
    let mock_server = MockServer::start().await;
    // Each page may be requested once across both runs
    mount_wiki(&mock_server, 1).await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("mirror.db");
    let config = create_test_config(
        &mock_server.uri(),
        db_path.to_str().unwrap(),
        StrategyKind::Templates,
    );

    let first = run_crawl(&config, "test-hash").await.unwrap();
    let (before, edges_before) = {
        let storage = SqliteStorage::new(&db_path).unwrap();
        (store_snapshot(&storage), storage.count_edges().unwrap())
    };

    let second = run_crawl(&config, "test-hash").await.unwrap();

    assert_eq!(second.fetched, 0);
    assert_eq!(second.loaded as usize, first.resolved);
    assert_eq!(second.resolved, first.resolved);

    let storage = SqliteStorage::new(&db_path).unwrap();
    assert_eq!(before.len(), 9);
    assert_eq!(store_snapshot(&storage), before);
    assert_eq!(storage.count_edges().unwrap(), edges_before);

    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.counts.loaded, first.fetched);
    assert_eq!(run.counts.fetched, 0);
}

#[tokio::test]
async fn test_failed_page_does_not_stop_crawl() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "Main_Page",
        "[[a]] [[broken]] [[b]]",
        &[],
        1,
    )
    .await;
    mount_page(&mock_server, "a", "[[a/child]]", &[], 1).await;
    mount_page(&mock_server, "b", "[[broken]]", &[], 1).await;
    mount_page(&mock_server, "a/child", "", &[], 1).await;
    Mock::given(method("GET"))
        .and(path(INDEX_PATH))
        .and(query_param("title", "broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal error"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("mirror.db");
    let config = create_test_config(
        &mock_server.uri(),
        db_path.to_str().unwrap(),
        StrategyKind::Brackets,
    );

    let report = run_crawl(&config, "test-hash").await.unwrap();

    assert_eq!(report.resolved, 4);
    assert_eq!(report.failed, vec!["broken".to_string()]);

    let storage = SqliteStorage::new(&db_path).unwrap();
    assert!(storage.contains_page("a/child").unwrap());
    assert!(!storage.contains_page("broken").unwrap());

    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.counts.failed, 1);
}

#[tokio::test]
async fn test_anchors_strategy_follows_rendered_links() {
    let mock_server = MockServer::start().await;

    // Edit pages supply template lists; their sources link nowhere useful
    mount_page(&mock_server, "Main_Page", "[[unrelated]]", &["Template:mark"], 1).await;
    mount_page(&mock_server, "cpp", "", &[], 1).await;
    mount_page(&mock_server, "c", "", &[], 1).await;
    mount_page(&mock_server, "Template:mark", "<includeonly>*</includeonly>", &[], 1).await;

    let main_page = r#"<html><body><div id="content">
<a href="/w/cpp">C++</a> <a href="/w/c#Overview">C</a>
<a href="https://elsewhere.example/w/x">external</a>
<a href="/w/Talk:Main_Page">talk</a>
<a href="/mwiki/index.php?title=Main_Page&amp;action=edit">edit</a>
</div></body></html>"#;
    mount_rendered(&mock_server, "Main_Page", main_page, 1).await;
    for title in ["cpp", "c"] {
        mount_rendered(
            &mock_server,
            title,
            "<html><body><p>leaf page<p>unclosed</body></html>",
            1,
        )
        .await;
    }
    mount_rendered(&mock_server, "Template:mark", "<html><body>*</body></html>", 1).await;
    mount_rendered(&mock_server, "Talk:Main_Page", "", 0).await;
    mount_rendered(&mock_server, "unrelated", "", 0).await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("mirror.db");
    let config = create_test_config(
        &mock_server.uri(),
        db_path.to_str().unwrap(),
        StrategyKind::Anchors,
    );

    let report = run_crawl(&config, "test-hash").await.unwrap();

    assert_eq!(report.resolved, 4);
    assert_eq!(report.fetched, 4);
    assert_eq!(report.excluded, 1);
    assert!(report.failed.is_empty());

    let storage = SqliteStorage::new(&db_path).unwrap();
    let main = storage.load_page("Main_Page").unwrap().unwrap();
    assert!(main.content.contains(r#"<a href="/w/cpp">C++</a>"#));
    assert_eq!(
        main.templates,
        BTreeSet::from(["Template:mark".to_string()])
    );

    let leaf = storage.load_page("c").unwrap().unwrap();
    assert!(leaf.content.contains("<p>leaf page</p><p>unclosed</p>"));
    assert_eq!(storage.count_missing_templates().unwrap(), 0);

    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.strategy, "anchors");
}
