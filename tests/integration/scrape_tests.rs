//! Integration tests for the scrape pipeline
//!
//! These tests use wiremock to serve an index page and item pages, and
//! exercise fetching, caching, classification and aggregation end-to-end.

use std::time::{Duration, Instant};
use tempfile::TempDir;
use unique_ledger::config::{parse_config, Config};
use unique_ledger::crawler::{
    build_http_client, output_path, run_scrape, url_digest, Coordinator, Fetcher, PageCache,
    RetryPolicy,
};
use unique_ledger::FetchError;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration rooted in `dir` and pointing at `base_url`
fn create_test_config(base_url: &str, dir: &TempDir, categories: &[&str]) -> Config {
    let categories = categories
        .iter()
        .map(|c| format!("\"{}\"", c))
        .collect::<Vec<_>>()
        .join(", ");
    let root = dir.path().display();

    let content = format!(
        r#"
base-url = "{base_url}"
categories = [{categories}]
locations = ["Hagga Basin", "Arrakeen"]

[scraper]
concurrency-limit = 2

[cache]
dir = '{root}/cache'

[retry]
retry-limit = 3
backoff-factor = 0.0

[output]
dir = '{root}/output'
image-dir = '{root}/images'
"#
    );

    parse_config(&content).expect("Failed to parse test config")
}

fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

/// Renders an index page linking to the given paths
fn index_page(paths: &[&str]) -> String {
    let links: String = paths
        .iter()
        .map(|p| format!(r#"<li><a href="{}">{}</a></li>"#, p, p.trim_start_matches('/')))
        .collect();
    format!(
        r#"<html><body><div class="CategoryTreeSection"><ul>{}</ul></div>
        <a href="/Not_An_Item">sidebar</a></body></html>"#,
        links
    )
}

/// Renders an item page
fn item_page(title: &str, rows: &[(&str, &str)], category: &str, paragraph: &str, image: Option<&str>) -> String {
    let image_row = image
        .map(|src| {
            format!(
                r#"<tr><td class="infobox-image"><img class="mw-file-element" src="{}"></td></tr>"#,
                src
            )
        })
        .unwrap_or_default();
    let rows: String = rows
        .iter()
        .map(|(label, value)| {
            format!(
                r#"<tr><th class="infobox-label">{}</th><td>{}</td></tr>"#,
                label, value
            )
        })
        .collect();

    format!(
        r#"<html><body>
        <h1><span class="mw-page-title-main">{title}</span></h1>
        <div id="mw-content-text">
            <table class="infobox">{image_row}{rows}</table>
            <p>{paragraph}</p>
            <a href="/Category:{category}" title="Category:{category}">{category}</a>
        </div>
        </body></html>"#
    )
}

#[tokio::test]
async fn test_full_run_writes_category_ordered_output() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/Unique"))
        .respond_with(html_response(index_page(&["/Maula_Pistol", "/Desert_Garb", "/Broken_Item"])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/Maula_Pistol"))
        .respond_with(html_response(item_page(
            "Maula Pistol",
            &[("Fire Mode", "Semi-Auto"), ("Damage Type", "Blade")],
            "Metal",
            "A sword-like sidearm from Imperial Testing Station No. 7 near the Hagga Basin.",
            Some(format!("{}/images/maula.webp", base_url).as_str()),
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/images/maula.webp"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3, 4]))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/Desert_Garb"))
        .respond_with(html_response(item_page(
            "Desert Garb",
            &[("Armor Rating", "12"), ("Garment Type", "Light Armor")],
            "Cloth",
            "Sold in Arrakeen.",
            None,
        )))
        .mount(&mock_server)
        .await;

    // Every attempt fails
    Mock::given(method("GET"))
        .and(path("/Broken_Item"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, &dir, &["Cloth", "Metal", "Fiber", "Unknown"]);
    let out = output_path(&config);

    let stats = run_scrape(config, false).await.expect("Run failed");
    assert_eq!(stats.total_items, 3);
    assert_eq!(stats.placeholders, 1);

    let content = std::fs::read_to_string(&out).expect("Output file missing");
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();

    // Category keys follow the configured order, empty configured buckets included
    let cloth = content.find("\"Cloth\": [").unwrap();
    let metal = content.find("\"Metal\": [").unwrap();
    let fiber = content.find("\"Fiber\": []").unwrap();
    let unknown = content.find("\"Unknown\": [").unwrap();
    assert!(cloth < metal && metal < fiber && fiber < unknown);

    let pistol = &json["Metal"][0];
    assert_eq!(pistol["name"], "Maula Pistol");
    assert_eq!(pistol["types"], serde_json::json!(["Weapon", "Ranged"]));
    assert_eq!(pistol["location"], "Imperial Testing Station No. 7");
    assert_eq!(pistol["tier"], "");
    assert_eq!(pistol["url"], format!("{}/Maula_Pistol", base_url));

    let image = pistol["image"].as_str().unwrap();
    assert!(image.ends_with(&format!(
        "{}.png",
        url_digest(&format!("{}/images/maula.webp", base_url))
    )));
    assert_eq!(std::fs::read(image).unwrap(), vec![1u8, 2, 3, 4]);

    let garb = &json["Cloth"][0];
    assert_eq!(garb["types"], serde_json::json!(["Armor", "Light"]));
    assert_eq!(garb["location"], "Arrakeen");
    assert_eq!(garb["image"], "");

    let broken = &json["Unknown"][0];
    assert_eq!(broken["name"], "Broken_Item");
    assert_eq!(broken["types"], serde_json::json!(["Unknown"]));
    assert_eq!(broken["category"], "Unknown");
    assert_eq!(broken["url"], format!("{}/Broken_Item", base_url));
}

#[tokio::test]
async fn test_index_failure_writes_no_output() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/Unique"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), &dir, &["Metal"]);
    let out = output_path(&config);

    let result = run_scrape(config, false).await;

    assert!(result.is_err());
    assert!(!out.exists());
}

#[tokio::test]
async fn test_unknown_bucket_only_when_populated() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/Ingot"))
        .respond_with(html_response(item_page(
            "Ingot",
            &[("Tool Type", "Compactor")],
            "Metal",
            "",
            None,
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/Missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, &dir, &["Metal", "Unknown"]);
    let coordinator = Coordinator::new(config).await.unwrap();

    let all_good = coordinator
        .process_all(&[format!("{}/Ingot", base_url)])
        .await;
    assert_eq!(all_good.categories(), vec!["Metal"]);
    assert_eq!(all_good.get("Metal").unwrap()[0].types, vec!["Tool", "Compactor"]);

    let one_failed = coordinator
        .process_all(&[format!("{}/Ingot", base_url), format!("{}/Missing", base_url)])
        .await;
    assert_eq!(one_failed.categories(), vec!["Metal", "Unknown"]);
    assert_eq!(one_failed.get("Metal").unwrap().len(), 1);
    assert_eq!(one_failed.get("Unknown").unwrap()[0].name, "Missing");
}

#[tokio::test]
async fn test_test_mode_limits_scheduled_items() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    let paths: Vec<String> = (0..10).map(|i| format!("/Item_{}", i)).collect();
    let path_refs: Vec<&str> = paths.iter().map(String::as_str).collect();

    Mock::given(method("GET"))
        .and(path("/Unique"))
        .respond_with(html_response(index_page(&path_refs)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/Item_\d+$"))
        .respond_with(html_response(item_page("Thing", &[], "Metal", "", None)))
        .expect(3)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base_url, &dir, &["Metal"]);
    config.scraper.test_mode = true;
    config.scraper.test_amount = 3;

    let coordinator = Coordinator::new(config).await.unwrap();
    assert_eq!(coordinator.discover_urls().await.unwrap().len(), 10);

    let results = coordinator.run().await.unwrap();
    assert_eq!(results.total_items(), 3);
}

#[tokio::test]
async fn test_concurrency_limit_bounds_items_in_flight() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path_regex(r"^/Slow_\d+$"))
        .respond_with(
            html_response(item_page("Slow", &[], "Metal", "", None))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(6)
        .mount(&mock_server)
        .await;

    // concurrency-limit = 2
    let config = create_test_config(&base_url, &dir, &["Metal"]);
    let coordinator = Coordinator::new(config).await.unwrap();
    let urls: Vec<String> = (0..6).map(|i| format!("{}/Slow_{}", base_url, i)).collect();

    let start = Instant::now();
    let results = coordinator.process_all(&urls).await;
    let elapsed = start.elapsed();

    assert_eq!(results.total_items(), 6);
    assert_eq!(results.get("Metal").unwrap().len(), 6);
    // Three waves of two: never more than two pages in flight
    assert!(elapsed >= Duration::from_millis(850), "elapsed {:?}", elapsed);
    // But the two slots do overlap
    assert!(elapsed < Duration::from_millis(1750), "elapsed {:?}", elapsed);
}

#[tokio::test]
async fn test_image_failure_yields_placeholder() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/Stillsuit"))
        .respond_with(html_response(item_page(
            "Stillsuit",
            &[("Armor Type", "Suit"), ("Garment Type", "Water Discipline")],
            "Cloth",
            "",
            Some(format!("{}/images/gone.png", base_url).as_str()),
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/images/gone.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, &dir, &["Cloth"]);
    let coordinator = Coordinator::new(config).await.unwrap();

    let results = coordinator
        .process_all(&[format!("{}/Stillsuit", base_url)])
        .await;

    assert_eq!(results.categories(), vec!["Cloth", "Unknown"]);
    assert!(results.get("Cloth").unwrap().is_empty());
    assert_eq!(results.get("Unknown").unwrap()[0].name, "Stillsuit");
}

#[tokio::test]
async fn test_fresh_cache_entry_avoids_second_request() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let url = format!("{}/Cached_Page", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/Cached_Page"))
        .respond_with(html_response(item_page("Cached", &[], "Metal", "", None)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), &dir, &[]);
    let client = build_http_client(&config.scraper).unwrap();
    let fetcher = Fetcher::from_config(client, &config).await.unwrap();

    let first = fetcher.fetch(&url).await.unwrap();
    let second = fetcher.fetch(&url).await.unwrap();

    assert_eq!(first.page_title(), Some("Cached".to_string()));
    assert_eq!(second.page_title(), Some("Cached".to_string()));
}

#[tokio::test]
async fn test_cache_reads_disabled_still_writes() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let url = format!("{}/Uncached_Page", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/Uncached_Page"))
        .respond_with(html_response(item_page("Uncached", &[], "Metal", "", None)))
        .expect(2)
        .mount(&mock_server)
        .await;

    let cache = PageCache::new(dir.path().join("cache"), 3600);
    let fetcher = Fetcher::new(
        reqwest::Client::new(),
        cache.clone(),
        RetryPolicy {
            max_attempts: 1,
            backoff_factor: 0.0,
        },
        false,
    )
    .await
    .unwrap();

    fetcher.fetch(&url).await.unwrap();
    fetcher.fetch(&url).await.unwrap();

    let cached = std::fs::read_to_string(cache.path_for(&url)).unwrap();
    assert!(cached.contains("Uncached"));
}

#[tokio::test]
async fn test_retry_recovers_from_transient_failures() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let url = format!("{}/Flaky", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/Flaky"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/Flaky"))
        .respond_with(html_response(item_page("Flaky", &[], "Metal", "", None)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), &dir, &[]);
    let client = build_http_client(&config.scraper).unwrap();
    let fetcher = Fetcher::from_config(client, &config).await.unwrap();

    let doc = fetcher.fetch(&url).await.unwrap();
    assert_eq!(doc.page_title(), Some("Flaky".to_string()));
}

#[tokio::test]
async fn test_exhausted_retries_return_last_error() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let url = format!("{}/Down", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/Down"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), &dir, &[]);
    let client = build_http_client(&config.scraper).unwrap();
    let fetcher = Fetcher::from_config(client, &config).await.unwrap();

    let result = fetcher.fetch(&url).await;
    assert!(matches!(result, Err(FetchError::Status { status: 500, .. })));
    assert!(!PageCache::new(dir.path().join("cache"), 3600)
        .path_for(&url)
        .exists());
}

#[tokio::test]
async fn test_empty_page_is_not_retried() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let url = format!("{}/Blank", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/Blank"))
        .respond_with(html_response("   ".to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), &dir, &[]);
    let client = build_http_client(&config.scraper).unwrap();
    let fetcher = Fetcher::from_config(client, &config).await.unwrap();

    let result = fetcher.fetch(&url).await;
    assert!(matches!(result, Err(FetchError::Parse { .. })));
}
