//! Integration tests for the scan pipeline
//!
//! These tests use wiremock to stand in for the ranking site and drive the
//! full listing -> review page -> item fragment cycle end-to-end.

use rating_scan::config::Config;
use rating_scan::output::{format_text_listing, Catalog};
use rating_scan::scanner::{scan, Scanner};
use rating_scan::search::parse_keywords;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

/// Matches any request that carries a `ver` query parameter
struct HasVersion;

impl Match for HasVersion {
    fn matches(&self, request: &Request) -> bool {
        request.url.query_pairs().any(|(key, _)| key == "ver")
    }
}

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, pages: u32) -> Config {
    let mut config = Config::from_base_url(base_url);
    config.scan.pages = pages;
    config.scan.concurrency = 4;
    config.http.timeout_secs = 5;
    config.http.retry_limit = 0;
    config.http.retry_base_delay_ms = 1;
    config.http.retry_max_delay_ms = 1;
    config
}

/// Encodes `text` the way the ranking site serves it
fn cp1251(text: &str) -> Vec<u8> {
    let (bytes, _, _) = encoding_rs::WINDOWS_1251.encode(text);
    bytes.into_owned()
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_bytes(cp1251(body))
        .insert_header("content-type", "text/html; charset=windows-1251")
}

fn fragment(items: &[&str]) -> ResponseTemplate {
    let body: String = items
        .iter()
        .map(|name| format!("<items><alt>{}</alt></items>", name))
        .collect();

    ResponseTemplate::new(200)
        .set_body_bytes(cp1251(&format!(
            "<?xml version='1.0' encoding='windows-1251'?><item>{}</item>",
            body
        )))
        .insert_header("content-type", "text/xml")
}

async fn mount_review_page(server: &MockServer, site_id: &str, version: Option<&str>) {
    let script = match version {
        Some(ver) => format!(r#"<script src="/js/item_{}.js?ver={}"></script>"#, site_id, ver),
        None => String::new(),
    };

    Mock::given(method("GET"))
        .and(path(format!("/comm/{}/1.htm", site_id)))
        .respond_with(html(&format!(
            "<html><head>{}</head><body>Reviews</body></html>",
            script
        )))
        .mount(server)
        .await;
}

async fn mount_fragment(
    server: &MockServer,
    site_id: &str,
    version: Option<&str>,
    response: ResponseTemplate,
) {
    let mut mock = Mock::given(method("GET"))
        .and(path("/cgi-bin/js/_item.cgi"))
        .and(query_param("act", "list"))
        .and(query_param("site", site_id));
    if let Some(ver) = version {
        mock = mock.and(query_param("ver", ver));
    }

    mock.respond_with(response).mount(server).await;
}

#[tokio::test]
async fn test_full_scan_single_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r##"<html><body><table>
              <tr><td><b>Драконья гора</b></td>
                  <td><a href="/comm/27190/1.htm"><img src="/i/c.gif"></a></td></tr>
              <tr><td><a href="/comm/27190/1.htm#addcomm">Add review</a></td></tr>
              <tr><td><a href="/comm/11/1.htm">Quiet Meadow</a></td></tr>
            </table></body></html>"##,
        ))
        .mount(&server)
        .await;

    mount_review_page(&server, "27190", Some("2040")).await;
    mount_fragment(&server, "27190", Some("2040"), fragment(&["Нектар", "Fog"])).await;

    mount_review_page(&server, "11", None).await;
    mount_fragment(&server, "11", None, fragment(&[])).await;

    let config = create_test_config(&server.uri(), 1);
    let pages = scan(&config).await.expect("scan runs");

    assert_eq!(pages.len(), 1);
    let sites = &pages[0].sites;
    assert_eq!(sites.len(), 2);

    assert_eq!(sites[0].id(), "27190");
    assert_eq!(sites[0].site.name, "Драконья гора");
    assert!(sites[0].has_items);
    assert_eq!(sites[0].item_names(), vec!["Нектар", "Fog"]);
    assert_eq!(sites[0].items[1].id, "27190-2");

    assert_eq!(sites[1].id(), "11");
    assert_eq!(sites[1].site.name, "Quiet Meadow");
    assert!(!sites[1].has_items);
    assert!(sites[1].items.is_empty());
}

#[tokio::test]
async fn test_falls_back_to_unqualified_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/comm/5/1.htm">Five</a>"#))
        .mount(&server)
        .await;

    mount_review_page(&server, "5", Some("99")).await;
    // The versioned mock is mounted first, so it wins whenever `ver` is present
    mount_fragment(
        &server,
        "5",
        Some("99"),
        ResponseTemplate::new(200).set_body_string("  \n"),
    )
    .await;
    mount_fragment(&server, "5", None, fragment(&["Flax"])).await;

    let pages = scan(&create_test_config(&server.uri(), 1))
        .await
        .expect("scan runs");

    assert_eq!(pages[0].sites[0].item_names(), vec!["Flax"]);
}

#[tokio::test]
async fn test_without_version_token_only_bare_endpoint_is_used() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/comm/6/1.htm">Six</a>"#))
        .mount(&server)
        .await;

    mount_review_page(&server, "6", None).await;

    Mock::given(method("GET"))
        .and(path("/cgi-bin/js/_item.cgi"))
        .and(HasVersion)
        .respond_with(fragment(&["Wrong endpoint"]))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cgi-bin/js/_item.cgi"))
        .and(query_param("act", "list"))
        .and(query_param("site", "6"))
        .and(query_param("page", "1"))
        .respond_with(fragment(&["Meadow patch"]))
        .expect(1)
        .mount(&server)
        .await;

    let pages = scan(&create_test_config(&server.uri(), 1))
        .await
        .expect("scan runs");

    assert_eq!(pages[0].sites[0].item_names(), vec!["Meadow patch"]);
}

#[tokio::test]
async fn test_unreachable_listing_page_yields_empty_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let pages = scan(&create_test_config(&server.uri(), 1))
        .await
        .expect("scan runs");

    assert_eq!(pages.len(), 1);
    assert!(pages[0].sites.is_empty());
}

#[tokio::test]
async fn test_failing_site_does_not_sink_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<a href="/comm/1/1.htm">One</a><a href="/comm/2/1.htm">Two</a>"#,
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/comm/1/1.htm"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    mount_review_page(&server, "2", Some("7")).await;
    mount_fragment(&server, "2", Some("7"), fragment(&["Banana"])).await;

    let pages = scan(&create_test_config(&server.uri(), 1))
        .await
        .expect("scan runs");
    let sites = &pages[0].sites;

    assert_eq!(sites.len(), 2);
    assert_eq!(sites[0].id(), "1");
    assert!(!sites[0].has_items);
    assert_eq!(sites[1].item_names(), vec!["Banana"]);
}

#[tokio::test]
async fn test_multi_page_scan_and_catalog() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/comm/1/1.htm">One</a>"#))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/p2.html"))
        .respond_with(html(
            r#"<a href="/comm/1/1.htm">One again</a><a href="/comm/3/1.htm">Three</a>"#,
        ))
        .mount(&server)
        .await;

    mount_review_page(&server, "1", Some("10")).await;
    mount_fragment(&server, "1", Some("10"), fragment(&["Fog"])).await;
    mount_review_page(&server, "3", Some("30")).await;
    mount_fragment(&server, "3", Some("30"), fragment(&["Мёд", "Flax"])).await;

    let pages = scan(&create_test_config(&server.uri(), 2))
        .await
        .expect("scan runs");

    let page_numbers: Vec<u32> = pages.iter().map(|p| p.page).collect();
    assert_eq!(page_numbers, vec![1, 2]);
    assert_eq!(pages[1].sites.len(), 2);

    let catalog = Catalog::from_pages(&pages);
    assert_eq!(catalog.entries.len(), 2);
    assert_eq!(catalog.entries[0].page, 1);
    assert_eq!(catalog.entries[1].site_id, "3");
    assert_eq!(catalog.summary.total_items, 3);

    let listing = format_text_listing(&catalog);
    assert!(listing.contains(&format!("1. {}/comm/1/1.htm — Fog", server.uri())));
    assert!(listing.contains(&format!("2. {}/comm/3/1.htm — Мёд, Flax", server.uri())));

    let found = Catalog::search(&pages, &parse_keywords("мед"));
    assert_eq!(found.entries.len(), 1);
    assert_eq!(found.entries[0].items, vec!["Мёд"]);
}

#[tokio::test]
async fn test_scan_one_site() {
    let server = MockServer::start().await;

    mount_review_page(&server, "42", Some("1")).await;
    mount_fragment(&server, "42", Some("1"), fragment(&["Nectar"])).await;

    let config = create_test_config(&server.uri(), 1);
    let scanner = Scanner::from_config(&config).expect("scanner builds");

    let site = rating_scan::Site::new(
        "42",
        "Answer",
        format!("{}/comm/42/1.htm", server.uri()),
    );
    let enriched = scanner.scan_one_site(&site).await;

    assert!(enriched.has_items);
    assert_eq!(enriched.item_names(), vec!["Nectar"]);
}
