//! Integration tests for the HTTP-backed `StaticPage` and a full scrape over it.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lotscan_core::{Confidence, Tier};
use lotscan_scraper::{
    PageError, PageHandle, Pipeline, PipelineSettings, ReqwestFetcher, Stage, StaticPage,
};

const TEST_UA: &str = "lotscan-test/0.1";

fn test_pipeline() -> Pipeline {
    Pipeline::new(
        Arc::new(ReqwestFetcher::new(TEST_UA).expect("fetcher")),
        None,
        PipelineSettings {
            settle_delay: Duration::ZERO,
            ..PipelineSettings::default()
        },
    )
}

#[tokio::test]
async fn navigate_loads_document_and_follows_redirects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}/inventory", server.uri())),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/inventory"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><head><title>Used</title></head><body>Lot</body></html>"),
        )
        .mount(&server)
        .await;

    let mut page = StaticPage::new(TEST_UA).expect("page");
    page.navigate(&format!("{}/old", server.uri()), Duration::from_secs(5))
        .await
        .expect("navigation");
    assert_eq!(page.title().await.unwrap(), "Used");
    assert_eq!(
        page.current_url().await.unwrap(),
        format!("{}/inventory", server.uri())
    );
}

#[tokio::test]
async fn slow_page_reports_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html></html>")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut page = StaticPage::new(TEST_UA).expect("page");
    let err = page
        .navigate(&server.uri(), Duration::from_millis(200))
        .await
        .unwrap_err();
    assert!(matches!(err, PageError::Timeout { .. }), "got: {err:?}");
}

#[tokio::test]
async fn storefront_page_scrapes_through_catalog_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/collections/used"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><script src="//cdn.shopify.com/theme.js"></script></head>
               <body>Used inventory</body></html>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [{
                "id": 42,
                "title": "2021 Toyota Camry 45,000 miles",
                "handle": "camry",
                "body_html": "<p>VIN: 4T1BF1FK5CU123456</p>",
                "variants": [{"price": "24999.00"}]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut page = StaticPage::new(TEST_UA).expect("page");
    let report = test_pipeline()
        .scrape_with_report(
            &mut page,
            &format!("{}/collections/used", server.uri()),
            Duration::from_secs(5),
        )
        .await;

    assert!(report.result.success, "result: {:?}", report.result);
    assert_eq!(report.result.tier, Tier::Api);
    assert_eq!(report.result.confidence, Confidence::High);
    let camry = &report.result.vehicles[0];
    assert_eq!(camry.vin.as_deref(), Some("4T1BF1FK5CU123456"));
    assert_eq!(
        camry.detail_url.as_deref(),
        Some(format!("{}/products/camry", server.uri()).as_str())
    );
    assert_eq!(report.stages.last(), Some(&Stage::Succeeded));
}

#[tokio::test]
async fn blocked_page_fails_with_access_denied_diagnostics() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_string(
            "<html><head><title>Forbidden</title></head><body>Access Denied</body></html>",
        ))
        .mount(&server)
        .await;

    let mut page = StaticPage::new(TEST_UA).expect("page");
    let report = test_pipeline()
        .scrape_with_report(&mut page, &server.uri(), Duration::from_secs(5))
        .await;

    assert!(!report.result.success);
    assert_eq!(report.result.pages_scraped, 1);
    let diagnostics = report.diagnostics.expect("diagnostics");
    assert!(diagnostics.indicators.access_denied);
    assert_eq!(diagnostics.title, "Forbidden");
}
