//! Integration tests for the retrieval pipeline
//!
//! These tests use wiremock to stand in for the procurement portal and
//! exercise fetching, link collection, date extraction and full runs.

use reqwest::header::HeaderMap;
use std::time::{Duration, Instant};
use tender_dates::config::{Config, HttpConfig, OutputConfig, PortalConfig};
use tender_dates::crawler::{
    build_http_client, fetch_with_retries, Coordinator, Portal, RetryPolicy, RunSummary,
    TenderLink,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RESULTS_PATH: &str = "/epz/order/extendedsearch/results.html";
const XML_FORM_PATH: &str = "/epz/order/notice/printForm/viewXml.html";

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, last_page: u32, max_attempts: u32) -> Config {
    Config {
        portal: PortalConfig {
            base_url: base_url.to_string(),
            first_page: 1,
            last_page,
            publish_date_field: "publishDTInEIS".to_string(),
        },
        http: HttpConfig {
            user_agent: "Mozilla/5.0".to_string(),
            request_timeout_secs: 5,
            max_attempts,
            retry_delay_secs: 0,
        },
        output: OutputConfig::default(),
    }
}

fn quick_policy(max_attempts: u32, delay: Duration) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        delay,
        request_timeout: Duration::from_secs(5),
    }
}

fn results_page(numbers: &[&str]) -> String {
    let entries: String = numbers
        .iter()
        .map(|n| {
            format!(
                r#"<div class="registry-entry__header-mid__number">
                    <a href="/epz/order/notice/ea20/view/common-info.html?regNumber={n}" target="_blank">
                        № {n}
                    </a>
                </div>"#
            )
        })
        .collect();
    format!("<html><body><div class=\"search-registry-entrys-block\">{entries}</div></body></html>")
}

fn notice_xml(date: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<export xmlns="http://zakupki.gov.ru/oos/export/1">
    <epNotificationEF2020>
        <commonInfo>
            <purchaseNumber>0001</purchaseNumber>
            <publishDTInEIS>{date}</publishDTInEIS>
        </commonInfo>
    </epNotificationEF2020>
</export>"#
    )
}

async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or(0)
}

#[tokio::test]
async fn test_fetch_gives_up_after_max_attempts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = build_http_client().expect("Failed to build client");
    let delay = Duration::from_millis(100);
    let url = format!("{}/flaky", mock_server.uri());

    let started = Instant::now();
    let page = fetch_with_retries(&client, &url, &HeaderMap::new(), &quick_policy(3, delay)).await;
    let elapsed = started.elapsed();

    assert!(page.is_none());
    assert_eq!(request_count(&mock_server).await, 3);
    // Two pauses between three attempts, none after the last
    assert!(elapsed >= delay * 2, "elapsed {:?}", elapsed);
    assert!(elapsed < delay * 3 + Duration::from_secs(2), "elapsed {:?}", elapsed);
}

#[tokio::test]
async fn test_fetch_success_on_first_attempt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .mount(&mock_server)
        .await;

    let client = build_http_client().expect("Failed to build client");
    let delay = Duration::from_secs(5);
    let url = format!("{}/ok", mock_server.uri());

    let started = Instant::now();
    let page = fetch_with_retries(&client, &url, &HeaderMap::new(), &quick_policy(3, delay))
        .await
        .expect("Expected a response");

    assert_eq!(page.status_code, 200);
    assert_eq!(page.url, url);
    assert_eq!(page.body, "hello");
    assert_eq!(request_count(&mock_server).await, 1);
    assert!(started.elapsed() < delay);
}

#[tokio::test]
async fn test_fetch_recovers_after_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/recovering"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/recovering"))
        .respond_with(ResponseTemplate::new(200).set_body_string("back"))
        .mount(&mock_server)
        .await;

    let client = build_http_client().expect("Failed to build client");
    let url = format!("{}/recovering", mock_server.uri());

    let page = fetch_with_retries(
        &client,
        &url,
        &HeaderMap::new(),
        &quick_policy(3, Duration::ZERO),
    )
    .await
    .expect("Expected the second attempt to succeed");

    assert_eq!(page.body, "back");
    assert_eq!(request_count(&mock_server).await, 2);
}

#[tokio::test]
async fn test_non_200_success_status_is_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/nocontent"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = build_http_client().expect("Failed to build client");
    let url = format!("{}/nocontent", mock_server.uri());

    let page = fetch_with_retries(
        &client,
        &url,
        &HeaderMap::new(),
        &quick_policy(2, Duration::ZERO),
    )
    .await;

    assert!(page.is_none());
    assert_eq!(request_count(&mock_server).await, 2);
}

#[tokio::test]
async fn test_request_timeout_counts_as_failed_attempt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let client = build_http_client().expect("Failed to build client");
    let url = format!("{}/slow", mock_server.uri());
    let policy = RetryPolicy {
        max_attempts: 2,
        delay: Duration::ZERO,
        request_timeout: Duration::from_millis(200),
    };

    let page = fetch_with_retries(&client, &url, &HeaderMap::new(), &policy).await;
    assert!(page.is_none());
}

#[tokio::test]
async fn test_collect_links_from_results_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(query_param("fz44", "on"))
        .and(query_param("pageNumber", "1"))
        .and(header("User-Agent", "Mozilla/5.0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(results_page(&["0123456789012345000001", "0123456789012345000002"]))
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 1, 1);
    let portal = Portal::new(&config).expect("Failed to create portal");

    let links = portal.collect_links(1).await;
    let expected: Vec<String> = ["0123456789012345000001", "0123456789012345000002"]
        .iter()
        .map(|n| {
            format!(
                "{}/epz/order/notice/printForm/view.html?regNumber={}",
                mock_server.uri(),
                n
            )
        })
        .collect();

    assert_eq!(
        links.iter().map(|l| l.to_string()).collect::<Vec<_>>(),
        expected
    );
}

#[tokio::test]
async fn test_collect_links_failed_page_is_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 1, 2);
    let portal = Portal::new(&config).expect("Failed to create portal");

    assert!(portal.collect_links(1).await.is_empty());
    assert_eq!(request_count(&mock_server).await, 2);
}

#[tokio::test]
async fn test_extract_publish_date() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(XML_FORM_PATH))
        .and(query_param("regNumber", "0001"))
        .and(header("User-Agent", "Mozilla/5.0"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(notice_xml("2024-03-01T10:15:00.000+03:00")),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 1, 1);
    let portal = Portal::new(&config).expect("Failed to create portal");
    let link = TenderLink::for_registration_number(&mock_server.uri(), "0001").unwrap();

    let record = portal.extract_publish_date(&link).await;

    assert_eq!(record.link, link);
    assert_eq!(
        record.publish_date.as_deref(),
        Some("2024-03-01T10:15:00.000+03:00")
    );
    assert!(record.published_at().is_some());
}

#[tokio::test]
async fn test_extract_malformed_xml_gives_no_date() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(XML_FORM_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<export><unclosed>"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 1, 3);
    let portal = Portal::new(&config).expect("Failed to create portal");
    let link = TenderLink::for_registration_number(&mock_server.uri(), "0001").unwrap();

    let record = portal.extract_publish_date(&link).await;

    assert_eq!(record.link, link);
    assert_eq!(record.publish_date, None);
    // A parse failure is not retried
    assert_eq!(request_count(&mock_server).await, 1);
}

#[tokio::test]
async fn test_extract_unreachable_form_gives_no_date() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(XML_FORM_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 1, 2);
    let portal = Portal::new(&config).expect("Failed to create portal");
    let link = TenderLink::for_registration_number(&mock_server.uri(), "0001").unwrap();

    let record = portal.extract_publish_date(&link).await;

    assert_eq!(record.publish_date, None);
    assert_eq!(request_count(&mock_server).await, 2);
}

#[tokio::test]
async fn test_full_run_over_two_pages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(query_param("pageNumber", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&["0001", "0002"])))
        .mount(&mock_server)
        .await;

    // Page 2 repeats a tender from page 1
    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(query_param("pageNumber", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&["0002", "0003"])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(XML_FORM_PATH))
        .and(query_param("regNumber", "0001"))
        .respond_with(ResponseTemplate::new(200).set_body_string(notice_xml("2024-01-01")))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(XML_FORM_PATH))
        .and(query_param("regNumber", "0002"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<export><other/></export>"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(XML_FORM_PATH))
        .and(query_param("regNumber", "0003"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 2, 1);
    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");

    let (pages, links) = coordinator.collect_all_links().await;
    assert_eq!(pages, 2);
    assert_eq!(links.len(), 4);
    assert_eq!(links[1], links[2]);

    let records = coordinator.extract_all(&links).await;
    let dates: Vec<Option<&str>> = records.iter().map(|r| r.publish_date.as_deref()).collect();
    assert_eq!(dates, vec![Some("2024-01-01"), None, None, None]);
    assert_eq!(
        records.iter().map(|r| &r.link).collect::<Vec<_>>(),
        links.iter().collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_run_with_dedupe_and_failed_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(query_param("pageNumber", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&["0001", "0001"])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(query_param("pageNumber", "2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(XML_FORM_PATH))
        .and(query_param("regNumber", "0001"))
        .respond_with(ResponseTemplate::new(200).set_body_string(notice_xml("2024-05-05")))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), 2, 1);
    config.output.dedupe_links = true;
    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");

    let summary = coordinator.run().await;

    assert_eq!(
        summary,
        RunSummary {
            pages: 2,
            links: 1,
            dated: 1,
        }
    );
}
