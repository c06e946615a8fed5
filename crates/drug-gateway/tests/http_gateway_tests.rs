//! End-to-end tests of the gateway over real HTTP against a mock server.

use std::time::Duration;

use drug_gateway::transport::USER_AGENT;
use drug_gateway::{
    DrugDatabaseClient, ErrorKind, GatewayConfig, NameSearch, PrescriptionFilter, RetryPolicy,
};
use httpmock::prelude::*;
use serde_json::json;

fn config(base_url: String, retry: RetryPolicy, timeout: Duration) -> GatewayConfig {
    GatewayConfig {
        base_url,
        images_base_url: "http://images.invalid".into(),
        request_timeout: timeout,
        retry,
    }
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(5))
}

#[tokio::test]
async fn test_post_carries_json_headers_and_normalized_body() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/search/name")
            .header("content-type", "application/json")
            .header("accept", "application/json")
            .header("user-agent", USER_AGENT)
            .json_body(json!({
                "name": "Paralen 500",
                "page": 1,
                "pageSize": 20,
                "otcOnly": true
            }));
        then.status(200).json_body(json!({
            "items": [{ "registrationNumber": "020 16 20534 00", "name": "Paralen 500" }],
            "total": 1,
            "page": 1,
            "pageSize": 20
        }));
    });

    let client = DrugDatabaseClient::new(&config(
        server.base_url(),
        fast_retry(),
        Duration::from_secs(5),
    ))
    .unwrap();

    let page = client
        .search_by_name(
            NameSearch::new("  Paralen   500 ").with_prescription(PrescriptionFilter::OtcOnly),
        )
        .await
        .unwrap();

    assert_eq!(page.items[0].registration_number, "020 16 20534 00");
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn test_persistent_503_is_retried_then_surfaced() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/atc/groups");
        then.status(503).body("Service Unavailable");
    });

    let client = DrugDatabaseClient::new(&config(
        server.base_url(),
        fast_retry(),
        Duration::from_secs(5),
    ))
    .unwrap();

    let err = client.atc_groups().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransientServerError);
    assert_eq!(err.details().status, Some(503));
    assert_eq!(err.details().attempt, Some(3));
    assert_eq!(mock.calls(), 3);
}

#[tokio::test]
async fn test_404_is_surfaced_after_one_call() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/medicine/detail");
        then.status(404).json_body(json!({ "error": "not found" }));
    });

    let client = DrugDatabaseClient::new(&config(
        server.base_url(),
        fast_retry(),
        Duration::from_secs(5),
    ))
    .unwrap();

    let err = client.get_drug("020 16 20534 00").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PermanentServerError);
    assert!(err.correlation_id().is_some());
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn test_html_body_is_invalid_encoding() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/packages");
        then.status(200).body("<html>maintenance</html>");
    });

    let client = DrugDatabaseClient::new(&config(
        server.base_url(),
        fast_retry(),
        Duration::from_secs(5),
    ))
    .unwrap();

    let err = client.package_types().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidResponseEncoding);
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/routes");
        then.status(200)
            .delay(Duration::from_secs(2))
            .json_body(json!([]));
    });

    let client = DrugDatabaseClient::new(&config(
        server.base_url(),
        RetryPolicy::no_retry(),
        Duration::from_millis(100),
    ))
    .unwrap();

    let err = client.administration_routes().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(err.retryable());
}

#[tokio::test]
async fn test_refused_connection_is_connection_failure() {
    // Bind then drop a listener to get a port nothing listens on
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let client = DrugDatabaseClient::new(&config(
        format!("http://127.0.0.1:{}", port),
        RetryPolicy::new(2, Duration::from_millis(5)),
        Duration::from_secs(5),
    ))
    .unwrap();

    let err = client.symptom_hierarchy().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConnectionFailure);
    assert_eq!(err.details().attempt, Some(2));
}

#[tokio::test]
async fn test_invalid_input_makes_no_http_call() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST);
        then.status(200).json_body(json!({}));
    });

    let client = DrugDatabaseClient::new(&config(
        server.base_url(),
        fast_retry(),
        Duration::from_secs(5),
    ))
    .unwrap();

    let err = client.get_drug("02016 20534 00").await.unwrap_err();
    assert!(err.is_invalid_input());
    assert_eq!(mock.calls(), 0);
}
