//! Holiday gate against a mock date-info endpoint.

use reminder_core::{HolidayGate, SkipPolicy};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn gate_for(server: &MockServer) -> HolidayGate {
    HolidayGate::new(
        SkipPolicy::SkippedHoliday,
        format!("{}/today", server.uri()),
        reqwest::Client::new(),
    )
}

#[tokio::test]
async fn test_holiday_skips_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/today"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"isHoliday": true})))
        .expect(1)
        .mount(&server)
        .await;

    assert!(gate_for(&server).await.should_skip().await);
}

#[tokio::test]
async fn test_workday_runs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/today"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"isHoliday": false, "date": "2024-05-06"})),
        )
        .mount(&server)
        .await;

    assert!(!gate_for(&server).await.should_skip().await);
}

#[tokio::test]
async fn test_undecodable_body_fails_open() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    assert!(!gate_for(&server).await.should_skip().await);
}

#[tokio::test]
async fn test_server_error_fails_open() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"isHoliday": true})))
        .mount(&server)
        .await;

    assert!(!gate_for(&server).await.should_skip().await);
}

#[tokio::test]
async fn test_unreachable_endpoint_fails_open() {
    let server = MockServer::start().await;
    let url = format!("{}/today", server.uri());
    drop(server);

    let gate = HolidayGate::new(SkipPolicy::SkippedHoliday, url, reqwest::Client::new());
    assert!(!gate.should_skip().await);
}
