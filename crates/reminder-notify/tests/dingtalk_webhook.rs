//! DingTalk robot webhook behaviour against a mock server.

use reminder_notify::{DingTalkProvider, NotificationProvider, NotifyError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> DingTalkProvider {
    DingTalkProvider::new("robot-token", reqwest::Client::new())
        .with_webhook(format!("{}/robot/send", server.uri()))
}

fn mentions() -> Vec<String> {
    vec!["13800000001".to_string()]
}

#[tokio::test]
async fn test_posts_markdown_with_mentions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/robot/send"))
        .and(query_param("access_token", "robot-token"))
        .and(body_partial_json(json!({
            "msgtype": "markdown",
            "markdown": {"title": "Daily"},
            "at": {"atMobiles": ["13800000001"], "isAtAll": false}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"errcode": 0, "errmsg": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    provider(&server)
        .send_markdown("Daily", "# Daily\n---\n", &mentions())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_nonzero_errcode_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"errcode": 310000, "errmsg": "sign not match"})),
        )
        .mount(&server)
        .await;

    let err = provider(&server)
        .send_markdown("Daily", "# Daily", &[])
        .await
        .unwrap_err();

    match err {
        NotifyError::Rejected { code, message } => {
            assert_eq!(code, 310000);
            assert_eq!(message, "sign not match");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_is_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = provider(&server)
        .send_markdown("Daily", "# Daily", &[])
        .await
        .unwrap_err();

    assert!(matches!(err, NotifyError::Http(_)));
}

#[tokio::test]
async fn test_signed_request_carries_timestamp_and_sign() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"errcode": 0})))
        .mount(&server)
        .await;

    provider(&server)
        .with_secret("SEC123")
        .send_markdown("Daily", "# Daily", &[])
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let query: Vec<(String, String)> = requests[0]
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let timestamp = query
        .iter()
        .find(|(k, _)| k == "timestamp")
        .map(|(_, v)| v.parse::<i64>().unwrap())
        .unwrap();
    let sign = query.iter().find(|(k, _)| k == "sign").map(|(_, v)| v.clone()).unwrap();
    assert_eq!(sign, DingTalkProvider::sign("SEC123", timestamp));
}
