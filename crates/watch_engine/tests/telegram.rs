use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use watch_engine::{BotApi, BotApiSettings, Notifier, ReqwestBotApi, TelegramError};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "123456:TEST";

fn api(server: &MockServer) -> ReqwestBotApi {
    let mut settings = BotApiSettings::new(TOKEN);
    settings.api_url = server.uri();
    settings.poll_timeout = Duration::from_secs(1);
    settings.poll_slack = Duration::from_secs(2);
    ReqwestBotApi::new(settings).expect("client")
}

#[tokio::test]
async fn first_poll_omits_offset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/bot{TOKEN}/getUpdates")))
        .and(query_param("timeout", "1"))
        .and(query_param_is_missing("offset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": [
                {"update_id": 10, "message": {"message_id": 1, "chat": {"id": 5, "type": "private"}, "text": "hi"}},
                {"update_id": 11}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let updates = api(&server).get_updates(None).await.unwrap();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].update_id, 10);
    assert_eq!(
        updates[0].message.as_ref().and_then(|m| m.text.as_deref()),
        Some("hi")
    );
    assert!(updates[1].message.is_none());
}

#[tokio::test]
async fn later_polls_send_offset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/bot{TOKEN}/getUpdates")))
        .and(query_param("offset", "12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": []})))
        .expect(1)
        .mount(&server)
        .await;

    let updates = api(&server).get_updates(Some(12)).await.unwrap();
    assert!(updates.is_empty());
}

#[tokio::test]
async fn not_ok_envelope_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/bot{TOKEN}/getUpdates")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": false,
            "description": "Conflict: terminated by other getUpdates request"
        })))
        .mount(&server)
        .await;

    let err = api(&server).get_updates(None).await.unwrap_err();
    assert_eq!(
        err,
        TelegramError::Api("Conflict: terminated by other getUpdates request".to_string())
    );
}

#[tokio::test]
async fn garbage_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/bot{TOKEN}/getUpdates")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = api(&server).get_updates(None).await.unwrap_err();
    assert!(matches!(err, TelegramError::Decode(_)));
}

#[tokio::test]
async fn send_message_escapes_text_in_query() {
    let server = MockServer::start().await;
    let text = "Обнаружен новый месяц: Feb 2024 & more?";
    Mock::given(method("GET"))
        .and(path(format!("/bot{TOKEN}/sendMessage")))
        .and(query_param("chat_id", "-100200"))
        .and(query_param("text", text))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    api(&server).send_message("-100200", text).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let raw_query = requests[0].url.query().unwrap_or_default().to_string();
    assert!(!raw_query.contains(' '));
    assert!(!raw_query.contains("& more"));
}

#[tokio::test]
async fn send_message_reports_non_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/bot{TOKEN}/sendMessage")))
        .respond_with(ResponseTemplate::new(403).set_body_string("bot was blocked by the user"))
        .mount(&server)
        .await;

    let err = api(&server).send_message("1", "x").await.unwrap_err();
    assert_eq!(
        err,
        TelegramError::Status {
            status: 403,
            body: "bot was blocked by the user".to_string(),
        }
    );
}

#[tokio::test]
async fn transport_errors_do_not_leak_token() {
    let server = MockServer::start().await;
    let client = api(&server);
    drop(server);

    let err = client.get_updates(None).await.unwrap_err();
    assert!(matches!(err, TelegramError::Transport(_)));
    assert!(!err.to_string().contains(TOKEN));
}

#[tokio::test]
async fn notifier_swallows_delivery_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/bot{TOKEN}/sendMessage")))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = Notifier::new(Arc::new(api(&server)));
    // Returns normally; a single attempt, no retry.
    notifier.send("9", "hello").await;
}
