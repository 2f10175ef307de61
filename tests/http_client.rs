//! HTTP contract tests for `ChatClient` against a mock backend.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chatpane::{ChatBackend, ChatClient, ChatRequest, Error, MessageRole};

#[tokio::test]
async fn lists_models_and_sessions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "google:gemini-2.5-flash", "name": "Google Gemini Flash"},
            {"id": "nvidia:meta/llama-3.1-8b-instruct", "name": "Meta Llama"}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "s1", "title": "Weekend plans", "model": "gpt-4", "date": "2025-01-02 10:00"},
            {"id": "s2", "title": "Untitled", "model": "deepseek-r1"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = ChatClient::new(&server.uri()).unwrap();

    let models = client.list_models().await.unwrap();
    assert_eq!(models.len(), 2);
    assert_eq!(models[1].name, "Meta Llama");

    let sessions = client.list_sessions().await.unwrap();
    assert_eq!(sessions[0].title, "Weekend plans");
    assert_eq!(sessions[0].date.as_deref(), Some("2025-01-02 10:00"));
    assert!(sessions[1].date.is_none());
}

#[tokio::test]
async fn fetches_history_for_a_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/history/s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"role": "user", "content": "hello"},
            {"role": "assistant", "content": "hi there"},
            {"role": "system", "content": "summary"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = ChatClient::new(&server.uri()).unwrap();
    let history = client.history("s1").await.unwrap();

    assert_eq!(history.len(), 3);
    assert_eq!(history[0].role, MessageRole::User);
    assert_eq!(history[1].content, "hi there");
    assert_eq!(history[2].role, MessageRole::Other);
}

#[tokio::test]
async fn renames_and_deletes() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/sessions/s1/title"))
        .and(body_json(json!({"title": " Trip notes"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/sessions/s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "deleted"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ChatClient::new(&server.uri()).unwrap();
    client.rename_session("s1", " Trip notes").await.unwrap();
    client.delete_session("s1").await.unwrap();
}

#[tokio::test]
async fn starts_a_chat_and_sends_a_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/start_chat"))
        .and(body_json(json!({"model": "gpt-4"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"session_id": "s1", "message": "Chat started"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({
            "session_id": "s1",
            "model": "gpt-4",
            "message": "hello"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "hi there"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ChatClient::new(&server.uri()).unwrap();
    let started = client.start_chat("gpt-4").await.unwrap();
    assert_eq!(started.session_id, "s1");
    assert_eq!(started.message.as_deref(), Some("Chat started"));

    let reply = client
        .chat(&ChatRequest::new("s1", "gpt-4", "hello"))
        .await
        .unwrap();
    assert_eq!(reply.reply, "hi there");
    assert!(reply.session_id.is_none());
}

#[tokio::test]
async fn base_path_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = ChatClient::new(&format!("{}/api", server.uri())).unwrap();
    assert!(client.list_models().await.unwrap().is_empty());
}

#[tokio::test]
async fn error_body_becomes_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": "model unavailable"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/sessions/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let client = ChatClient::new(&server.uri()).unwrap();

    let err = client
        .chat(&ChatRequest::new("s1", "gpt-4", "hello"))
        .await
        .unwrap_err();
    match err {
        Error::Api {
            status_code,
            message,
        } => {
            assert_eq!(status_code, 500);
            assert_eq!(message, "model unavailable");
        }
        other => panic!("expected API error, got {other:?}"),
    }

    let err = client.delete_session("missing").await.unwrap_err();
    assert_eq!(err.status_code(), Some(404));
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn malformed_body_is_a_serialization_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = ChatClient::new(&server.uri()).unwrap();
    let err = client.list_models().await.unwrap_err();
    assert!(matches!(err, Error::Serialization { .. }));
}

#[tokio::test]
async fn slow_backend_times_out_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sessions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client =
        ChatClient::with_options(&server.uri(), Some(Duration::from_millis(100))).unwrap();
    let err = client.list_sessions().await.unwrap_err();
    assert!(err.is_timeout());
}

#[tokio::test]
async fn unreachable_backend_is_a_connection_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = ChatClient::new(&format!("http://127.0.0.1:{port}")).unwrap();
    let err = client.list_models().await.unwrap_err();
    assert!(err.is_connection());
}
