//! End-to-end flows: controller, HTTP client, and a mock backend.

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chatpane::chat::{ChatConfig, ChatController, SEND_ERROR_TEXT};
use chatpane::{ChatClient, Icon, NoDelay, RecordingRenderer, UiUpdate};

async fn mount_listings(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": "gpt-4", "name": "GPT-4"}])),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "old", "title": "Older chat", "model": "nvidia:meta/llama-3.1-8b-instruct"}
        ])))
        .mount(server)
        .await;
}

fn controller(server: &MockServer) -> ChatController<ChatClient> {
    let config = ChatConfig::new().with_api_url(server.uri()).without_color();
    let client = ChatClient::with_options(&config.api_url, config.timeout).unwrap();
    ChatController::new(client, &config).with_ticker(NoDelay)
}

#[tokio::test]
async fn startup_selects_the_only_model() {
    let server = MockServer::start().await;
    mount_listings(&server).await;

    let mut controller = controller(&server);
    let mut renderer = RecordingRenderer::new();
    controller.startup(&mut renderer).await;

    assert_eq!(controller.state().current_model_id.as_deref(), Some("gpt-4"));
    assert!(renderer.any(|u| *u == UiUpdate::HeaderIcon(Icon::OpenAi)));
    assert!(renderer.any(|u| matches!(
        u,
        UiUpdate::SessionList(rows) if rows.len() == 1 && rows[0].icon == Icon::Meta
    )));
    assert!(controller.state().is_fresh_chat());
}

#[tokio::test]
async fn first_message_creates_a_session() {
    let server = MockServer::start().await;
    mount_listings(&server).await;
    Mock::given(method("POST"))
        .and(path("/start_chat"))
        .and(body_json(json!({"model": "gpt-4"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"session_id": "s1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({"session_id": "s1", "model": "gpt-4", "message": "hello"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "hi there"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut controller = controller(&server);
    let mut renderer = RecordingRenderer::new();
    controller.startup(&mut renderer).await;
    renderer.take();

    assert!(controller.send_message("hello", &mut renderer).await);

    assert_eq!(controller.state().current_session_id.as_deref(), Some("s1"));
    let user = renderer
        .position(&UiUpdate::AppendUser("hello".to_string()))
        .unwrap();
    let thinking = renderer
        .position(&UiUpdate::Thinking {
            model_name: "GPT-4".to_string(),
        })
        .unwrap();
    let reply = renderer
        .position(&UiUpdate::RevealFrame {
            rendered: "hi there".to_string(),
            is_final: true,
        })
        .unwrap();
    assert!(user < thinking && thinking < reply);
    // The session list is reloaded after the reply is shown.
    assert!(
        renderer.updates[reply..]
            .iter()
            .any(|u| matches!(u, UiUpdate::SessionList(_)))
    );
    assert_eq!(renderer.updates.last(), Some(&UiUpdate::FocusInput));
}

#[tokio::test]
async fn backend_failure_is_shown_inline() {
    let server = MockServer::start().await;
    mount_listings(&server).await;
    Mock::given(method("POST"))
        .and(path("/start_chat"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "db down"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "unused"})))
        .expect(0)
        .mount(&server)
        .await;

    let mut controller = controller(&server);
    let mut renderer = RecordingRenderer::new();
    controller.startup(&mut renderer).await;
    renderer.take();

    controller.send_message("hello", &mut renderer).await;

    assert!(renderer.any(|u| *u == UiUpdate::InlineError(SEND_ERROR_TEXT.to_string())));
    assert!(controller.state().send_enabled);
    assert!(controller.state().current_session_id.is_none());
    assert!(controller.state().is_fresh_chat());
}

#[tokio::test]
async fn blank_rename_sends_nothing() {
    let server = MockServer::start().await;
    mount_listings(&server).await;
    Mock::given(method("PUT"))
        .and(path("/sessions/old/title"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut controller = controller(&server);
    let mut renderer = RecordingRenderer::new();
    controller.startup(&mut renderer).await;

    controller.begin_rename("old", &mut renderer);
    controller.confirm_rename("old", "  ", &mut renderer).await;

    assert_eq!(controller.state().session("old").unwrap().title, "Older chat");
}

#[tokio::test]
async fn deleting_the_open_chat_returns_to_new_chat() {
    let server = MockServer::start().await;
    mount_listings(&server).await;
    Mock::given(method("GET"))
        .and(path("/history/old"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"role": "user", "content": "hello"},
            {"role": "assistant", "content": "hi there"}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/sessions/old"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "deleted"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut controller = controller(&server);
    let mut renderer = RecordingRenderer::new();
    controller.startup(&mut renderer).await;
    controller.open_session("old", &mut renderer).await;
    assert_eq!(controller.state().current_session_id.as_deref(), Some("old"));
    renderer.take();

    controller.delete_session("old", || true, &mut renderer).await;

    assert!(controller.state().is_fresh_chat());
    assert!(renderer.any(|u| *u == UiUpdate::SelectSession(None)));
    assert!(renderer.any(|u| *u == UiUpdate::Welcome(true)));
}
