//! Pure view functions: state and server data in, described updates out.

use crate::icon::Icon;
use crate::markdown::MarkdownFormatter;
use crate::render::{ModelOption, SessionRow, UiUpdate};
use crate::types::{HistoryMessage, MessageRole, ModelInfo, SessionSummary};

/// Selector entries for `models`, marking `current` as selected.
pub fn model_options(models: &[ModelInfo], current: Option<&str>) -> Vec<ModelOption> {
    models
        .iter()
        .map(|m| ModelOption {
            id: m.id.clone(),
            name: m.name.clone(),
            selected: current == Some(m.id.as_str()),
        })
        .collect()
}

/// Session list rows, highlighting the open session.
pub fn session_rows(sessions: &[SessionSummary], current: Option<&str>) -> Vec<SessionRow> {
    sessions
        .iter()
        .map(|s| SessionRow {
            id: s.id.clone(),
            title: s.title.clone(),
            icon: Icon::for_model(Some(&s.model)),
            selected: current == Some(s.id.as_str()),
        })
        .collect()
}

/// The header icon for the current model.
pub fn header_icon(current_model: Option<&str>) -> UiUpdate {
    UiUpdate::HeaderIcon(Icon::for_model(current_model))
}

/// Render one stored message without animation.
pub fn message_update(message: &HistoryMessage, formatter: &MarkdownFormatter) -> UiUpdate {
    match message.role {
        MessageRole::User => UiUpdate::AppendUser(message.content.clone()),
        MessageRole::Assistant | MessageRole::Other => UiUpdate::AppendAssistant {
            text: message.content.clone(),
            rendered: formatter.render(&message.content, true),
        },
    }
}

/// Replace the conversation view with a session's full history.
pub fn history_updates(
    messages: &[HistoryMessage],
    formatter: &MarkdownFormatter,
) -> Vec<UiUpdate> {
    let mut updates = Vec::with_capacity(messages.len() + 2);
    updates.push(UiUpdate::ClearConversation);
    updates.extend(messages.iter().map(|m| message_update(m, formatter)));
    updates.push(UiUpdate::ScrollToBottom);
    updates
}

/// Reset the conversation view to the welcome placeholder.
pub fn fresh_chat_updates() -> Vec<UiUpdate> {
    vec![
        UiUpdate::NewChatEnabled(false),
        UiUpdate::ClearConversation,
        UiUpdate::Welcome(true),
        UiUpdate::FocusInput,
        UiUpdate::SelectSession(None),
    ]
}
