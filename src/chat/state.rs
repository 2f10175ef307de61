//! Process-wide UI state of the chat client.

use crate::types::{ModelInfo, SessionSummary};

/// Everything the chat UI remembers between user actions.
///
/// `new_chat_active` is true exactly while `current_session_id` is `None`
/// and nothing has been sent in the open draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    /// Session shown in the conversation view; `None` for an unsaved new chat.
    pub current_session_id: Option<String>,
    /// Model used for the next message.
    pub current_model_id: Option<String>,
    /// True until the first message of a fresh chat is sent.
    pub new_chat_active: bool,
    /// Whether the send control accepts input.
    pub send_enabled: bool,
    /// Session row whose title is being edited.
    pub editing_session_id: Option<String>,
    /// Models from the last successful listing.
    pub models: Vec<ModelInfo>,
    /// Sessions from the last successful listing.
    pub sessions: Vec<SessionSummary>,
}

impl UiState {
    /// The state of a freshly opened client.
    pub fn new() -> Self {
        Self {
            current_session_id: None,
            current_model_id: None,
            new_chat_active: true,
            send_enabled: true,
            editing_session_id: None,
            models: Vec::new(),
            sessions: Vec::new(),
        }
    }

    /// Returns true while showing an unsaved, empty chat.
    pub fn is_fresh_chat(&self) -> bool {
        self.new_chat_active
    }

    /// The listing entry of the current model, if it is a listed one.
    pub fn selected_model(&self) -> Option<&ModelInfo> {
        let current = self.current_model_id.as_deref()?;
        self.models.iter().find(|m| m.id == current)
    }

    /// Display name of the current model, falling back to `"AI"`.
    pub fn selected_model_name(&self) -> String {
        self.selected_model()
            .map(|m| m.name.clone())
            .unwrap_or_else(|| "AI".to_string())
    }

    /// Find a listed session by id.
    pub fn session(&self, session_id: &str) -> Option<&SessionSummary> {
        self.sessions.iter().find(|s| s.id == session_id)
    }

    /// Resolve a session by 1-based list position or by id.
    pub fn resolve_session(&self, reference: &str) -> Option<&SessionSummary> {
        resolve(&self.sessions, reference, |s| s.id.as_str())
    }

    /// Resolve a model by 1-based selector position or by id.
    pub fn resolve_model(&self, reference: &str) -> Option<&ModelInfo> {
        resolve(&self.models, reference, |m| m.id.as_str())
    }

    /// Returns true if the row of `session_id` is in edit mode.
    pub fn is_editing(&self, session_id: &str) -> bool {
        self.editing_session_id.as_deref() == Some(session_id)
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve<'a, T>(items: &'a [T], reference: &str, id: impl Fn(&T) -> &str) -> Option<&'a T> {
    let reference = reference.trim();
    if let Some(item) = items.iter().find(|item| id(item) == reference) {
        return Some(item);
    }
    match reference.parse::<usize>() {
        Ok(position) if position >= 1 => items.get(position - 1),
        _ => None,
    }
}
