//! Request and response bodies for the session lifecycle endpoints.

use serde::{Deserialize, Serialize};

/// Body of `POST /start_chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartChatRequest {
    /// Model the new session is bound to.
    pub model: String,
}

/// Response of `POST /start_chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartChatResponse {
    /// Identifier of the newly created session.
    pub session_id: String,

    /// Free-form status text from the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Session the message belongs to.
    pub session_id: String,

    /// Model that should answer.
    pub model: String,

    /// The user's message text.
    pub message: String,
}

impl ChatRequest {
    /// Create a new `ChatRequest`.
    pub fn new(
        session_id: impl Into<String>,
        model: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            model: model.into(),
            message: message.into(),
        }
    }
}

/// Response of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// The assistant's reply as markdown.
    pub reply: String,

    /// Echo of the session the reply was stored in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Body of `PUT /sessions/{id}/title`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameRequest {
    /// The new title, sent as typed.
    pub title: String,
}
