use serde::{Deserialize, Serialize};

/// A model the backend offers for chatting.
///
/// The identifier is opaque to the client; it is echoed back on
/// `start_chat` and `chat` requests and only inspected to pick an icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Unique model identifier, e.g. `google:gemini-2.5-flash`.
    pub id: String,

    /// A human-readable name for the model.
    pub name: String,
}

impl ModelInfo {
    /// Create a new `ModelInfo`.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
