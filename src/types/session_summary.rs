use serde::{Deserialize, Serialize};

/// One row of the backend's session listing.
///
/// Sessions only carry their metadata here; the messages are fetched
/// separately when the session is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Opaque session identifier.
    pub id: String,

    /// Display title. Either user-assigned or derived by the backend from
    /// the first user message.
    pub title: String,

    /// Identifier of the model the session was started with.
    pub model: String,

    /// Creation timestamp as reported by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl SessionSummary {
    /// Create a new `SessionSummary` without a creation date.
    pub fn new(id: impl Into<String>, title: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            model: model.into(),
            date: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_with_date() {
        let json = serde_json::json!({
            "id": "3f2a9c0e1b7d4a55",
            "title": "Borrow checker questions",
            "model": "google:gemini-2.5-flash",
            "date": "2025-06-01 10:11:12"
        });
        let session: SessionSummary = serde_json::from_value(json).unwrap();

        assert_eq!(session.id, "3f2a9c0e1b7d4a55");
        assert_eq!(session.title, "Borrow checker questions");
        assert_eq!(session.model, "google:gemini-2.5-flash");
        assert_eq!(session.date.as_deref(), Some("2025-06-01 10:11:12"));
    }

    #[test]
    fn deserialize_without_date() {
        let json = serde_json::json!({
            "id": "s1",
            "title": "hello",
            "model": "gpt-4"
        });
        let session: SessionSummary = serde_json::from_value(json).unwrap();

        assert_eq!(session, SessionSummary::new("s1", "hello", "gpt-4"));
    }

    #[test]
    fn serialize_omits_missing_date() {
        let json = serde_json::to_value(SessionSummary::new("s1", "hello", "gpt-4")).unwrap();
        assert!(json.get("date").is_none());
    }
}
