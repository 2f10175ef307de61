//! Model icons for the header and the session list.

use std::fmt;

/// Icon shown next to a model or a session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Icon {
    /// Meta / Llama models.
    Meta,
    /// Google / Gemini models.
    Gemini,
    /// OpenAI / GPT models.
    OpenAi,
    /// Anthropic models.
    Anthropic,
    /// DeepSeek models.
    DeepSeek,
    /// A model the client has no dedicated icon for.
    Generic,
    /// No model selected.
    Robot,
}

/// Substring rules in precedence order. The first rule with a matching
/// needle wins.
const RULES: &[(&[&str], Icon)] = &[
    (&["llama", "meta"], Icon::Meta),
    (&["gemini", "google"], Icon::Gemini),
    (&["openai", "gpt"], Icon::OpenAi),
    (&["anthropic"], Icon::Anthropic),
    (&["deepseek"], Icon::DeepSeek),
];

impl Icon {
    /// Pick the icon for a model identifier.
    ///
    /// Matching is a case-insensitive substring test, so provider-prefixed
    /// ids such as `nvidia:meta/llama-3.1-8b-instruct` resolve by vendor.
    ///
    /// ```
    /// # use chatpane::Icon;
    /// assert_eq!(Icon::for_model(Some("GPT-4")), Icon::OpenAi);
    /// assert_eq!(Icon::for_model(Some("kimi-k2")), Icon::Generic);
    /// assert_eq!(Icon::for_model(None), Icon::Robot);
    /// ```
    pub fn for_model(model_id: Option<&str>) -> Icon {
        let Some(model_id) = model_id.filter(|id| !id.is_empty()) else {
            return Icon::Robot;
        };
        let id = model_id.to_lowercase();
        RULES
            .iter()
            .find(|(needles, _)| needles.iter().any(|needle| id.contains(needle)))
            .map(|(_, icon)| *icon)
            .unwrap_or(Icon::Generic)
    }

    /// Short label used when drawing the icon in a terminal.
    pub fn glyph(&self) -> &'static str {
        match self {
            Icon::Meta => "meta",
            Icon::Gemini => "gemini",
            Icon::OpenAi => "openai",
            Icon::Anthropic => "anthropic",
            Icon::DeepSeek => "deepseek",
            Icon::Generic => "ai",
            Icon::Robot => "bot",
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.glyph())
    }
}
