// Public modules
pub mod chat;
pub mod client;
pub mod error;
pub mod icon;
pub mod logging;
pub mod markdown;
pub mod observability;
pub mod render;
pub mod reveal;
pub mod types;

// Re-exports
pub use chat::{ChatController, UiState};
pub use client::{API_URL_ENV, ChatBackend, ChatClient, DEFAULT_API_URL};
pub use error::{Error, Result};
pub use icon::Icon;
pub use markdown::MarkdownFormatter;
pub use observability::register_biometrics;
pub use render::{PlainTextRenderer, RecordingRenderer, Renderer, UiUpdate};
pub use reveal::{IntervalTicker, NoDelay, Reveal, RevealFrame, Ticker};
pub use types::*;
