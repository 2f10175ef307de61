//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::client::DEFAULT_API_URL;
use crate::reveal::{DEFAULT_REVEAL_INTERVAL, DEFAULT_REVEAL_STEP};

/// Command-line arguments for the chatpane tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Backend base URL.
    #[arrrg(optional, "Chat backend URL (default: http://127.0.0.1:5000)", "URL")]
    pub api_url: Option<String>,

    /// Model to select on startup when the backend lists it.
    #[arrrg(optional, "Model to select on startup (default: first listed)", "MODEL")]
    pub model: Option<String>,

    /// Milliseconds between reveal frames.
    #[arrrg(optional, "Milliseconds between reveal frames (default: 50)", "MS")]
    pub reveal_ms: Option<u64>,

    /// Characters added per reveal frame.
    #[arrrg(optional, "Characters revealed per frame (default: 2)", "CHARS")]
    pub reveal_step: Option<usize>,

    /// Per-request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: none)", "SECS")]
    pub timeout_secs: Option<u64>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a chat client.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Base URL of the chat backend.
    pub api_url: String,

    /// Model to prefer over the first listed one.
    pub preferred_model: Option<String>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Delay between reveal frames.
    pub reveal_interval: Duration,

    /// Characters added per reveal frame.
    pub reveal_step: usize,

    /// Optional per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Backend: http://127.0.0.1:5000
    /// - Model: first listed by the backend
    /// - Color: enabled
    /// - Reveal: 2 characters every 50 ms
    /// - Timeout: none
    pub fn new() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            preferred_model: None,
            use_color: true,
            reveal_interval: DEFAULT_REVEAL_INTERVAL,
            reveal_step: DEFAULT_REVEAL_STEP,
            timeout: None,
        }
    }

    /// Sets the backend URL.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Sets the model to prefer on startup.
    pub fn with_preferred_model(mut self, model: Option<String>) -> Self {
        self.preferred_model = model;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Sets the delay between reveal frames.
    pub fn with_reveal_interval(mut self, interval: Duration) -> Self {
        self.reveal_interval = interval;
        self
    }

    /// Sets the characters added per reveal frame; zero is raised to one.
    pub fn with_reveal_step(mut self, step: usize) -> Self {
        self.reveal_step = step.max(1);
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        ChatConfig {
            api_url: args.api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            preferred_model: args.model,
            use_color: !args.no_color,
            reveal_interval: args
                .reveal_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_REVEAL_INTERVAL),
            reveal_step: args.reveal_step.unwrap_or(DEFAULT_REVEAL_STEP).max(1),
            timeout: args.timeout_secs.map(Duration::from_secs),
        }
    }
}
