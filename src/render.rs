//! UI updates and the renderers that apply them.
//!
//! The chat controller never draws anything itself. It describes every change
//! to the screen as a [`UiUpdate`] and hands it to a [`Renderer`]:
//! - [`PlainTextRenderer`] paints updates to a terminal
//! - [`RecordingRenderer`] keeps them for inspection in tests

use std::io::{self, Stdout, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use unicode_width::UnicodeWidthStr;

use crate::icon::Icon;
use crate::markdown::{dim_text, error_text};

/// ANSI escape code for dim text.
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for bold text.
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for the speaker labels).
const ANSI_CYAN: &str = "\x1b[36m";

/// Move to column zero and clear the line.
const ANSI_CLEAR_LINE: &str = "\r\x1b[2K";

/// Clear from the cursor to the end of the screen.
const ANSI_CLEAR_BELOW: &str = "\x1b[J";

/// Terminal width assumed when stdout is not a terminal.
const DEFAULT_COLUMNS: usize = 80;

/// An entry of the model selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelOption {
    /// Model identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Whether this is the current model.
    pub selected: bool,
}

/// A row of the session list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRow {
    /// Session identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Icon derived from the session's model.
    pub icon: Icon,
    /// Whether this row is highlighted as the open session.
    pub selected: bool,
}

/// A described change to the chat UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiUpdate {
    /// Replace the model selector entries.
    ModelOptions(Vec<ModelOption>),
    /// Show the icon of the current model in the header.
    HeaderIcon(Icon),
    /// Replace the session list.
    SessionList(Vec<SessionRow>),
    /// Highlight one session row, or clear the highlight.
    SelectSession(Option<String>),
    /// Replace a row's title with an input pre-filled with the title.
    EditTitle {
        /// Row being edited.
        session_id: String,
        /// Text the input starts with.
        current_title: String,
    },
    /// Leave edit mode for a row.
    EndEditTitle {
        /// Row that was being edited.
        session_id: String,
    },
    /// Enable or disable the "new chat" action.
    NewChatEnabled(bool),
    /// Enable or disable the send control.
    SendEnabled(bool),
    /// Show or hide the welcome placeholder.
    Welcome(bool),
    /// Remove every message from the conversation view.
    ClearConversation,
    /// Show the "loading chat" placeholder.
    LoadingHistory,
    /// Append a user message bubble.
    AppendUser(String),
    /// Append a fully formatted assistant message.
    AppendAssistant {
        /// The raw markdown.
        text: String,
        /// The formatted text.
        rendered: String,
    },
    /// Start an assistant message that will be revealed frame by frame.
    BeginAssistant,
    /// Replace the revealing assistant message with a new frame.
    RevealFrame {
        /// The formatted prefix.
        rendered: String,
        /// True for the last frame.
        is_final: bool,
    },
    /// Show the "model is thinking" indicator.
    Thinking {
        /// Display name of the model.
        model_name: String,
    },
    /// Remove the thinking indicator.
    ClearThinking,
    /// Replace the thinking indicator with an inline error.
    InlineError(String),
    /// Empty the message input.
    ClearInput,
    /// Give the message input focus.
    FocusInput,
    /// Scroll the conversation to its end.
    ScrollToBottom,
}

/// Applies UI updates to a concrete surface.
pub trait Renderer: Send {
    /// Apply one update.
    fn apply(&mut self, update: UiUpdate);

    /// Returns true if an in-progress reveal should skip to its end.
    fn should_interrupt(&self) -> bool {
        false
    }
}

/// Terminal renderer with optional ANSI styling.
///
/// Conversation updates are printed as they arrive. The model selector and
/// session list are kept and printed on request, since they would otherwise
/// be repainted after every reply.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
    models: Vec<ModelOption>,
    sessions: Vec<SessionRow>,
    header_icon: Icon,
    thinking: bool,
    reveal_rows: usize,
    columns: Option<usize>,
    interrupted: Option<Arc<AtomicBool>>,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            models: Vec::new(),
            sessions: Vec::new(),
            header_icon: Icon::Robot,
            thinking: false,
            reveal_rows: 0,
            columns: None,
            interrupted: None,
        }
    }

    /// Fixes the terminal width instead of asking the terminal for it.
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Sets the flag that, when raised, skips the rest of a reveal.
    pub fn with_interrupt_flag(mut self, interrupted: Arc<AtomicBool>) -> Self {
        self.interrupted = Some(interrupted);
        self
    }

    /// The session rows from the last list update.
    pub fn sessions(&self) -> &[SessionRow] {
        &self.sessions
    }

    /// Print the model selector.
    pub fn print_models(&mut self) {
        if self.models.is_empty() {
            println!("    No models available.");
            return;
        }
        println!("    Models {}:", self.header_icon);
        for (i, model) in self.models.iter().enumerate() {
            let marker = if model.selected { "*" } else { " " };
            println!("    {marker} {}. {} ({})", i + 1, model.name, model.id);
        }
    }

    /// Print the session list.
    pub fn print_sessions(&mut self) {
        if self.sessions.is_empty() {
            println!("    No saved chats.");
            return;
        }
        println!("    Chats:");
        for (i, row) in self.sessions.iter().enumerate() {
            let marker = if row.selected { "*" } else { " " };
            let line = format!("{marker} {}. {} {}", i + 1, row.icon, row.title);
            if row.selected && self.use_color {
                println!("    {ANSI_BOLD}{line}{ANSI_RESET}");
            } else {
                println!("    {line}");
            }
        }
    }

    /// Print an informational message.
    pub fn print_info(&mut self, info: &str) {
        println!("{info}");
    }

    /// Print an error message.
    pub fn print_error(&mut self, error: &str) {
        eprintln!("Error: {}", error_text(error, self.use_color));
    }

    /// Flushes stdout to ensure immediate display of streamed content.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn label(&self, label: &str) -> String {
        if self.use_color {
            format!("{ANSI_CYAN}{label}{ANSI_RESET}")
        } else {
            label.to_string()
        }
    }

    fn clear_thinking(&mut self) {
        if !self.thinking {
            return;
        }
        if self.use_color {
            print!("{ANSI_CLEAR_LINE}");
        } else {
            println!();
        }
        self.thinking = false;
    }

    fn columns(&self) -> usize {
        self.columns.unwrap_or_else(|| {
            crossterm::terminal::size()
                .map(|(columns, _)| columns as usize)
                .unwrap_or(DEFAULT_COLUMNS)
        })
    }

    fn draw_frame(&mut self, rendered: &str, is_final: bool) {
        if !self.use_color {
            // Without cursor control only the finished reply is printed.
            if is_final {
                println!("{rendered}");
            }
            return;
        }
        // Long lines wrap, so the previous frame may span more rows than lines.
        if self.reveal_rows > 0 {
            print!("\r");
            if self.reveal_rows > 1 {
                print!("\x1b[{}A", self.reveal_rows - 1);
            }
            print!("{ANSI_CLEAR_BELOW}");
        }
        print!("{rendered}");
        if is_final {
            println!();
            self.reveal_rows = 0;
        } else {
            self.reveal_rows = screen_rows(rendered, self.columns());
        }
        self.flush();
    }
}

/// Number of terminal rows `text` occupies at the given width.
///
/// ANSI escape sequences take no space. Every line takes at least one row.
fn screen_rows(text: &str, columns: usize) -> usize {
    let columns = columns.max(1);
    text.split('\n')
        .map(|line| strip_ansi(line).width().div_ceil(columns).max(1))
        .sum()
}

fn strip_ansi(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
            continue;
        }
        if chars.next() == Some('[') {
            for c in chars.by_ref() {
                if ('@'..='~').contains(&c) {
                    break;
                }
            }
        }
    }
    out
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn apply(&mut self, update: UiUpdate) {
        match update {
            UiUpdate::ModelOptions(models) => self.models = models,
            UiUpdate::HeaderIcon(icon) => self.header_icon = icon,
            UiUpdate::SessionList(rows) => self.sessions = rows,
            UiUpdate::SelectSession(selected) => {
                for row in &mut self.sessions {
                    row.selected = selected.as_deref() == Some(row.id.as_str());
                }
            }
            UiUpdate::EditTitle { .. } | UiUpdate::EndEditTitle { .. } => {}
            UiUpdate::NewChatEnabled(_) | UiUpdate::SendEnabled(_) => {}
            UiUpdate::Welcome(true) => {
                let hint = dim_text(
                    "New chat. Type a message, or /help for commands.",
                    self.use_color,
                );
                println!("\n{hint}");
            }
            UiUpdate::Welcome(false) => {}
            UiUpdate::ClearConversation => {
                self.reveal_rows = 0;
                println!();
            }
            UiUpdate::LoadingHistory => {
                println!("{}", dim_text("Loading chat...", self.use_color));
            }
            UiUpdate::AppendUser(text) => {
                println!("{}", self.label("You:"));
                println!("{text}");
            }
            UiUpdate::AppendAssistant { rendered, .. } => {
                println!("{}", self.label("Assistant:"));
                println!("{rendered}");
            }
            UiUpdate::BeginAssistant => {
                println!("{}", self.label("Assistant:"));
                self.reveal_rows = 0;
            }
            UiUpdate::RevealFrame { rendered, is_final } => self.draw_frame(&rendered, is_final),
            UiUpdate::Thinking { model_name } => {
                if self.use_color {
                    print!("{ANSI_DIM}{model_name} is thinking...{ANSI_RESET}");
                } else {
                    print!("{model_name} is thinking...");
                }
                self.thinking = true;
                self.flush();
            }
            UiUpdate::ClearThinking => self.clear_thinking(),
            UiUpdate::InlineError(message) => {
                self.clear_thinking();
                println!("{}", error_text(&message, self.use_color));
            }
            UiUpdate::ClearInput | UiUpdate::FocusInput => {}
            UiUpdate::ScrollToBottom => self.flush(),
        }
    }

    fn should_interrupt(&self) -> bool {
        self.interrupted
            .as_ref()
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(false)
    }
}

/// Renderer that records every update it is given.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    /// Updates in the order they were applied.
    pub updates: Vec<UiUpdate>,
    /// Value reported by `should_interrupt`.
    pub interrupt: bool,
}

impl RecordingRenderer {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the recorded updates, leaving the recorder empty.
    pub fn take(&mut self) -> Vec<UiUpdate> {
        std::mem::take(&mut self.updates)
    }

    /// Returns true if any recorded update satisfies `predicate`.
    pub fn any(&self, predicate: impl Fn(&UiUpdate) -> bool) -> bool {
        self.updates.iter().any(predicate)
    }

    /// Index of the first recorded update equal to `update`.
    pub fn position(&self, update: &UiUpdate) -> Option<usize> {
        self.updates.iter().position(|u| u == update)
    }
}

impl Renderer for RecordingRenderer {
    fn apply(&mut self, update: UiUpdate) {
        self.updates.push(update);
    }

    fn should_interrupt(&self) -> bool {
        self.interrupt
    }
}
