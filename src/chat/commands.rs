//! Slash command parsing for the chat application.
//!
//! Lines starting with `/` drive the session list, the model selector, and
//! the app itself. Anything else is a message to send.

/// A parsed chat command.
///
/// Session and model references are kept as typed; they are resolved against
/// the last listing as either a 1-based position or an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Show the model selector.
    Models,

    /// Select a model by position or id.
    Model(String),

    /// Show the session list.
    Sessions,

    /// Open a session by position or id.
    Open(String),

    /// Start a fresh chat.
    New,

    /// Rename a session. Without a title the current one is offered for
    /// editing.
    Rename {
        /// Session position or id.
        target: String,
        /// New title as typed.
        title: Option<String>,
    },

    /// Delete a session by position or id.
    Delete(String),

    /// Show the open session and selected model.
    Status,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use chatpane::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/open 2").is_some());
/// assert!(parse_command("Hello there!").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    let rest = input.strip_prefix('/')?;
    let mut parts = rest.splitn(2, char::is_whitespace);
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "models" => ChatCommand::Models,
        "model" => match argument {
            Some(model) => ChatCommand::Model(model.to_string()),
            None => ChatCommand::Invalid("/model requires a number or model id".to_string()),
        },
        "sessions" | "chats" | "ls" => ChatCommand::Sessions,
        "open" => required(argument, "/open", ChatCommand::Open),
        "new" => ChatCommand::New,
        "rename" => parse_rename(argument),
        "delete" | "rm" => required(argument, "/delete", ChatCommand::Delete),
        "status" => ChatCommand::Status,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

fn required<F>(argument: Option<&str>, name: &str, constructor: F) -> ChatCommand
where
    F: Fn(String) -> ChatCommand,
{
    match argument {
        Some(arg) => constructor(arg.to_string()),
        None => ChatCommand::Invalid(format!("{} requires a chat number or id", name)),
    }
}

fn parse_rename(argument: Option<&str>) -> ChatCommand {
    let Some(arg) = argument else {
        return ChatCommand::Invalid("/rename requires a chat number or id".to_string());
    };
    let mut parts = arg.splitn(2, char::is_whitespace);
    let target = parts.next().unwrap_or_default().to_string();
    let title = parts.next().map(str::to_string).filter(|t| !t.is_empty());
    ChatCommand::Rename { target, title }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /models                List available models
  /model <n|id>          Select a model (starts a new chat if one is open)
  /sessions              List saved chats
  /open <n|id>           Open a saved chat
  /new                   Start a new chat
  /rename <n|id> [title] Rename a chat (no title edits the current one)
  /delete <n|id>         Delete a chat
  /status                Show the open chat and selected model
  /help                  Show this help message
  /quit                  Exit the chat

Anything else is sent as a message. Ctrl+C skips the reply animation."#
}
