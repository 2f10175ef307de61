//! Chat application module for session-based conversations with a backend.
//!
//! This module provides the controller behind the `chatpane` REPL. It
//! supports:
//!
//! - A model selector and a list of saved chats fetched from the backend
//! - Opening, renaming, and deleting saved chats
//! - Sending messages and revealing replies character by character
//! - Slash commands for session control
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`state`]: the UI state shared by every operation
//! - [`view`]: pure functions turning state and server data into updates
//! - [`controller`]: the operations, issuing backend calls and updates
//! - [`commands`]: Slash command parsing and handling

mod commands;
mod config;
mod controller;
mod state;
pub mod view;

pub use crate::render::{PlainTextRenderer, RecordingRenderer, Renderer, UiUpdate};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use controller::{ChatController, SEND_ERROR_TEXT};
pub use state::UiState;
