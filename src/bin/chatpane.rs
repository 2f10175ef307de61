//! Interactive terminal client for a session-based chat backend.
//!
//! # Usage
//!
//! ```bash
//! # Talk to a backend on the default address (http://127.0.0.1:5000)
//! chatpane
//!
//! # Point at another backend and prefer a model
//! chatpane --api-url http://chat.internal:8080 --model google:gemini-2.5-flash
//!
//! # Disable colors (useful for piping output)
//! chatpane --no-color
//! ```
//!
//! The backend address can also come from `CHATPANE_API_URL`.
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/sessions` - List saved chats
//! - `/open <n|id>` - Open a saved chat
//! - `/new` - Start a new chat
//! - `/model <n|id>` - Change the model
//! - `/quit` - Exit the application

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use chatpane::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatController, PlainTextRenderer, UiState, help_text,
    parse_command,
};
use chatpane::logging::{DEFAULT_LOG_FILTER, init_logging};
use chatpane::{API_URL_ENV, ChatClient, Icon};

/// Main entry point for the chatpane application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(DEFAULT_LOG_FILTER);

    let (mut args, _) = ChatArgs::from_command_line_relaxed("chatpane [OPTIONS]");
    if args.api_url.is_none() {
        args.api_url = std::env::var(API_URL_ENV).ok().filter(|url| !url.is_empty());
    }
    let config = ChatConfig::from(args);
    let use_color = config.use_color;

    let client = ChatClient::with_options(&config.api_url, config.timeout)?;
    let mut controller = ChatController::new(client, &config);
    let mut rl = DefaultEditor::new()?;

    // Raised by Ctrl+C while a reply is being revealed
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    let mut renderer =
        PlainTextRenderer::with_color(use_color).with_interrupt_flag(interrupted.clone());

    println!("chatpane ({})", config.api_url);
    println!("Type /help for commands, /quit to exit");
    controller.startup(&mut renderer).await;
    print_status(controller.state(), &mut renderer);

    loop {
        interrupted.store(false, Ordering::Relaxed);

        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Models => renderer.print_models(),
                        ChatCommand::Model(reference) => {
                            controller.select_model(&reference, &mut renderer);
                            print_status(controller.state(), &mut renderer);
                        }
                        ChatCommand::Sessions => {
                            controller.load_sessions(&mut renderer).await;
                            renderer.print_sessions();
                        }
                        ChatCommand::Open(reference) => {
                            match session_id(controller.state(), &reference) {
                                Some(id) => controller.open_session(&id, &mut renderer).await,
                                None => renderer.print_error(&no_such_chat(&reference)),
                            }
                        }
                        ChatCommand::New => {
                            if controller.state().is_fresh_chat() {
                                renderer.print_info("Already in a new chat.");
                            } else {
                                controller.init_new_chat(&mut renderer);
                            }
                        }
                        ChatCommand::Rename { target, title } => {
                            let Some(id) = session_id(controller.state(), &target) else {
                                renderer.print_error(&no_such_chat(&target));
                                continue;
                            };
                            let Some(current) = controller.begin_rename(&id, &mut renderer) else {
                                renderer.print_error(&no_such_chat(&target));
                                continue;
                            };
                            let input = match title {
                                Some(title) => Ok(title),
                                None => {
                                    rl.readline_with_initial("Title: ", (current.as_str(), ""))
                                }
                            };
                            match input {
                                Ok(input) => {
                                    controller.confirm_rename(&id, &input, &mut renderer).await
                                }
                                Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                                    controller.cancel_rename(&mut renderer)
                                }
                                Err(err) => {
                                    controller.cancel_rename(&mut renderer);
                                    renderer.print_error(&format!("Input error: {}", err));
                                }
                            }
                        }
                        ChatCommand::Delete(reference) => {
                            let Some(id) = session_id(controller.state(), &reference) else {
                                renderer.print_error(&no_such_chat(&reference));
                                continue;
                            };
                            let confirm = || {
                                matches!(
                                    rl.readline("Delete this chat? [y/N] "),
                                    Ok(answer) if answer.trim().eq_ignore_ascii_case("y")
                                        || answer.trim().eq_ignore_ascii_case("yes")
                                )
                            };
                            controller.delete_session(&id, confirm, &mut renderer).await;
                        }
                        ChatCommand::Status => print_status(controller.state(), &mut renderer),
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                controller.send_message(line, &mut renderer).await;
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

fn session_id(state: &UiState, reference: &str) -> Option<String> {
    state.resolve_session(reference).map(|s| s.id.clone())
}

fn no_such_chat(reference: &str) -> String {
    format!("No chat matches '{}'. Use /sessions to list them.", reference)
}

fn print_status(state: &UiState, renderer: &mut PlainTextRenderer) {
    let model = match state.current_model_id.as_deref() {
        Some(id) => format!(
            "{} {} ({})",
            Icon::for_model(Some(id)),
            state.selected_model_name(),
            id
        ),
        None => format!("{} (none)", Icon::for_model(None)),
    };
    let chat = match state.current_session_id.as_deref() {
        Some(id) => state
            .session(id)
            .map(|s| format!("{} ({})", s.title, id))
            .unwrap_or_else(|| id.to_string()),
        None => "new chat".to_string(),
    };
    renderer.print_info(&format!("    Model: {}", model));
    renderer.print_info(&format!("    Chat: {}", chat));
}
