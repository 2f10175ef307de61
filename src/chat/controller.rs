//! The chat session controller.
//!
//! [`ChatController`] owns the [`UiState`], talks to a [`ChatBackend`], and
//! describes every visible change as [`UiUpdate`]s handed to a [`Renderer`].
//! It never blocks on anything but its backend and its reveal [`Ticker`].

use tracing::{debug, error, warn};

use crate::chat::config::ChatConfig;
use crate::chat::state::UiState;
use crate::chat::view;
use crate::client::ChatBackend;
use crate::error::{Error, Result};
use crate::markdown::MarkdownFormatter;
use crate::observability::{
    CHAT_BACKGROUND_ERRORS, CHAT_DELETES, CHAT_MESSAGES_SENT, CHAT_RENAMES, CHAT_SEND_FAILURES,
    CHAT_SESSIONS_STARTED, REVEAL_FRAMES, REVEAL_SKIPS,
};
use crate::render::{Renderer, UiUpdate};
use crate::reveal::{IntervalTicker, Reveal, Ticker};
use crate::types::ChatRequest;

/// Inline text shown in place of the thinking indicator when a send fails.
pub const SEND_ERROR_TEXT: &str = "Network Error.";

/// Drives the chat UI: model selection, the session list, and sending.
pub struct ChatController<B: ChatBackend> {
    backend: B,
    ticker: Box<dyn Ticker>,
    formatter: MarkdownFormatter,
    state: UiState,
    preferred_model: Option<String>,
    reveal_step: usize,
}

impl<B: ChatBackend> ChatController<B> {
    /// Creates a controller that paces reveals on the tokio timer.
    pub fn new(backend: B, config: &ChatConfig) -> Self {
        Self {
            backend,
            ticker: Box::new(IntervalTicker::new(config.reveal_interval)),
            formatter: MarkdownFormatter::new(config.use_color),
            state: UiState::new(),
            preferred_model: config.preferred_model.clone(),
            reveal_step: config.reveal_step,
        }
    }

    /// Replaces the ticker that paces reveal frames.
    pub fn with_ticker(mut self, ticker: impl Ticker + 'static) -> Self {
        self.ticker = Box::new(ticker);
        self
    }

    /// The current UI state.
    pub fn state(&self) -> &UiState {
        &self.state
    }

    /// The backend this controller talks to.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Populate the model selector and the session list, then show the
    /// welcome placeholder.
    pub async fn startup(&mut self, renderer: &mut dyn Renderer) {
        renderer.apply(UiUpdate::NewChatEnabled(!self.state.new_chat_active));
        self.load_models(renderer).await;
        self.load_sessions(renderer).await;
        renderer.apply(UiUpdate::Welcome(true));
        renderer.apply(UiUpdate::FocusInput);
    }

    /// Fetch the available models and select one.
    ///
    /// The configured preferred model wins when the backend lists it;
    /// otherwise the first listed model is selected. Failures are logged and
    /// leave the selector as it was.
    pub async fn load_models(&mut self, renderer: &mut dyn Renderer) {
        let models = match self.backend.list_models().await {
            Ok(models) => models,
            Err(err) => {
                CHAT_BACKGROUND_ERRORS.click();
                error!(error = %err, "failed to load models");
                return;
            }
        };
        let preferred = self
            .preferred_model
            .as_deref()
            .filter(|id| models.iter().any(|m| m.id == *id));
        if let Some(preferred) = preferred {
            self.state.current_model_id = Some(preferred.to_string());
        } else if let Some(first) = models.first() {
            if let Some(preferred) = &self.preferred_model {
                warn!(%preferred, "preferred model not offered by backend; using the first listed");
            }
            self.state.current_model_id = Some(first.id.clone());
        }
        self.state.models = models;
        let current = self.state.current_model_id.as_deref();
        renderer.apply(UiUpdate::ModelOptions(view::model_options(
            &self.state.models,
            current,
        )));
        if !self.state.models.is_empty() {
            renderer.apply(view::header_icon(current));
        }
    }

    /// Fetch the session list and redraw it. Failures are logged and leave
    /// the list unchanged.
    pub async fn load_sessions(&mut self, renderer: &mut dyn Renderer) {
        match self.backend.list_sessions().await {
            Ok(sessions) => {
                self.state.sessions = sessions;
                self.state.editing_session_id = None;
                renderer.apply(UiUpdate::SessionList(view::session_rows(
                    &self.state.sessions,
                    self.state.current_session_id.as_deref(),
                )));
            }
            Err(err) => {
                CHAT_BACKGROUND_ERRORS.click();
                error!(error = %err, "failed to load sessions");
            }
        }
    }

    /// Make `session_id` the open session and show its full history.
    ///
    /// History is rendered without the reveal animation. If the fetch fails
    /// the loading placeholder stays.
    pub async fn load_chat_history(&mut self, session_id: &str, renderer: &mut dyn Renderer) {
        self.state.current_session_id = Some(session_id.to_string());
        self.set_new_chat_active(false, renderer);
        renderer.apply(UiUpdate::Welcome(false));
        renderer.apply(UiUpdate::LoadingHistory);

        match self.backend.history(session_id).await {
            Ok(messages) => {
                debug!(session_id, messages = messages.len(), "loaded history");
                for update in view::history_updates(&messages, &self.formatter) {
                    renderer.apply(update);
                }
            }
            Err(err) => {
                CHAT_BACKGROUND_ERRORS.click();
                error!(session_id, error = %err, "failed to load history");
            }
        }
    }

    /// Open a session from the list. Ignored while that row is being renamed.
    pub async fn open_session(&mut self, session_id: &str, renderer: &mut dyn Renderer) {
        if self.state.is_editing(session_id) {
            return;
        }
        renderer.apply(UiUpdate::SelectSession(Some(session_id.to_string())));
        self.load_chat_history(session_id, renderer).await;
    }

    /// Reset to an unsaved, empty chat. Does nothing if already there.
    pub fn init_new_chat(&mut self, renderer: &mut dyn Renderer) {
        if self.state.new_chat_active {
            return;
        }
        self.state.current_session_id = None;
        self.state.new_chat_active = true;
        for update in view::fresh_chat_updates() {
            renderer.apply(update);
        }
    }

    /// Switch the model used for the next message.
    ///
    /// `reference` is a 1-based selector position or a model id; ids that are
    /// not listed are accepted as-is. An open conversation is replaced by a
    /// fresh chat; nothing is deleted on the server.
    pub fn select_model(&mut self, reference: &str, renderer: &mut dyn Renderer) {
        let model_id = match self.state.resolve_model(reference) {
            Some(model) => model.id.clone(),
            None => reference.trim().to_string(),
        };
        if model_id.is_empty() {
            return;
        }
        self.state.current_model_id = Some(model_id);
        let current = self.state.current_model_id.as_deref();
        renderer.apply(UiUpdate::ModelOptions(view::model_options(
            &self.state.models,
            current,
        )));
        renderer.apply(view::header_icon(current));
        if !self.state.new_chat_active {
            self.init_new_chat(renderer);
        }
    }

    /// Put a session row into edit mode, returning the title to pre-fill.
    pub fn begin_rename(
        &mut self,
        session_id: &str,
        renderer: &mut dyn Renderer,
    ) -> Option<String> {
        let title = self.state.session(session_id)?.title.clone();
        self.state.editing_session_id = Some(session_id.to_string());
        renderer.apply(UiUpdate::EditTitle {
            session_id: session_id.to_string(),
            current_title: title.clone(),
        });
        Some(title)
    }

    /// Confirm the title typed into an edited row.
    ///
    /// Called on Enter and again when the input loses focus; only the first
    /// call for a row in edit mode does anything. A blank title leaves edit
    /// mode without a request. Otherwise the title is sent as typed and the
    /// list is reloaded from the server.
    pub async fn confirm_rename(
        &mut self,
        session_id: &str,
        input: &str,
        renderer: &mut dyn Renderer,
    ) {
        if !self.state.is_editing(session_id) {
            return;
        }
        self.state.editing_session_id = None;
        renderer.apply(UiUpdate::EndEditTitle {
            session_id: session_id.to_string(),
        });
        if input.trim().is_empty() {
            return;
        }
        match self.backend.rename_session(session_id, input).await {
            Ok(()) => {
                CHAT_RENAMES.click();
                self.load_sessions(renderer).await;
            }
            Err(err) => {
                CHAT_BACKGROUND_ERRORS.click();
                error!(session_id, error = %err, "failed to rename session");
            }
        }
    }

    /// Leave edit mode without renaming.
    pub fn cancel_rename(&mut self, renderer: &mut dyn Renderer) {
        if let Some(session_id) = self.state.editing_session_id.take() {
            renderer.apply(UiUpdate::EndEditTitle { session_id });
        }
    }

    /// Delete a session once `confirm` agrees.
    ///
    /// Deleting the open session resets to a fresh chat. The list is reloaded
    /// afterward whether or not the delete succeeded.
    pub async fn delete_session(
        &mut self,
        session_id: &str,
        confirm: impl FnOnce() -> bool,
        renderer: &mut dyn Renderer,
    ) {
        if !confirm() {
            return;
        }
        match self.backend.delete_session(session_id).await {
            Ok(()) => {
                CHAT_DELETES.click();
                if self.state.current_session_id.as_deref() == Some(session_id) {
                    self.init_new_chat(renderer);
                }
            }
            Err(err) => {
                CHAT_BACKGROUND_ERRORS.click();
                error!(session_id, error = %err, "failed to delete session");
            }
        }
        self.load_sessions(renderer).await;
    }

    /// Send a message and reveal the reply.
    ///
    /// Returns false without doing anything when `input` is blank or the send
    /// control is disabled. Failures are shown inline in place of the
    /// thinking indicator; the send control is re-enabled either way.
    pub async fn send_message(&mut self, input: &str, renderer: &mut dyn Renderer) -> bool {
        let text = input.trim();
        if text.is_empty() || !self.state.send_enabled {
            return false;
        }

        renderer.apply(UiUpdate::Welcome(false));
        renderer.apply(UiUpdate::AppendUser(text.to_string()));
        renderer.apply(UiUpdate::ScrollToBottom);
        renderer.apply(UiUpdate::ClearInput);
        self.state.send_enabled = false;
        renderer.apply(UiUpdate::SendEnabled(false));
        renderer.apply(UiUpdate::Thinking {
            model_name: self.state.selected_model_name(),
        });
        renderer.apply(UiUpdate::ScrollToBottom);

        match self.exchange(text, renderer).await {
            Ok(reply) => {
                CHAT_MESSAGES_SENT.click();
                renderer.apply(UiUpdate::ClearThinking);
                self.reveal(&reply, renderer).await;
                self.load_sessions(renderer).await;
            }
            Err(err) => {
                CHAT_SEND_FAILURES.click();
                renderer.apply(UiUpdate::InlineError(SEND_ERROR_TEXT.to_string()));
                renderer.apply(UiUpdate::ScrollToBottom);
                debug!(error = %err, "send failed");
            }
        }

        self.state.send_enabled = true;
        renderer.apply(UiUpdate::SendEnabled(true));
        renderer.apply(UiUpdate::FocusInput);
        true
    }

    /// Start a session if needed, then post the message. Returns the reply.
    async fn exchange(&mut self, text: &str, renderer: &mut dyn Renderer) -> Result<String> {
        let model = self
            .state
            .current_model_id
            .clone()
            .ok_or_else(|| Error::validation("no model selected", Some("model".to_string())))?;

        let session_id = match self.state.current_session_id.clone() {
            Some(session_id) => session_id,
            None => {
                let started = self.backend.start_chat(&model).await?;
                CHAT_SESSIONS_STARTED.click();
                debug!(session_id = %started.session_id, model = %model, "started session");
                self.state.current_session_id = Some(started.session_id.clone());
                self.set_new_chat_active(false, renderer);
                started.session_id
            }
        };

        let request = ChatRequest::new(session_id, model, text);
        let reply = self.backend.chat(&request).await?;
        Ok(reply.reply)
    }

    /// Reveal `text` frame by frame; the final frame is highlighted.
    async fn reveal(&mut self, text: &str, renderer: &mut dyn Renderer) {
        renderer.apply(UiUpdate::BeginAssistant);
        let mut reveal = Reveal::new(text, self.reveal_step);
        while let Some(frame) = reveal.next() {
            REVEAL_FRAMES.click();
            renderer.apply(UiUpdate::RevealFrame {
                rendered: self.formatter.render(&frame.visible, frame.is_final),
                is_final: frame.is_final,
            });
            renderer.apply(UiUpdate::ScrollToBottom);
            if frame.is_final {
                break;
            }
            if renderer.should_interrupt() {
                REVEAL_SKIPS.click();
                reveal.cancel();
                continue;
            }
            self.ticker.tick().await;
        }
    }

    fn set_new_chat_active(&mut self, active: bool, renderer: &mut dyn Renderer) {
        if self.state.new_chat_active != active {
            self.state.new_chat_active = active;
            renderer.apply(UiUpdate::NewChatEnabled(!active));
        }
    }
}
