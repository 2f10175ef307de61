// Public modules
pub mod chat_exchange;
pub mod history_message;
pub mod model_info;
pub mod session_summary;

// Re-exports
pub use chat_exchange::{ChatReply, ChatRequest, RenameRequest, StartChatRequest, StartChatResponse};
pub use history_message::{HistoryMessage, MessageRole};
pub use model_info::ModelInfo;
pub use session_summary::SessionSummary;
