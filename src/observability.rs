use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("chatpane.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("chatpane.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("chatpane.client.request_duration_seconds");

pub(crate) static CHAT_MESSAGES_SENT: Counter = Counter::new("chatpane.chat.messages_sent");
pub(crate) static CHAT_SEND_FAILURES: Counter = Counter::new("chatpane.chat.send_failures");
pub(crate) static CHAT_SESSIONS_STARTED: Counter = Counter::new("chatpane.chat.sessions_started");
pub(crate) static CHAT_RENAMES: Counter = Counter::new("chatpane.chat.renames");
pub(crate) static CHAT_DELETES: Counter = Counter::new("chatpane.chat.deletes");
pub(crate) static CHAT_BACKGROUND_ERRORS: Counter =
    Counter::new("chatpane.chat.background_errors");

pub(crate) static REVEAL_FRAMES: Counter = Counter::new("chatpane.reveal.frames");
pub(crate) static REVEAL_SKIPS: Counter = Counter::new("chatpane.reveal.skips");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&CHAT_MESSAGES_SENT);
    collector.register_counter(&CHAT_SEND_FAILURES);
    collector.register_counter(&CHAT_SESSIONS_STARTED);
    collector.register_counter(&CHAT_RENAMES);
    collector.register_counter(&CHAT_DELETES);
    collector.register_counter(&CHAT_BACKGROUND_ERRORS);

    collector.register_counter(&REVEAL_FRAMES);
    collector.register_counter(&REVEAL_SKIPS);
}
