//! Port for the structured query transcript.
//!
//! Separate from `tracing` diagnostics: this records one machine-readable
//! event per pipeline milestone (query received, intent classified, agent
//! result, response) so a session can be replayed or audited.

use serde_json::Value;

/// Event emitted when a query enters the pipeline
pub const QUERY_RECEIVED: &str = "query_received";
/// Event emitted after classification
pub const INTENT_CLASSIFIED: &str = "intent_classified";
/// Event emitted after agent dispatch
pub const AGENT_RESULT: &str = "agent_result";
/// Event emitted with the final response
pub const RESPONSE: &str = "response";

/// One transcript event: a type tag and its fields
pub struct ConversationEvent {
    pub event_type: &'static str,
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Sink for transcript events.
///
/// `log` is synchronous and infallible; adapters swallow their own I/O errors.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Transcript disabled
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
