//! Application layer for demeter
//!
//! This crate contains the query pipeline use cases, port definitions, the
//! agent registry and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod registry;
pub mod use_cases;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use ports::{
    agent::{Agent, AgentCapabilities, AgentError},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    language::{FixedLanguage, LanguageDetectionError, LanguageDetector},
    progress::{NoProgress, ProgressNotifier},
    store::{KeyValueStore, MemoryStore, StoreError},
    translation::{TranslationBackend, TranslationError},
};
pub use registry::{AgentRegistry, RegisteredAgent};
pub use use_cases::handle_query::{HandleQueryError, HandleQueryUseCase, UNAVAILABLE_ANSWER};
pub use use_cases::route_agent::{AgentRouter, GeneralQueryHandler, RouteOutcome};
pub use use_cases::synthesize::{ResponseSynthesizer, SynthesizedAnswer};
pub use use_cases::translate::{TranslationOutcome, TranslationStatus, Translator};
