//! Infrastructure layer for demeter
//!
//! Adapters implementing the ports defined in the application layer:
//! layered configuration files, the JSON file store, language detectors,
//! translation backends, the reference agents and the transcript logger.

pub mod agents;
pub mod config;
pub mod language;
pub mod logging;
pub mod store;
pub mod translation;

// Re-export commonly used types
pub use agents::{
    CropAgent, FinanceAgent, MarketAgent, PestAgent, RiskAgent, default_registry,
};
pub use config::{
    ConfigLoader, ConfigValidationError, DetectionMethod, FileConfig, FileOutputConfig,
    FileOutputFormat, TranslationBackendKind,
};
pub use language::{BackendLanguageDetector, ScriptLanguageDetector};
pub use logging::JsonlConversationLogger;
pub use store::JsonFileStore;
#[cfg(feature = "remote-translation")]
pub use translation::LibreTranslateBackend;
pub use translation::OfflineBackend;
