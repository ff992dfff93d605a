//! Domain layer for demeter
//!
//! Pure logic with no I/O: the intent set and its two-tier classifier,
//! parameter extraction, agent identities and tagged results, the shared
//! model-or-heuristic predictor, response templates and pipeline stages.
//!
//! # Core Concepts
//!
//! ## Working language
//!
//! Classification, extraction and agents always operate on English text.
//! Translation to and from the caller's language happens around them.
//!
//! ## Fail-soft
//!
//! Every component degrades instead of aborting: the classifier falls back
//! to keyword scoring, extraction omits what it cannot find, and agent
//! failures become [`AgentResult::Failure`] values.

pub mod agent;
pub mod config;
pub mod core;
pub mod intent;
pub mod orchestration;
pub mod parameters;
pub mod response;
pub mod util;

// Re-export commonly used types
pub use agent::{
    entities::{AgentKind, AgentPayload},
    predictor::{InferenceModel, ModelError, Prediction, PredictionSource, Predictor, RuleSet},
    result::{AgentResult, FailureKind},
};
pub use config::OutputFormat;
pub use core::{
    error::DomainError,
    language::{LanguageCode, SUPPORTED_LANGUAGES},
    query::{Context, Query, is_present, number_of},
};
pub use intent::{
    classifier::{ClassifierError, ClassifierMode, IntentClassifier},
    entities::{ClassifiedIntent, Intent},
};
pub use orchestration::stage::Stage;
pub use parameters::{
    extractor::ParameterExtractor,
    value_objects::{ExtractedParameters, Timeframe},
};
pub use response::{entities::Response, template::ResponseTemplate};
