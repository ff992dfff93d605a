//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod logging;
mod output;
mod pipeline;
mod translation;

pub use logging::FileLoggingConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use pipeline::FilePipelineConfig;
pub use translation::{
    DetectionMethod, FileCacheConfig, FileDetectionConfig, FileTranslationConfig,
    TranslationBackendKind,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigValidationError {
    #[error("{0} cannot be 0")]
    ZeroTimeout(&'static str),

    #[error("pipeline.min_route_confidence must be within [0, 1], got {0}")]
    ConfidenceOutOfRange(f64),

    #[error("pipeline.working_language cannot be empty")]
    EmptyWorkingLanguage,

    #[error("{field}: invalid language code '{value}'")]
    InvalidLanguage { field: &'static str, value: String },

    #[error("translation.url is required for the libretranslate backend")]
    MissingTranslationUrl,

    #[error("translation.cache_max_entries cannot be 0")]
    ZeroCacheCapacity,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Pipeline knobs
    pub pipeline: FilePipelineConfig,
    /// Translation backend and cache
    pub translation: FileTranslationConfig,
    /// Language detection
    pub detection: FileDetectionConfig,
    /// Query cache
    pub cache: FileCacheConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Diagnostic log and transcript
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = self.pipeline.issues();

        if self.translation.backend == TranslationBackendKind::LibreTranslate
            && self
                .translation
                .url
                .as_deref()
                .is_none_or(|url| url.trim().is_empty())
        {
            issues.push(ConfigValidationError::MissingTranslationUrl);
        }
        if self.translation.cache_max_entries == 0 {
            issues.push(ConfigValidationError::ZeroCacheCapacity);
        }

        issues
    }
}
