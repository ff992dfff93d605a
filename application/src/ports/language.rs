//! Language detection port

use async_trait::async_trait;
use demeter_domain::LanguageCode;
use thiserror::Error;

/// Raised when no confident language guess can be made
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LanguageDetectionError {
    #[error("Language could not be determined: {0}")]
    Inconclusive(String),

    #[error("Detection backend failed: {0}")]
    Backend(String),
}

/// Identifies the source language of free text.
///
/// Very short or mixed-language text may give unreliable guesses.
#[async_trait]
pub trait LanguageDetector: Send + Sync {
    async fn detect(&self, text: &str) -> Result<LanguageCode, LanguageDetectionError>;
}

/// Detector that always answers with one fixed language
pub struct FixedLanguage(pub LanguageCode);

#[async_trait]
impl LanguageDetector for FixedLanguage {
    async fn detect(&self, _text: &str) -> Result<LanguageCode, LanguageDetectionError> {
        Ok(self.0.clone())
    }
}
