//! Translation backend port
//!
//! A remote or local service able to translate text, guess a language and
//! list the languages it handles. Every call may fail; callers treat
//! failures as "keep the original text".

use async_trait::async_trait;
use demeter_domain::LanguageCode;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during translation backend operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    #[error("Translation backend unavailable: {0}")]
    Unavailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,
}

#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Backend name used in logs
    fn name(&self) -> &str;

    /// Translate `text` from `source` into `target`
    async fn translate(
        &self,
        text: &str,
        target: &LanguageCode,
        source: &LanguageCode,
    ) -> Result<String, TranslationError>;

    /// Guess the language of `text`
    async fn detect_language(&self, text: &str) -> Result<LanguageCode, TranslationError>;

    /// Languages the backend handles, code → name
    async fn supported_languages(&self) -> Result<BTreeMap<String, String>, TranslationError>;
}
