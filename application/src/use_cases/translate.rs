//! Translator: best-effort translation with a persistent cache.
//!
//! Every failure path (unsupported language, backend error, timeout) hands
//! back the original text. The outcome records what happened so the
//! orchestrator can report it.

use crate::ports::store::KeyValueStore;
use crate::ports::translation::{TranslationBackend, TranslationError};
use demeter_domain::LanguageCode;
use demeter_domain::util::preview;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// How a translation was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationStatus {
    /// Source equals target, or nothing to translate
    Identity,
    /// Served from the cache
    Cached,
    /// Fresh backend translation
    Translated,
    /// Target language is not supported; text left unchanged
    Unsupported,
    /// Backend failed; text left unchanged
    Failed(TranslationError),
}

/// Translated text and how it was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationOutcome {
    pub text: String,
    pub status: TranslationStatus,
}

impl TranslationOutcome {
    fn unchanged(text: &str, status: TranslationStatus) -> Self {
        Self {
            text: text.to_string(),
            status,
        }
    }

    /// Whether translation was needed but did not happen
    pub fn is_degraded(&self) -> bool {
        matches!(
            self.status,
            TranslationStatus::Failed(_) | TranslationStatus::Unsupported
        )
    }
}

/// Cache key for one (source, target, text) triple
pub fn cache_key(source: &LanguageCode, target: &LanguageCode, text: &str) -> String {
    format!("{}:{}:{}", source, target, text)
}

pub struct Translator {
    backend: Arc<dyn TranslationBackend>,
    cache: Arc<dyn KeyValueStore>,
    working_language: LanguageCode,
    timeout: Duration,
}

impl Translator {
    pub fn new(backend: Arc<dyn TranslationBackend>, cache: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            cache,
            working_language: LanguageCode::english(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_working_language(mut self, language: LanguageCode) -> Self {
        self.working_language = language;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn working_language(&self) -> &LanguageCode {
        &self.working_language
    }

    /// Translate caller text into the working language
    pub async fn to_working_language(&self, text: &str, source: &LanguageCode) -> TranslationOutcome {
        let target = self.working_language.clone();
        self.translate(text, source, &target).await
    }

    /// Translate working-language text into the caller's language
    pub async fn from_working_language(
        &self,
        text: &str,
        target: &LanguageCode,
    ) -> TranslationOutcome {
        let source = self.working_language.clone();
        self.translate(text, &source, target).await
    }

    /// Translate `text` from `source` to `target`; never fails.
    pub async fn translate(
        &self,
        text: &str,
        source: &LanguageCode,
        target: &LanguageCode,
    ) -> TranslationOutcome {
        if source == target || text.trim().is_empty() {
            return TranslationOutcome::unchanged(text, TranslationStatus::Identity);
        }
        if !target.is_supported() || !source.is_supported() {
            warn!(
                source = %source,
                target = %target,
                "Unsupported translation pair, keeping original text"
            );
            return TranslationOutcome::unchanged(text, TranslationStatus::Unsupported);
        }

        let key = cache_key(source, target, text);
        match self.cache.read(&key) {
            Ok(Some(Value::String(cached))) => {
                debug!(source = %source, target = %target, "Translation cache hit");
                return TranslationOutcome {
                    text: cached,
                    status: TranslationStatus::Cached,
                };
            }
            Ok(_) => {}
            Err(e) => warn!("Translation cache read failed, treating as miss: {}", e),
        }

        let call = self.backend.translate(text, target, source);
        let result = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(TranslationError::Timeout),
        };

        match result {
            Ok(translated) => {
                if let Err(e) = self.cache.write(&key, Value::String(translated.clone())) {
                    warn!("Translation cache write dropped: {}", e);
                }
                TranslationOutcome {
                    text: translated,
                    status: TranslationStatus::Translated,
                }
            }
            Err(e) => {
                warn!(
                    backend = self.backend.name(),
                    "Translation {} -> {} failed for '{}': {}",
                    source,
                    target,
                    preview(text, 60),
                    e
                );
                TranslationOutcome::unchanged(text, TranslationStatus::Failed(e))
            }
        }
    }

    /// Drop every cached translation
    pub fn clear_cache(&self) {
        if let Err(e) = self.cache.clear() {
            warn!("Failed to clear translation cache: {}", e);
        }
    }
}
