//! Backend used when no translation service is configured

use async_trait::async_trait;
use demeter_application::ports::translation::{TranslationBackend, TranslationError};
use demeter_domain::LanguageCode;
use std::collections::BTreeMap;

const REASON: &str = "offline: no translation service configured";

/// Refuses every call, so the pipeline keeps original texts.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineBackend;

#[async_trait]
impl TranslationBackend for OfflineBackend {
    fn name(&self) -> &str {
        "offline"
    }

    async fn translate(
        &self,
        _text: &str,
        _target: &LanguageCode,
        _source: &LanguageCode,
    ) -> Result<String, TranslationError> {
        Err(TranslationError::Unavailable(REASON.to_string()))
    }

    async fn detect_language(&self, _text: &str) -> Result<LanguageCode, TranslationError> {
        Err(TranslationError::Unavailable(REASON.to_string()))
    }

    async fn supported_languages(&self) -> Result<BTreeMap<String, String>, TranslationError> {
        Err(TranslationError::Unavailable(REASON.to_string()))
    }
}
