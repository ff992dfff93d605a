//! Language detection delegated to the translation backend

use async_trait::async_trait;
use demeter_application::ports::language::{LanguageDetectionError, LanguageDetector};
use demeter_application::ports::translation::TranslationBackend;
use demeter_domain::LanguageCode;
use std::sync::Arc;
use std::time::Duration;

pub struct BackendLanguageDetector {
    backend: Arc<dyn TranslationBackend>,
    timeout: Duration,
}

impl BackendLanguageDetector {
    pub fn new(backend: Arc<dyn TranslationBackend>) -> Self {
        Self {
            backend,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl LanguageDetector for BackendLanguageDetector {
    async fn detect(&self, text: &str) -> Result<LanguageCode, LanguageDetectionError> {
        match tokio::time::timeout(self.timeout, self.backend.detect_language(text)).await {
            Ok(Ok(language)) => Ok(language),
            Ok(Err(e)) => Err(LanguageDetectionError::Backend(format!(
                "{}: {}",
                self.backend.name(),
                e
            ))),
            Err(_) => Err(LanguageDetectionError::Backend(format!(
                "{}: timed out after {:?}",
                self.backend.name(),
                self.timeout
            ))),
        }
    }
}
