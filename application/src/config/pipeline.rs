//! Pipeline parameters: use case control.
//!
//! [`PipelineConfig`] groups the static knobs of the query pipeline. Values
//! come from the infrastructure config loader; this type only holds them.

use demeter_domain::LanguageCode;
use std::time::Duration;

/// Query pipeline control parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Language classification and agents operate in
    pub working_language: LanguageCode,
    /// Substituted when detection fails or the text is empty
    pub default_language: LanguageCode,
    /// Non-crop intents below this confidence go to the general handler
    pub min_route_confidence: f64,
    /// Deadline for one agent call
    pub agent_timeout: Duration,
    /// Deadline for one translation backend call
    pub translation_timeout: Duration,
    /// Serve repeated identical queries from the query cache
    pub memoize_responses: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            working_language: LanguageCode::english(),
            default_language: LanguageCode::english(),
            min_route_confidence: 0.1,
            agent_timeout: Duration::from_secs(30),
            translation_timeout: Duration::from_secs(10),
            memoize_responses: false,
        }
    }
}

impl PipelineConfig {
    // ==================== Builder Methods ====================

    pub fn with_working_language(mut self, language: LanguageCode) -> Self {
        self.working_language = language;
        self
    }

    pub fn with_default_language(mut self, language: LanguageCode) -> Self {
        self.default_language = language;
        self
    }

    pub fn with_min_route_confidence(mut self, confidence: f64) -> Self {
        self.min_route_confidence = confidence;
        self
    }

    pub fn with_agent_timeout(mut self, timeout: Duration) -> Self {
        self.agent_timeout = timeout;
        self
    }

    pub fn with_translation_timeout(mut self, timeout: Duration) -> Self {
        self.translation_timeout = timeout;
        self
    }

    pub fn with_memoize_responses(mut self, enabled: bool) -> Self {
        self.memoize_responses = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert!(config.working_language.is_english());
        assert_eq!(config.min_route_confidence, 0.1);
        assert_eq!(config.agent_timeout, Duration::from_secs(30));
        assert_eq!(config.translation_timeout, Duration::from_secs(10));
        assert!(!config.memoize_responses);
    }

    #[test]
    fn test_builder() {
        let config = PipelineConfig::default()
            .with_min_route_confidence(0.3)
            .with_agent_timeout(Duration::from_millis(500))
            .with_memoize_responses(true);
        assert_eq!(config.min_route_confidence, 0.3);
        assert_eq!(config.agent_timeout, Duration::from_millis(500));
        assert!(config.memoize_responses);
    }
}
