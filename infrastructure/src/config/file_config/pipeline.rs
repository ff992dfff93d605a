//! Pipeline configuration from TOML (`[pipeline]` section)

use demeter_application::PipelineConfig;
use demeter_domain::LanguageCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::ConfigValidationError;

/// Raw pipeline configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePipelineConfig {
    /// Language classification and agents operate in
    pub working_language: String,
    /// Language assumed when detection fails
    pub default_language: String,
    /// Non-crop intents below this confidence go to the general handler
    pub min_route_confidence: f64,
    pub agent_timeout_seconds: u64,
    pub translation_timeout_seconds: u64,
    /// Serve identical repeat queries from the query cache
    pub memoize_responses: bool,
}

impl Default for FilePipelineConfig {
    fn default() -> Self {
        let defaults = PipelineConfig::default();
        Self {
            working_language: defaults.working_language.to_string(),
            default_language: defaults.default_language.to_string(),
            min_route_confidence: defaults.min_route_confidence,
            agent_timeout_seconds: defaults.agent_timeout.as_secs(),
            translation_timeout_seconds: defaults.translation_timeout.as_secs(),
            memoize_responses: defaults.memoize_responses,
        }
    }
}

impl FilePipelineConfig {
    pub(super) fn issues(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        if self.working_language.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyWorkingLanguage);
        } else if self.working_language.parse::<LanguageCode>().is_err() {
            issues.push(ConfigValidationError::InvalidLanguage {
                field: "pipeline.working_language",
                value: self.working_language.clone(),
            });
        }
        if self.default_language.parse::<LanguageCode>().is_err() {
            issues.push(ConfigValidationError::InvalidLanguage {
                field: "pipeline.default_language",
                value: self.default_language.clone(),
            });
        }
        if !(0.0..=1.0).contains(&self.min_route_confidence) {
            issues.push(ConfigValidationError::ConfidenceOutOfRange(
                self.min_route_confidence,
            ));
        }
        if self.agent_timeout_seconds == 0 {
            issues.push(ConfigValidationError::ZeroTimeout("pipeline.agent_timeout_seconds"));
        }
        if self.translation_timeout_seconds == 0 {
            issues.push(ConfigValidationError::ZeroTimeout(
                "pipeline.translation_timeout_seconds",
            ));
        }
        issues
    }

    /// Convert to the application-level config.
    ///
    /// Unparseable languages keep the built-in defaults; `validate` reports them.
    pub fn to_pipeline_config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::default()
            .with_min_route_confidence(self.min_route_confidence)
            .with_agent_timeout(Duration::from_secs(self.agent_timeout_seconds))
            .with_translation_timeout(Duration::from_secs(self.translation_timeout_seconds))
            .with_memoize_responses(self.memoize_responses);
        if let Ok(language) = self.working_language.parse() {
            config = config.with_working_language(language);
        }
        if let Ok(language) = self.default_language.parse() {
            config = config.with_default_language(language);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_application_defaults() {
        let config = FilePipelineConfig::default().to_pipeline_config();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_conversion() {
        let file = FilePipelineConfig {
            default_language: "hi".to_string(),
            agent_timeout_seconds: 5,
            memoize_responses: true,
            ..Default::default()
        };
        let config = file.to_pipeline_config();
        assert_eq!(config.default_language.as_str(), "hi");
        assert_eq!(config.agent_timeout, Duration::from_secs(5));
        assert!(config.memoize_responses);
    }
}
