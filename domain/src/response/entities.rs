//! The final response returned to the caller

use crate::agent::entities::AgentKind;
use crate::agent::result::{AgentResult, FailureKind};
use crate::core::language::LanguageCode;
use crate::intent::entities::Intent;
use crate::parameters::value_objects::ExtractedParameters;
use serde::{Deserialize, Serialize};

/// Answer to one query (Entity)
///
/// Always carries a non-empty `answer`, even when `success` is false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub language: LanguageCode,
    pub intent: Intent,
    pub confidence: f64,
    pub agent_used: Option<AgentKind>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub result: AgentResult,
    pub answer: String,
    #[serde(default)]
    pub parameters: ExtractedParameters,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Response {
    /// "Service unavailable" response for an unrecoverable internal state
    pub fn unavailable(language: LanguageCode, detail: impl Into<String>, answer: impl Into<String>) -> Self {
        let result = AgentResult::failure(FailureKind::Unavailable, detail);
        Self {
            language,
            intent: Intent::General,
            confidence: 0.0,
            agent_used: None,
            success: false,
            error: result.error_text(),
            result,
            answer: answer.into(),
            parameters: ExtractedParameters::new(),
            warnings: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_response() {
        let response = Response::unavailable(
            LanguageCode::english(),
            "no agents registered",
            "The service is temporarily unavailable.",
        );
        assert!(!response.success);
        assert!(response.agent_used.is_none());
        assert_eq!(
            response.error.as_deref(),
            Some("unavailable: no agents registered")
        );
        assert!(!response.answer.is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let response = Response::unavailable(LanguageCode::english(), "x", "y");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["language"], "en");
        assert_eq!(value["intent"], "general");
        assert_eq!(value["agent_used"], serde_json::Value::Null);
        assert!(value.get("warnings").is_none());
    }
}
