//! Response synthesizer.
//!
//! Precedence for the English answer:
//! 1. the `message` carried by the agent result
//! 2. the built-in template for the answering intent
//! 3. the agent's own `format_result_text`, when it announces one
//! 4. a generic rendering of the payload
//!
//! A failure without a message gets an apology naming the cause.

use crate::registry::AgentRegistry;
use crate::use_cases::translate::{TranslationOutcome, Translator};
use demeter_domain::{AgentKind, AgentResult, Context, Intent, LanguageCode, ResponseTemplate};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Rendered answer in English and in the caller's language
#[derive(Debug, Clone)]
pub struct SynthesizedAnswer {
    pub english: String,
    pub localized: TranslationOutcome,
}

pub struct ResponseSynthesizer {
    registry: Arc<AgentRegistry>,
    translator: Arc<Translator>,
}

impl ResponseSynthesizer {
    pub fn new(registry: Arc<AgentRegistry>, translator: Arc<Translator>) -> Self {
        Self {
            registry,
            translator,
        }
    }

    /// Render `result` in English and translate it into `language`.
    pub async fn synthesize(
        &self,
        result: &AgentResult,
        intent: Intent,
        agent_used: Option<AgentKind>,
        context: &Context,
        language: &LanguageCode,
    ) -> SynthesizedAnswer {
        let english = self.render(result, intent, agent_used, context);
        let localized = self.localize(&english, language).await;
        SynthesizedAnswer { english, localized }
    }

    /// English answer for `result`.
    ///
    /// When an agent answered, its own intent selects the template, so a
    /// general query retried through the crop agent reads as a crop answer.
    pub fn render(
        &self,
        result: &AgentResult,
        intent: Intent,
        agent_used: Option<AgentKind>,
        context: &Context,
    ) -> String {
        if let Some(message) = result.message().filter(|m| !m.trim().is_empty()) {
            return message.to_string();
        }

        if let AgentResult::Failure { detail, .. } = result {
            return apology(detail);
        }

        let answering_intent = agent_used.as_ref().map(AgentKind::intent).unwrap_or(intent);
        let templated = ResponseTemplate::knows(answering_intent)
            .then(|| ResponseTemplate::render(answering_intent, result.payload()))
            .flatten();
        if let Some(text) = templated {
            return text;
        }

        if let Some(text) = self.agent_formatted(result, agent_used, context) {
            return text;
        }

        debug!(intent = %answering_intent, "No template or formatter, rendering payload");
        generic_text(result.payload())
    }

    /// Translate an English text into `language`; keeps the English on failure.
    pub async fn localize(&self, english: &str, language: &LanguageCode) -> TranslationOutcome {
        self.translator.from_working_language(english, language).await
    }

    fn agent_formatted(
        &self,
        result: &AgentResult,
        agent_used: Option<AgentKind>,
        context: &Context,
    ) -> Option<String> {
        let registered = self.registry.get(agent_used?)?;
        if !registered.capabilities.format_result_text {
            return None;
        }
        registered
            .agent
            .format_result_text(result, context)
            .filter(|text| !text.trim().is_empty())
    }
}

fn apology(detail: &str) -> String {
    if detail.trim().is_empty() {
        "Sorry, I could not complete your request. Please try again or rephrase your question."
            .to_string()
    } else {
        format!(
            "Sorry, I could not complete your request ({}). Please try again or rephrase your question.",
            detail
        )
    }
}

/// Plain `key: value` rendering of a payload
fn generic_text(payload: &Context) -> String {
    if payload.is_empty() {
        return "Your request was processed, but there is nothing to report.".to_string();
    }
    let parts: Vec<String> = payload
        .iter()
        .map(|(key, value)| format!("{}: {}", key.replace('_', " "), plain(value)))
        .collect();
    format!("Result: {}.", parts.join("; "))
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(plain).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}
