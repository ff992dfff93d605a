//! Intent classifier: context short-circuits, the trained text model with
//! contextual boosting, and a keyword-scoring fallback.

use super::entities::{ClassifiedIntent, Intent};
use super::keywords::{boosters, fallback_pattern, is_help_request};
use super::text_model::TextModel;
use super::training::builtin_examples;
use crate::core::query::{Context, is_present};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Increment per booster keyword found in the text
pub const KEYWORD_BOOST: f64 = 0.05;
/// Upper bound on the total keyword contribution
pub const KEYWORD_BOOST_CAP: f64 = 0.25;
/// Highest confidence the keyword fallback may report
pub const FALLBACK_CEILING: f64 = 0.8;

/// Texts shorter than this (after trimming) carry too little signal
const MIN_TEXT_CHARS: usize = 3;

/// Errors raised while fitting or running the text model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifierError {
    #[error("Training set is empty")]
    EmptyTrainingSet,

    #[error("Training set needs at least two intents, got {0}")]
    TooFewClasses(usize),

    #[error("Training set produced an empty vocabulary")]
    EmptyVocabulary,

    #[error("Model produced non-finite probabilities")]
    NonFiniteScores,
}

/// Which tier the classifier is operating in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierMode {
    /// Trained text model with contextual boosting
    Primary,
    /// Weighted keyword scoring, for the rest of the process lifetime
    Fallback,
}

impl ClassifierMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassifierMode::Primary => "primary",
            ClassifierMode::Fallback => "fallback",
        }
    }
}

/// Two-tier intent classifier.
///
/// Built once at startup and shared read-only. A failed fit, or a failed
/// inference later on, moves it to [`ClassifierMode::Fallback`] permanently.
#[derive(Debug)]
pub struct IntentClassifier {
    model: Option<TextModel>,
    degraded: AtomicBool,
    training_error: Option<ClassifierError>,
}

impl IntentClassifier {
    /// Fit on the built-in labelled examples.
    pub fn new() -> Self {
        Self::from_examples(&builtin_examples())
    }

    /// Fit on the given examples; a fitting error selects the fallback tier.
    pub fn from_examples(examples: &[(Intent, &[&str])]) -> Self {
        match TextModel::fit(examples) {
            Ok(model) => Self {
                model: Some(model),
                degraded: AtomicBool::new(false),
                training_error: None,
            },
            Err(e) => Self {
                model: None,
                degraded: AtomicBool::new(true),
                training_error: Some(e),
            },
        }
    }

    /// Classifier that only ever uses keyword scoring
    pub fn keyword_only() -> Self {
        Self {
            model: None,
            degraded: AtomicBool::new(true),
            training_error: None,
        }
    }

    pub fn mode(&self) -> ClassifierMode {
        if self.model.is_some() && !self.degraded.load(Ordering::Acquire) {
            ClassifierMode::Primary
        } else {
            ClassifierMode::Fallback
        }
    }

    /// Why fitting failed, if it did
    pub fn training_error(&self) -> Option<&ClassifierError> {
        self.training_error.as_ref()
    }

    /// Classify `text`, consulting `context` for short-circuits and boosts.
    ///
    /// The returned confidence is always within `[0, 1]`.
    pub fn classify(&self, text: &str, context: &Context) -> ClassifiedIntent {
        self.classify_traced(text, context).0
    }

    /// Like [`classify`](Self::classify), also returning a model error that
    /// caused this call to switch to the fallback tier.
    pub fn classify_traced(
        &self,
        text: &str,
        context: &Context,
    ) -> (ClassifiedIntent, Option<ClassifierError>) {
        if let Some(shortcut) = context_shortcut(context) {
            return (shortcut, None);
        }

        let trimmed = text.trim();
        if trimmed.chars().count() < MIN_TEXT_CHARS {
            return (ClassifiedIntent::new(Intent::General, 0.3), None);
        }
        if is_help_request(trimmed) {
            return (ClassifiedIntent::new(Intent::General, 0.5), None);
        }

        if let (ClassifierMode::Primary, Some(model)) = (self.mode(), &self.model) {
            match model.predict(trimmed) {
                Ok((intent, probability)) => {
                    let base = ClassifiedIntent::new(intent, probability);
                    return (apply_boosts(base, trimmed, context), None);
                }
                Err(e) => {
                    self.degraded.store(true, Ordering::Release);
                    return (fallback_classify(trimmed), Some(e));
                }
            }
        }

        (fallback_classify(trimmed), None)
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Context fields that decide the intent without looking at the text.
pub fn context_shortcut(context: &Context) -> Option<ClassifiedIntent> {
    if is_present(context.get("image_data")) || is_present(context.get("image_path")) {
        return Some(ClassifiedIntent::new(Intent::PestDetection, 0.95));
    }
    if is_present(context.get("weather_data")) && is_present(context.get("location")) {
        return Some(ClassifiedIntent::new(Intent::RiskAssessment, 0.85));
    }
    if is_present(context.get("financial_context")) {
        return Some(ClassifiedIntent::new(Intent::FinanceAgent, 0.8));
    }
    None
}

/// Raise a model prediction by keyword and context evidence, capped at 1.0.
pub fn apply_boosts(base: ClassifiedIntent, text: &str, context: &Context) -> ClassifiedIntent {
    let lower = text.to_lowercase();
    let hits = boosters(base.intent)
        .iter()
        .filter(|k| lower.contains(*k))
        .count();
    let mut boost = (hits as f64 * KEYWORD_BOOST).min(KEYWORD_BOOST_CAP);

    boost += match base.intent {
        Intent::PestDetection if is_present(context.get("image_data")) => 0.2,
        Intent::RiskAssessment if is_present(context.get("location")) => 0.1,
        Intent::CropRecommendation if is_present(context.get("soil_data")) => 0.15,
        _ => 0.0,
    };

    base.boost(boost)
}

/// Keyword scoring used when the text model is unavailable.
///
/// Ties go to the intent listed first in [`Intent::CLASSIFIABLE`].
pub fn fallback_classify(text: &str) -> ClassifiedIntent {
    let lower = text.to_lowercase();
    let mut best: Option<(Intent, f64)> = None;

    for intent in Intent::CLASSIFIABLE {
        let Some(pattern) = fallback_pattern(intent) else {
            continue;
        };
        let score = pattern.score(&lower);
        if score == 0 {
            continue;
        }
        let normalized = score as f64 / pattern.max_score() as f64;
        if best.is_none_or(|(_, top)| normalized > top) {
            best = Some((intent, normalized));
        }
    }

    match best {
        Some((intent, score)) => ClassifiedIntent::new(intent, score).capped(FALLBACK_CEILING),
        None => ClassifiedIntent::new(Intent::General, 0.4),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx(value: serde_json::Value) -> Context {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_trains_into_primary_mode() {
        let classifier = IntentClassifier::new();
        assert_eq!(classifier.mode(), ClassifierMode::Primary);
        assert!(classifier.training_error().is_none());
    }

    #[test]
    fn test_failed_training_selects_fallback() {
        let classifier = IntentClassifier::from_examples(&[]);
        assert_eq!(classifier.mode(), ClassifierMode::Fallback);
        assert_eq!(
            classifier.training_error(),
            Some(&ClassifierError::EmptyTrainingSet)
        );
    }

    #[test]
    fn test_image_short_circuits_any_text() {
        let classifier = IntentClassifier::new();
        let context = ctx(json!({"image_data": "base64..."}));
        for text in ["", "rice prices", "loan subsidy please", "help"] {
            let result = classifier.classify(text, &context);
            assert_eq!(result.intent, Intent::PestDetection);
            assert_eq!(result.confidence, 0.95);
        }
    }

    #[test]
    fn test_weather_and_location_short_circuit() {
        let classifier = IntentClassifier::new();
        let context = ctx(json!({"weather_data": {"temp": 40}, "location": "Punjab"}));
        let result = classifier.classify("what crop should I plant", &context);
        assert_eq!(result.intent, Intent::RiskAssessment);
        assert_eq!(result.confidence, 0.85);

        // location alone is not enough
        let context = ctx(json!({"location": "Punjab"}));
        let result = classifier.classify("Predict rice prices", &context);
        assert_eq!(result.intent, Intent::MarketYield);
    }

    #[test]
    fn test_financial_flag_short_circuit() {
        let classifier = IntentClassifier::new();
        let context = ctx(json!({"financial_context": true}));
        let result = classifier.classify("what about my farm", &context);
        assert_eq!(result.intent, Intent::FinanceAgent);
        assert_eq!(result.confidence, 0.8);
    }

    #[test]
    fn test_trivial_length_guard() {
        let classifier = IntentClassifier::new();
        let result = classifier.classify("  a ", &Context::new());
        assert_eq!(result.intent, Intent::General);
        assert_eq!(result.confidence, 0.3);
    }

    #[test]
    fn test_help_guard() {
        let classifier = IntentClassifier::new();
        let result = classifier.classify("help", &Context::new());
        assert_eq!(result.intent, Intent::General);
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn test_crop_query_classified_and_boosted() {
        let classifier = IntentClassifier::new();
        let text = "What crop should I plant in sandy soil with pH 6.5?";
        let result = classifier.classify(text, &Context::new());
        assert_eq!(result.intent, Intent::CropRecommendation);

        let base = ClassifiedIntent::new(Intent::CropRecommendation, 0.6);
        let boosted = apply_boosts(base, text, &Context::new());
        // "plant"
        assert!((boosted.confidence - 0.65).abs() < 1e-9);
    }

    #[test]
    fn test_market_query() {
        let classifier = IntentClassifier::new();
        let result = classifier.classify("Predict rice prices for this season", &Context::new());
        assert_eq!(result.intent, Intent::MarketYield);
    }

    #[test]
    fn test_keyword_boost_is_capped() {
        let base = ClassifiedIntent::new(Intent::MarketYield, 0.2);
        let text = "price market yield forecast predict profit";
        let boosted = apply_boosts(base, text, &Context::new());
        assert!((boosted.confidence - 0.45).abs() < 1e-9);
    }

    #[test]
    fn test_context_boost() {
        let base = ClassifiedIntent::new(Intent::CropRecommendation, 0.5);
        let context = ctx(json!({"soil_data": {"ph": 6.5}}));
        let boosted = apply_boosts(base, "zzz", &context);
        assert!((boosted.confidence - 0.65).abs() < 1e-9);
    }

    #[test]
    fn test_boost_never_exceeds_one() {
        let base = ClassifiedIntent::new(Intent::PestDetection, 0.98);
        let context = ctx(json!({"image_data": "x"}));
        let boosted = apply_boosts(base, "pest bug disease identify what is this", &context);
        assert_eq!(boosted.confidence, 1.0);
    }

    #[test]
    fn test_confidence_always_in_unit_interval() {
        let classifier = IntentClassifier::new();
        let texts = [
            "",
            "ok",
            "What crop should I plant?",
            "price price price market market yield forecast predict profit",
            "loan credit subsidy cost budget money",
            "நான் என்ன பயிர் நட வேண்டும்",
        ];
        for text in texts {
            let c = classifier.classify(text, &Context::new()).confidence;
            assert!((0.0..=1.0).contains(&c), "{} -> {}", text, c);
        }
    }

    #[test]
    fn test_fallback_scores_keywords() {
        let result = fallback_classify("I need a loan from the bank");
        assert_eq!(result.intent, Intent::FinanceAgent);
        // loan (3) + bank (1) out of 30
        assert!((result.confidence - 4.0 / 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_fallback_no_hits_is_general() {
        let result = fallback_classify("zzz qqq");
        assert_eq!(result.intent, Intent::General);
        assert_eq!(result.confidence, 0.4);
    }

    #[test]
    fn test_fallback_tie_goes_to_first_declared() {
        // risk and pest both score 3/30
        let tie = fallback_classify("danger pest");
        assert_eq!(tie.intent, Intent::RiskAssessment);
        let tie = fallback_classify("pest danger");
        assert_eq!(tie.intent, Intent::RiskAssessment);
    }

    #[test]
    fn test_fallback_never_exceeds_ceiling() {
        let classifier = IntentClassifier::keyword_only();
        let text = "recommend suggest best crop what to plant which crop soil climate suitable grow plant farming ph nitrogen phosphorus potassium temperature";
        let result = classifier.classify(text, &Context::new());
        assert_eq!(result.intent, Intent::CropRecommendation);
        assert_eq!(result.confidence, FALLBACK_CEILING);
    }
}
