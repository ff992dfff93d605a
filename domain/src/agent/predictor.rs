//! Shared model-or-heuristic prediction pattern used by every agent.
//!
//! An agent holds a [`Predictor`]: either a primary model backed by a rule
//! set, or the rule set alone. A failing model call falls back to the rules
//! for that call and the [`Prediction`] records it.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Error raised by an inference model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("model '{model}' failed: {reason}")]
pub struct ModelError {
    pub model: String,
    pub reason: String,
}

impl ModelError {
    pub fn new(model: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            reason: reason.into(),
        }
    }
}

/// An opaque pre-trained model
pub trait InferenceModel<I, O>: Send + Sync {
    fn name(&self) -> &str;

    fn infer(&self, input: &I) -> Result<O, ModelError>;
}

/// Hand-written rules producing an answer for any input
pub type RuleSet<I, O> = Arc<dyn Fn(&I) -> O + Send + Sync>;

/// Where a prediction came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictionSource {
    Model,
    Heuristic,
    /// The model failed and the rules answered instead
    Fallback(ModelError),
}

/// A predicted value and its provenance
#[derive(Debug, Clone)]
pub struct Prediction<O> {
    pub output: O,
    pub source: PredictionSource,
}

impl<O> Prediction<O> {
    /// Whether the rules produced this value
    pub fn fallback_used(&self) -> bool {
        !matches!(self.source, PredictionSource::Model)
    }
}

pub enum Predictor<I, O> {
    Primary {
        model: Arc<dyn InferenceModel<I, O>>,
        rules: RuleSet<I, O>,
    },
    Heuristic(RuleSet<I, O>),
}

impl<I, O> Predictor<I, O> {
    pub fn heuristic(rules: impl Fn(&I) -> O + Send + Sync + 'static) -> Self {
        Predictor::Heuristic(Arc::new(rules))
    }

    /// Attach a primary model, keeping the current rules as fallback
    pub fn with_model(self, model: Arc<dyn InferenceModel<I, O>>) -> Self {
        let rules = match self {
            Predictor::Primary { rules, .. } | Predictor::Heuristic(rules) => rules,
        };
        Predictor::Primary { model, rules }
    }

    pub fn has_model(&self) -> bool {
        matches!(self, Predictor::Primary { .. })
    }

    pub fn predict(&self, input: &I) -> Prediction<O> {
        match self {
            Predictor::Primary { model, rules } => match model.infer(input) {
                Ok(output) => Prediction {
                    output,
                    source: PredictionSource::Model,
                },
                Err(e) => Prediction {
                    output: rules(input),
                    source: PredictionSource::Fallback(e),
                },
            },
            Predictor::Heuristic(rules) => Prediction {
                output: rules(input),
                source: PredictionSource::Heuristic,
            },
        }
    }
}

impl<I, O> fmt::Debug for Predictor<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predictor::Primary { model, .. } => {
                f.debug_struct("Primary").field("model", &model.name()).finish()
            }
            Predictor::Heuristic(_) => f.write_str("Heuristic"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Doubler;

    impl InferenceModel<f64, f64> for Doubler {
        fn name(&self) -> &str {
            "doubler"
        }

        fn infer(&self, input: &f64) -> Result<f64, ModelError> {
            if *input < 0.0 {
                Err(ModelError::new("doubler", "negative input"))
            } else {
                Ok(input * 2.0)
            }
        }
    }

    #[test]
    fn test_heuristic_only() {
        let predictor: Predictor<f64, f64> = Predictor::heuristic(|x| x + 1.0);
        let prediction = predictor.predict(&1.0);
        assert_eq!(prediction.output, 2.0);
        assert_eq!(prediction.source, PredictionSource::Heuristic);
        assert!(prediction.fallback_used());
        assert!(!predictor.has_model());
    }

    #[test]
    fn test_primary_model_used() {
        let predictor = Predictor::heuristic(|x: &f64| x + 1.0).with_model(Arc::new(Doubler));
        let prediction = predictor.predict(&3.0);
        assert_eq!(prediction.output, 6.0);
        assert!(!prediction.fallback_used());
    }

    #[test]
    fn test_model_failure_falls_back_to_rules() {
        let predictor = Predictor::heuristic(|x: &f64| x + 1.0).with_model(Arc::new(Doubler));
        let prediction = predictor.predict(&-3.0);
        assert_eq!(prediction.output, -2.0);
        assert!(matches!(prediction.source, PredictionSource::Fallback(_)));
    }
}
