//! Pest and disease detection agent

use super::{fields, text};
use async_trait::async_trait;
use demeter_application::ports::agent::{Agent, AgentCapabilities, AgentError};
use demeter_domain::{
    AgentKind, AgentPayload, AgentResult, Context, FailureKind, InferenceModel, PredictionSource,
    Predictor, is_present,
};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, warn};

/// Minimum likelihood for a pest to be reported
const REPORT_THRESHOLD: f64 = 0.1;
const TOP_N: usize = 3;
const NO_TREATMENT: &str = "No specific treatment needed - monitor regularly";

/// Symptom to (pest, weight) evidence
const SYMPTOM_EVIDENCE: &[(&str, &[(&str, f64)])] = &[
    ("curling", &[("Aphids", 0.6), ("Whiteflies", 0.3)]),
    ("yellowing", &[("Spider Mites", 0.4), ("Whiteflies", 0.4), ("Aphids", 0.3)]),
    ("spots", &[("Thrips", 0.4), ("Spider Mites", 0.3)]),
    ("holes", &[("Caterpillars", 0.7), ("Leaf Miners", 0.2)]),
    ("wilting", &[("Scale Insects", 0.4), ("Aphids", 0.2)]),
    ("stunted", &[("Aphids", 0.3), ("Scale Insects", 0.3)]),
    ("discoloration", &[("Thrips", 0.4), ("Leaf Miners", 0.3)]),
    ("browning", &[("Spider Mites", 0.3), ("Leaf Miners", 0.3)]),
    ("drying", &[("Spider Mites", 0.3), ("Scale Insects", 0.2)]),
    ("rotting", &[("Caterpillars", 0.2)]),
];

/// What the farmer reported or attached
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PestObservation {
    pub has_image: bool,
    pub symptoms: Vec<String>,
    pub affected_parts: Vec<String>,
    pub crop: Option<String>,
}

impl PestObservation {
    pub fn from_context(context: &Context) -> Self {
        Self {
            has_image: is_present(context.get("image_data")),
            symptoms: list(context.get("symptoms")),
            affected_parts: list(context.get("affected_parts")),
            crop: text(context, &["crop", "crop_type"]).map(str::to_string),
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.has_image && self.symptoms.is_empty()
    }
}

/// Array of strings, or a comma separated string
fn list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PestScore {
    pub name: String,
    pub confidence: f64,
}

impl PestScore {
    pub fn new(name: impl Into<String>, confidence: f64) -> Self {
        Self {
            name: name.into(),
            confidence,
        }
    }

    pub fn severity(&self) -> &'static str {
        if self.confidence > 0.8 {
            "High"
        } else if self.confidence > 0.5 {
            "Medium"
        } else {
            "Low"
        }
    }
}

/// Sum symptom evidence per pest, strongest first
pub fn heuristic_scores(observation: &PestObservation) -> Vec<PestScore> {
    let mut scores: Vec<PestScore> = Vec::new();
    for symptom in &observation.symptoms {
        let Some((_, evidence)) = SYMPTOM_EVIDENCE
            .iter()
            .find(|(name, _)| symptom.contains(name))
        else {
            continue;
        };
        for (pest, weight) in evidence.iter() {
            match scores.iter_mut().find(|s| s.name == *pest) {
                Some(score) => score.confidence = f64::min(0.95, score.confidence + weight),
                None => scores.push(PestScore::new(*pest, *weight)),
            }
        }
    }
    scores.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    scores
}

fn treatment(pest: &PestScore) -> Option<&'static str> {
    match pest.name.as_str() {
        "Aphids" if pest.severity() == "High" => Some("Apply systemic insecticide immediately"),
        "Aphids" => Some("Use neem oil spray or introduce ladybugs"),
        "Spider Mites" => Some("Increase humidity and apply miticide"),
        "Whiteflies" => Some("Use yellow sticky traps and insecticidal soap"),
        "Thrips" => Some("Use blue sticky traps and spray spinosad"),
        "Caterpillars" => Some("Hand-pick larvae and spray Bacillus thuringiensis"),
        "Leaf Miners" => Some("Remove mined leaves and apply neem oil"),
        "Scale Insects" => Some("Prune infested shoots and apply horticultural oil"),
        _ => None,
    }
}

pub fn treatments(pests: &[PestScore]) -> Vec<&'static str> {
    let mut advice: Vec<&'static str> = Vec::new();
    for t in pests.iter().filter_map(treatment) {
        if !advice.contains(&t) {
            advice.push(t);
        }
    }
    if advice.is_empty() {
        advice.push(NO_TREATMENT);
    }
    advice
}

pub struct PestAgent {
    predictor: Predictor<PestObservation, Vec<PestScore>>,
}

impl PestAgent {
    pub fn new() -> Self {
        Self {
            predictor: Predictor::heuristic(heuristic_scores),
        }
    }

    /// Use an image classifier, keeping symptom scoring as fallback
    pub fn with_model(
        mut self,
        model: Arc<dyn InferenceModel<PestObservation, Vec<PestScore>>>,
    ) -> Self {
        self.predictor = self.predictor.with_model(model);
        self
    }
}

impl Default for PestAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for PestAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Pest
    }

    fn capabilities(&self) -> AgentCapabilities {
        AgentCapabilities::predict_only()
            .with_process_query()
            .with_formatter()
    }

    async fn predict(&self, payload: &AgentPayload) -> Result<AgentResult, AgentError> {
        let observation = PestObservation::from_context(&payload.context);
        if observation.is_empty() {
            return Ok(AgentResult::failure(
                FailureKind::InvalidInput,
                "No image data or symptoms provided for pest detection",
            )
            .with_message(
                "Please attach a photo of the affected plant or describe the symptoms you see, \
                 for example yellowing leaves or holes.",
            ));
        }

        let prediction = self.predictor.predict(&observation);
        if let PredictionSource::Fallback(e) = &prediction.source {
            warn!("Pest model failed, using symptom scoring: {}", e);
        }
        let fallback_used = prediction.fallback_used();
        let mut pests = prediction.output;
        pests.retain(|p| p.confidence > REPORT_THRESHOLD);
        pests.truncate(TOP_N);
        debug!(detected = pests.len(), fallback_used, "Pests scored");

        let detected: Vec<Value> = pests
            .iter()
            .map(|p| json!({"name": p.name, "confidence": p.confidence, "severity": p.severity()}))
            .collect();
        let mut result = AgentResult::success(fields(json!({
            "crop": observation.crop,
            "symptoms": observation.symptoms,
            "affected_parts": observation.affected_parts,
            "detected_pests": detected,
            "confidence_scores": pests.iter().map(|p| p.confidence).collect::<Vec<_>>(),
            "treatment_recommendations": treatments(&pests),
            "fallback_used": fallback_used,
        })));
        if pests.is_empty() && observation.symptoms.is_empty() {
            result = result.with_message(
                "I could not analyse the photo because no pest model is loaded. \
                 Describe the symptoms you see and I can suggest likely pests.",
            );
        }
        Ok(result)
    }

    fn format_result_text(&self, result: &AgentResult, _context: &Context) -> Option<String> {
        if let AgentResult::Failure { detail, .. } = result {
            return Some(format!("Pest detection failed: {}", detail));
        }
        demeter_domain::ResponseTemplate::render(
            demeter_domain::Intent::PestDetection,
            result.payload(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use demeter_domain::ModelError;

    struct SeesAphids;

    impl InferenceModel<PestObservation, Vec<PestScore>> for SeesAphids {
        fn name(&self) -> &str {
            "sees-aphids"
        }

        fn infer(&self, input: &PestObservation) -> Result<Vec<PestScore>, ModelError> {
            if !input.has_image {
                return Err(ModelError::new("sees-aphids", "no image"));
            }
            Ok(vec![PestScore::new("Aphids", 0.9), PestScore::new("Healthy", 0.05)])
        }
    }

    fn payload(value: Value) -> AgentPayload {
        AgentPayload::new("what is eating my plant", fields(value))
    }

    #[test]
    fn test_observation_accepts_list_or_string() {
        let a = PestObservation::from_context(&fields(json!({"symptoms": ["Yellowing", "holes"]})));
        let b = PestObservation::from_context(&fields(json!({"symptoms": "yellowing, holes"})));
        assert_eq!(a.symptoms, b.symptoms);
        assert!(!a.has_image);
    }

    #[test]
    fn test_severity_bands() {
        assert_eq!(PestScore::new("Aphids", 0.81).severity(), "High");
        assert_eq!(PestScore::new("Aphids", 0.8).severity(), "Medium");
        assert_eq!(PestScore::new("Aphids", 0.5).severity(), "Low");
    }

    #[test]
    fn test_symptom_evidence_accumulates() {
        let observation = PestObservation {
            symptoms: vec!["curling".into(), "stunted".into()],
            ..Default::default()
        };
        let scores = heuristic_scores(&observation);
        assert_eq!(scores[0].name, "Aphids");
        assert!((scores[0].confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_treatments_default_and_dedup() {
        assert_eq!(treatments(&[]), vec![NO_TREATMENT]);
        let pests = [PestScore::new("Whiteflies", 0.4), PestScore::new("Whiteflies", 0.3)];
        assert_eq!(treatments(&pests).len(), 1);
    }

    #[tokio::test]
    async fn test_nothing_to_inspect_is_invalid_input() {
        let result = PestAgent::new().predict(&payload(json!({}))).await.unwrap();
        assert_eq!(result.failure_kind(), Some(FailureKind::InvalidInput));
        assert!(result.message().unwrap().starts_with("Please attach a photo"));
    }

    #[tokio::test]
    async fn test_holes_point_to_caterpillars() {
        let agent = PestAgent::new();
        let result = agent
            .predict(&payload(json!({"symptoms": ["holes"], "affected_parts": ["leaves"]})))
            .await
            .unwrap();
        let pests = result.payload()["detected_pests"].as_array().unwrap();
        assert_eq!(pests[0]["name"], "Caterpillars");
        assert_eq!(pests[0]["severity"], "Medium");

        let text = agent.format_result_text(&result, &Context::new()).unwrap();
        assert_eq!(
            text,
            "The most likely problem is Caterpillars (Medium severity). \
             Suggested treatment: Hand-pick larvae and spray Bacillus thuringiensis."
        );
    }

    #[tokio::test]
    async fn test_image_model_drops_low_scores() {
        let agent = PestAgent::new().with_model(Arc::new(SeesAphids));
        let result = agent
            .predict(&payload(json!({"image_data": "aGVsbG8="})))
            .await
            .unwrap();
        let pests = result.payload()["detected_pests"].as_array().unwrap();
        assert_eq!(pests.len(), 1);
        assert_eq!(
            result.payload()["treatment_recommendations"],
            json!(["Apply systemic insecticide immediately"])
        );
        assert_eq!(result.payload()["fallback_used"], json!(false));
    }

    #[tokio::test]
    async fn test_image_without_model_asks_for_symptoms() {
        let result = PestAgent::new()
            .predict(&payload(json!({"image_data": "aGVsbG8="})))
            .await
            .unwrap();
        assert!(result.is_success());
        assert!(result.message().unwrap().contains("Describe the symptoms"));
    }
}
