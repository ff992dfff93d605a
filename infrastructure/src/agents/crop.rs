//! Crop recommendation agent

use super::{fields, number};
use async_trait::async_trait;
use demeter_application::ports::agent::{Agent, AgentCapabilities, AgentError};
use demeter_domain::{
    AgentKind, AgentPayload, AgentResult, Context, InferenceModel, Predictor, number_of,
};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, warn};

const TOP_N: usize = 3;

/// Model features, in feature-vector order
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SoilClimate {
    #[serde(rename = "N")]
    pub n: f64,
    #[serde(rename = "P")]
    pub p: f64,
    #[serde(rename = "K")]
    pub k: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub ph: f64,
    pub rainfall: f64,
}

impl SoilClimate {
    /// Read the features from a normalized payload context
    pub fn from_context(context: &Context) -> Self {
        Self {
            n: number(context, &["N", "nitrogen"], 90.0),
            p: number(context, &["P", "phosphorus"], 42.0),
            k: number(context, &["K", "potassium"], 43.0),
            temperature: number(context, &["temperature", "temp"], 25.0),
            humidity: number(context, &["humidity"], 80.0),
            ph: number(context, &["ph", "pH"], 6.5),
            rainfall: number(context, &["rainfall", "rain"], 200.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropScore {
    pub crop: String,
    pub confidence: f64,
}

impl CropScore {
    fn new(crop: &str, confidence: f64) -> Self {
        Self {
            crop: crop.to_string(),
            confidence,
        }
    }
}

/// Condition-table scoring used when no model is attached
pub fn heuristic_scores(f: &SoilClimate) -> Vec<CropScore> {
    let pick = |ok: bool, hit: f64, miss: f64| if ok { hit } else { miss };
    let mut scores = vec![
        CropScore::new(
            "rice",
            pick(
                f.rainfall > 150.0 && (5.0..=6.8).contains(&f.ph) && f.humidity > 70.0,
                0.6,
                0.3,
            ),
        ),
        CropScore::new(
            "wheat",
            pick(f.temperature < 20.0 && f.rainfall < 100.0, 0.55, 0.25),
        ),
        CropScore::new(
            "maize",
            pick(
                (20.0..=30.0).contains(&f.temperature) && (100.0..=200.0).contains(&f.rainfall),
                0.5,
                0.2,
            ),
        ),
        CropScore::new("cotton", pick(f.ph > 7.0 && f.rainfall < 80.0, 0.45, 0.15)),
        CropScore::new(
            "chickpea",
            pick(f.temperature > 25.0 && f.rainfall < 120.0, 0.4, 0.1),
        ),
        CropScore::new(
            "kidneybeans",
            pick(f.humidity > 65.0 && (6.0..=7.5).contains(&f.ph), 0.35, 0.05),
        ),
    ];
    // Stable: equal scores keep table order
    scores.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    scores
}

pub struct CropAgent {
    predictor: Predictor<SoilClimate, Vec<CropScore>>,
}

impl CropAgent {
    pub fn new() -> Self {
        Self {
            predictor: Predictor::heuristic(heuristic_scores),
        }
    }

    /// Use a trained classifier, keeping the condition table as fallback
    pub fn with_model(mut self, model: Arc<dyn InferenceModel<SoilClimate, Vec<CropScore>>>) -> Self {
        self.predictor = self.predictor.with_model(model);
        self
    }
}

impl Default for CropAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for CropAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Crop
    }

    fn capabilities(&self) -> AgentCapabilities {
        AgentCapabilities::predict_only()
            .with_process_query()
            .with_formatter()
    }

    async fn predict(&self, payload: &AgentPayload) -> Result<AgentResult, AgentError> {
        let features = SoilClimate::from_context(&payload.context);
        let prediction = self.predictor.predict(&features);
        if let demeter_domain::PredictionSource::Fallback(e) = &prediction.source {
            warn!("Crop model failed, using condition table: {}", e);
        }
        let fallback_used = prediction.fallback_used();

        let mut ranked = prediction.output;
        ranked.truncate(TOP_N);
        let Some(top) = ranked.first().cloned() else {
            return Err(AgentError::PredictionFailed(
                "no crop candidates produced".to_string(),
            ));
        };
        debug!(crop = %top.crop, confidence = top.confidence, fallback_used, "Crop recommended");

        let lead = if fallback_used {
            "Based on basic heuristics, I recommend growing:"
        } else {
            "Based on your soil and climate conditions, I recommend growing:"
        };
        let mut message = lead.to_string();
        for (i, score) in ranked.iter().enumerate() {
            message.push_str(&format!(
                "\n{}. {} (Confidence: {:.1}%)",
                i + 1,
                score.crop,
                score.confidence * 100.0
            ));
        }

        let result = fields(json!({
            "top_crop": top.crop,
            "recommended_crops": ranked.iter().map(|s| s.crop.as_str()).collect::<Vec<_>>(),
            "detailed_recommendations": ranked,
            "confidence": top.confidence,
            "features_used": features,
            "fallback_used": fallback_used,
        }));
        Ok(AgentResult::success(result).with_message(message))
    }

    fn format_result_text(&self, result: &AgentResult, _context: &Context) -> Option<String> {
        let payload = result.payload();
        let detailed = payload
            .get("detailed_recommendations")
            .and_then(Value::as_array)
            .filter(|items| !items.is_empty());
        let Some(items) = detailed else {
            return Some("No crop recommendations available.".to_string());
        };

        let mut text = String::from("Top crop recommendations:");
        for (i, item) in items.iter().enumerate() {
            let crop = item.get("crop").and_then(Value::as_str).unwrap_or("unknown");
            let confidence = number_of(item.get("confidence"))
                .map(|c| format!("{:.1}%", c * 100.0))
                .unwrap_or_else(|| "N/A".to_string());
            text.push_str(&format!("\n{}. {} (Confidence: {})", i + 1, crop, confidence));
        }
        if payload.get("fallback_used").and_then(Value::as_bool) == Some(true) {
            text.push_str("\n(Using basic heuristics because no model is loaded)");
        }
        Some(text)
    }
}
