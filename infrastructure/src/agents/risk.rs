//! Farming risk assessment agent

use super::{fields, number, text};
use async_trait::async_trait;
use demeter_application::ports::agent::{Agent, AgentCapabilities, AgentError};
use demeter_domain::{
    AgentKind, AgentPayload, AgentResult, Context, InferenceModel, PredictionSource, Predictor,
};
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

const HIGH_RISK_PLACES: &[&str] = &["desert", "coastal", "flood-prone", "drought-prone"];
const MEDIUM_RISK_PLACES: &[&str] = &["hills", "semi-arid", "subtropical"];

/// Weather readings, from `weather_data` first and the flat context second
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherConditions {
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall: f64,
    pub wind_speed: f64,
    pub pressure: f64,
    #[serde(skip)]
    pub location: String,
}

impl WeatherConditions {
    pub fn from_context(context: &Context) -> Self {
        let weather = context
            .get("weather_data")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        let reading = |weather_key: &str, keys: &[&str], default: f64| {
            demeter_domain::number_of(weather.get(weather_key))
                .unwrap_or_else(|| number(context, keys, default))
        };
        Self {
            temperature: reading("temperature", &["temperature", "temp"], 25.0),
            humidity: reading("humidity", &["humidity", "hum"], 60.0),
            rainfall: reading("rainfall", &["rainfall", "rain", "recent_rain"], 100.0),
            wind_speed: reading("wind_speed", &["wind_speed"], 10.0),
            pressure: reading("pressure", &["pressure"], 1013.0),
            location: text(context, &["location"]).unwrap_or("unknown").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskEstimate {
    /// `low`, `medium` or `high`
    pub level: String,
    pub scores: BTreeMap<String, f64>,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct RiskFactor {
    factor: &'static str,
    severity: &'static str,
    description: &'static str,
}

/// 0-1 exposure of a place description, higher is riskier
pub fn location_risk(location: &str) -> f64 {
    let lower = location.to_lowercase();
    if HIGH_RISK_PLACES.iter().any(|p| lower.contains(p)) {
        0.8
    } else if MEDIUM_RISK_PLACES.iter().any(|p| lower.contains(p)) {
        0.5
    } else {
        0.3
    }
}

/// Additive threshold scoring used when no model is attached
pub fn heuristic_risk(w: &WeatherConditions) -> RiskEstimate {
    let mut score = 0.0;
    if w.temperature > 35.0 || w.temperature < 5.0 {
        score += 0.3;
    } else if w.temperature > 30.0 || w.temperature < 10.0 {
        score += 0.1;
    }
    if w.humidity > 90.0 || w.humidity < 20.0 {
        score += 0.2;
    }
    if w.rainfall > 200.0 || w.rainfall < 20.0 {
        score += 0.25;
    }
    if w.wind_speed > 25.0 {
        score += 0.15;
    }
    if w.pressure < 990.0 || w.pressure > 1030.0 {
        score += 0.1;
    }
    score += location_risk(&w.location) * 0.2;

    let level = if score > 0.6 {
        "high"
    } else if score > 0.3 {
        "medium"
    } else {
        "low"
    };
    let scores = BTreeMap::from([
        ("high".to_string(), f64::min(1.0, score)),
        (
            "medium".to_string(),
            (1.0 - (score - 0.5_f64).abs()).clamp(0.0, 1.0),
        ),
        ("low".to_string(), f64::max(0.0, 1.0 - score)),
    ]);
    RiskEstimate {
        level: level.to_string(),
        scores,
        confidence: 0.7,
    }
}

fn risk_factors(w: &WeatherConditions) -> Vec<RiskFactor> {
    let factor = |factor, severity, description| RiskFactor {
        factor,
        severity,
        description,
    };
    let mut factors = Vec::new();
    if w.temperature > 35.0 {
        factors.push(factor("extreme_heat", "high", "Extreme heat can cause crop stress and reduce yields"));
    } else if w.temperature < 5.0 {
        factors.push(factor("frost_risk", "high", "Frost can damage or kill crops"));
    }
    if w.humidity > 85.0 {
        factors.push(factor("high_humidity", "medium", "High humidity increases disease and pest risk"));
    } else if w.humidity < 30.0 {
        factors.push(factor("low_humidity", "medium", "Low humidity can stress plants and reduce growth"));
    }
    if w.rainfall > 200.0 {
        factors.push(factor("excessive_rainfall", "high", "Excessive rainfall can cause flooding and root rot"));
    } else if w.rainfall < 25.0 {
        factors.push(factor("drought_risk", "high", "Insufficient rainfall increases drought stress"));
    }
    if w.wind_speed > 25.0 {
        factors.push(factor("strong_winds", "medium", "Strong winds can damage crops and increase water loss"));
    }
    if w.pressure < 995.0 {
        factors.push(factor("low_pressure", "low", "Low pressure may indicate approaching storms"));
    }
    factors
}

fn recommendations(level: &str, factors: &[RiskFactor]) -> Vec<&'static str> {
    let mut advice = match level {
        "high" => vec![
            "Consider delaying planting or harvesting until conditions improve",
            "Use protective measures such as mulching or shade covers",
            "Make sure crop insurance covers potential losses",
        ],
        "medium" => vec![
            "Monitor weather conditions closely",
            "Prepare contingency measures for potential risks",
        ],
        _ => Vec::new(),
    };
    for f in factors {
        let extra: &[&str] = match f.factor {
            "drought_risk" => &[
                "Install irrigation or increase water storage",
                "Consider drought-resistant varieties",
            ],
            "excessive_rainfall" => &[
                "Ensure proper drainage in fields",
                "Consider raised bed cultivation",
            ],
            "extreme_heat" => &[
                "Provide shade or cooling for sensitive crops",
                "Adjust irrigation for increased water needs",
            ],
            "high_humidity" => &[
                "Improve air circulation around crops",
                "Apply preventive fungicide treatments",
            ],
            "strong_winds" => &[
                "Install windbreaks or protective barriers",
                "Stake tall crops securely",
            ],
            _ => &[],
        };
        advice.extend_from_slice(extra);
    }
    if advice.is_empty() {
        advice.push("Conditions look favorable for normal farming activities");
        advice.push("Continue regular monitoring and maintenance");
    }
    advice
}

fn summary(factors: &[RiskFactor]) -> String {
    let title = |f: &RiskFactor| {
        f.factor
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                chars
                    .next()
                    .map(|c| c.to_uppercase().chain(chars).collect::<String>())
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>()
            .join(" ")
    };
    if let Some(high) = factors.iter().find(|f| f.severity == "high") {
        format!("Main concern: {}. Take protective action now.", title(high))
    } else if let Some(first) = factors.first() {
        format!("Monitor: {}. Prepare contingency measures.", title(first))
    } else {
        "No significant risk factors identified.".to_string()
    }
}

pub struct RiskAgent {
    predictor: Predictor<WeatherConditions, RiskEstimate>,
}

impl RiskAgent {
    pub fn new() -> Self {
        Self {
            predictor: Predictor::heuristic(heuristic_risk),
        }
    }

    pub fn with_model(
        mut self,
        model: Arc<dyn InferenceModel<WeatherConditions, RiskEstimate>>,
    ) -> Self {
        self.predictor = self.predictor.with_model(model);
        self
    }
}

impl Default for RiskAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for RiskAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Risk
    }

    fn capabilities(&self) -> AgentCapabilities {
        AgentCapabilities::predict_only()
            .with_process_query()
            .with_formatter()
    }

    async fn predict(&self, payload: &AgentPayload) -> Result<AgentResult, AgentError> {
        let context = &payload.context;
        let weather = WeatherConditions::from_context(context);
        let crop = text(context, &["crop", "crop_type"]).unwrap_or("general crops");
        let time_period = text(context, &["time_period"]).unwrap_or("this season");

        let prediction = self.predictor.predict(&weather);
        if let PredictionSource::Fallback(e) = &prediction.source {
            warn!("Risk model failed, using threshold scoring: {}", e);
        }
        let estimate = &prediction.output;
        let factors = risk_factors(&weather);
        let advice = recommendations(&estimate.level, &factors);
        debug!(level = %estimate.level, factors = factors.len(), "Risk assessed");

        let message = format!(
            "Risk assessment for {} in {}: {} risk level. {}",
            crop,
            weather.location,
            estimate.level.to_uppercase(),
            summary(&factors)
        );
        let result = fields(json!({
            "location": weather.location,
            "crop": crop,
            "time_period": time_period,
            "overall_risk_level": estimate.level,
            "risk_scores": estimate.scores,
            "confidence": estimate.confidence,
            "risk_factors": factors,
            "recommendations": advice,
            "weather_conditions": weather,
            "fallback_used": prediction.fallback_used(),
        }));
        Ok(AgentResult::success(result).with_message(message))
    }

    fn format_result_text(&self, result: &AgentResult, _context: &Context) -> Option<String> {
        if let AgentResult::Failure { detail, .. } = result {
            return Some(format!("Unable to assess farming risks: {}", detail));
        }
        demeter_domain::ResponseTemplate::render(
            demeter_domain::Intent::RiskAssessment,
            result.payload(),
        )
    }
}
