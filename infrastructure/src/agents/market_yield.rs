//! Market price and yield agent

use super::{fields, number, text};
use async_trait::async_trait;
use demeter_application::ports::agent::{Agent, AgentCapabilities, AgentError};
use demeter_domain::{
    AgentKind, AgentPayload, AgentResult, Context, InferenceModel, PredictionSource, Predictor,
    number_of,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

/// Price per kg when no price model is loaded
const DEFAULT_PRICE: f64 = 18.0;
/// Yield when no yield model is loaded
const DEFAULT_YIELD: f64 = 3.0;
const DEFAULT_COST: f64 = 8000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketInput {
    pub crop: Option<String>,
    pub month: u32,
    pub area: f64,
    pub ph: f64,
    pub rainfall: f64,
    pub temperature: f64,
}

impl MarketInput {
    pub fn from_context(context: &Context) -> Self {
        let month = number(context, &["month"], 7.0).clamp(1.0, 12.0) as u32;
        Self {
            crop: text(context, &["crop", "crop_type"]).map(str::to_string),
            month,
            area: number(context, &["area", "area_acres"], 1.0),
            ph: number(context, &["ph"], 6.5),
            rainfall: number(context, &["rain", "rainfall"], 120.0),
            temperature: number(context, &["temp", "temperature"], 25.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketEstimate {
    pub price_per_kg: f64,
    pub yield_estimate: f64,
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

pub struct MarketAgent {
    predictor: Predictor<MarketInput, MarketEstimate>,
}

impl MarketAgent {
    pub fn new() -> Self {
        Self {
            predictor: Predictor::heuristic(|_: &MarketInput| MarketEstimate {
                price_per_kg: DEFAULT_PRICE,
                yield_estimate: DEFAULT_YIELD,
            }),
        }
    }

    pub fn with_model(mut self, model: Arc<dyn InferenceModel<MarketInput, MarketEstimate>>) -> Self {
        self.predictor = self.predictor.with_model(model);
        self
    }
}

impl Default for MarketAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for MarketAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::MarketYield
    }

    fn capabilities(&self) -> AgentCapabilities {
        AgentCapabilities::predict_only().with_formatter()
    }

    async fn predict(&self, payload: &AgentPayload) -> Result<AgentResult, AgentError> {
        let input = MarketInput::from_context(&payload.context);
        if input.area <= 0.0 {
            return Err(AgentError::InvalidInput(format!(
                "farm area must be positive, got {}",
                input.area
            )));
        }

        let prediction = self.predictor.predict(&input);
        if let PredictionSource::Fallback(e) = &prediction.source {
            warn!("Market model failed, using default estimates: {}", e);
        }
        let estimate = prediction.output;
        let cost = number(&payload.context, &["cost"], DEFAULT_COST);
        let revenue = estimate.price_per_kg * estimate.yield_estimate * input.area;
        let profit = revenue - cost;
        debug!(price = estimate.price_per_kg, yield_estimate = estimate.yield_estimate, profit, "Market estimate");

        let mut result = fields(json!({
            "predicted_price": round_to(estimate.price_per_kg, 2),
            "estimated_yield": round_to(estimate.yield_estimate, 3),
            "estimated_profit": round_to(profit, 2),
            "month": input.month,
            "area": input.area,
            "fallback_used": prediction.fallback_used(),
        }));
        if let Some(crop) = &input.crop {
            result.insert("crop".to_string(), json!(crop));
        }
        Ok(AgentResult::success(result))
    }

    fn format_result_text(&self, result: &AgentResult, _context: &Context) -> Option<String> {
        let payload = result.payload();
        let yield_estimate = number_of(payload.get("estimated_yield"))?;
        let price = number_of(payload.get("predicted_price"))?;
        let profit = number_of(payload.get("estimated_profit"))?;
        Some(format!(
            "Expected yield {} q/ha, price ₹{}/kg, estimated profit ₹{}.",
            yield_estimate, price, profit
        ))
    }
}
