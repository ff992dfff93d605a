//! Reference agents
//!
//! Each agent wraps a [`Predictor`](demeter_domain::Predictor) whose rule
//! set answers without any model file. A trained model can be attached
//! with the agent's `with_model`.

mod crop;
mod finance;
mod market_yield;
mod pest;
mod risk;

pub use crop::{CropAgent, CropScore, SoilClimate};
pub use finance::{FinanceAgent, FinanceProfile};
pub use market_yield::{MarketAgent, MarketEstimate, MarketInput};
pub use pest::{PestAgent, PestObservation, PestScore};
pub use risk::{RiskAgent, RiskEstimate, WeatherConditions};

use demeter_application::AgentRegistry;
use demeter_domain::{Context, number_of};
use serde_json::Value;
use std::sync::Arc;

/// Registry holding all five reference agents
pub fn default_registry() -> AgentRegistry {
    AgentRegistry::new()
        .with_agent(Arc::new(CropAgent::new()))
        .with_agent(Arc::new(MarketAgent::new()))
        .with_agent(Arc::new(RiskAgent::new()))
        .with_agent(Arc::new(PestAgent::new()))
        .with_agent(Arc::new(FinanceAgent::new()))
}

/// First numeric value among `keys`, else `default`
fn number(context: &Context, keys: &[&str], default: f64) -> f64 {
    keys.iter()
        .find_map(|key| number_of(context.get(*key)))
        .unwrap_or(default)
}

/// First non-empty string among `keys`
fn text<'a>(context: &'a Context, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| context.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Object fields of a `json!` literal
fn fields(value: Value) -> Context {
    match value {
        Value::Object(map) => map,
        _ => Context::new(),
    }
}
