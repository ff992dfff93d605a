//! Government scheme eligibility agent

use super::{fields, text};
use async_trait::async_trait;
use demeter_application::ports::agent::{Agent, AgentCapabilities, AgentError};
use demeter_domain::{AgentKind, AgentPayload, AgentResult, Context, number_of};
use serde_json::{Value, json};
use tracing::debug;

const ACRES_PER_HECTARE: f64 = 2.471;

/// (scheme, minimum holding in acres)
const SCHEMES: &[(&str, f64)] = &[
    ("PM-KISAN", 0.0),
    ("PMFBY Insurance", 0.1),
    ("Drip Subsidy", 0.5),
];

#[derive(Debug, Clone, PartialEq)]
pub struct FinanceProfile {
    /// Land holding in acres
    pub area: f64,
    pub region: Option<String>,
}

impl FinanceProfile {
    pub fn from_context(context: &Context) -> Self {
        let area = number_of(context.get("area"))
            .or_else(|| number_of(context.get("area_acres")))
            .or_else(|| number_of(context.get("area_hectares")).map(|ha| ha * ACRES_PER_HECTARE))
            .unwrap_or(1.0);
        Self {
            area,
            region: text(context, &["region", "location"]).map(str::to_string),
        }
    }

    pub fn eligible_schemes(&self) -> Vec<&'static str> {
        SCHEMES
            .iter()
            .filter(|(_, min_acres)| self.area >= *min_acres)
            .map(|(name, _)| *name)
            .collect()
    }

    pub fn tip(&self) -> String {
        format!(
            "Farmers in {} often delay irrigation to reduce water use.",
            self.region.as_deref().unwrap_or("your area")
        )
    }
}

#[derive(Debug, Default)]
pub struct FinanceAgent;

impl FinanceAgent {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Agent for FinanceAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Finance
    }

    fn capabilities(&self) -> AgentCapabilities {
        AgentCapabilities::predict_only().with_formatter()
    }

    async fn predict(&self, payload: &AgentPayload) -> Result<AgentResult, AgentError> {
        let profile = FinanceProfile::from_context(&payload.context);
        if !profile.area.is_finite() || profile.area < 0.0 {
            return Err(AgentError::InvalidInput(format!(
                "land area must be a non-negative number, got {}",
                profile.area
            )));
        }
        let schemes = profile.eligible_schemes();
        debug!(area = profile.area, eligible = schemes.len(), "Schemes matched");

        Ok(AgentResult::success(fields(json!({
            "eligible_schemes": schemes,
            "tip": profile.tip(),
            "area_acres": profile.area,
        }))))
    }

    fn format_result_text(&self, result: &AgentResult, _context: &Context) -> Option<String> {
        let schemes: Vec<&str> = result
            .payload()
            .get("eligible_schemes")?
            .as_array()?
            .iter()
            .filter_map(Value::as_str)
            .collect();
        let tip = result.payload().get("tip").and_then(Value::as_str).unwrap_or_default();
        Some(format!("Eligible schemes: {}. Tip: {}", schemes.join(", "), tip))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(value: Value) -> FinanceProfile {
        FinanceProfile::from_context(&fields(value))
    }

    #[test]
    fn test_area_sources_and_default() {
        assert_eq!(profile(json!({})).area, 1.0);
        assert_eq!(profile(json!({"area_acres": 3})).area, 3.0);
        assert_eq!(profile(json!({"area": 0.2, "area_acres": 3})).area, 0.2);
        assert!((profile(json!({"area_hectares": 2})).area - 4.942).abs() < 1e-9);
    }

    #[test]
    fn test_small_holdings_get_fewer_schemes() {
        assert_eq!(profile(json!({"area": 0.05})).eligible_schemes(), vec!["PM-KISAN"]);
        assert_eq!(
            profile(json!({"area": 0.3})).eligible_schemes(),
            vec!["PM-KISAN", "PMFBY Insurance"]
        );
        assert_eq!(profile(json!({})).eligible_schemes().len(), 3);
    }

    #[test]
    fn test_tip_names_region() {
        assert_eq!(
            profile(json!({"location": "Nashik"})).tip(),
            "Farmers in Nashik often delay irrigation to reduce water use."
        );
        assert!(profile(json!({})).tip().contains("your area"));
    }

    #[tokio::test]
    async fn test_predict_and_format() {
        let agent = FinanceAgent::new();
        let payload = AgentPayload::new("loan schemes", fields(json!({"region": "Punjab"})));
        let result = agent.predict(&payload).await.unwrap();
        assert_eq!(
            agent.format_result_text(&result, &Context::new()).unwrap(),
            "Eligible schemes: PM-KISAN, PMFBY Insurance, Drip Subsidy. \
             Tip: Farmers in Punjab often delay irrigation to reduce water use."
        );
    }

    #[tokio::test]
    async fn test_negative_area_rejected() {
        let payload = AgentPayload::new("schemes", fields(json!({"area": -2})));
        let err = FinanceAgent::new().predict(&payload).await.unwrap_err();
        assert!(matches!(err, AgentError::InvalidInput(_)));
    }
}
