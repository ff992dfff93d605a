//! Per-intent English answer templates.

use crate::core::query::{Context, number_of};
use crate::intent::entities::Intent;
use serde_json::Value;

/// Confidence above which a crop is recommended outright
pub const HIGH_CONFIDENCE: f64 = 0.7;
/// Confidence from which a crop is suggested with a caveat
pub const MEDIUM_CONFIDENCE: f64 = 0.5;

/// Renders a short English sentence from known agent result fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseTemplate;

impl ResponseTemplate {
    /// Whether a template exists for this intent
    pub fn knows(intent: Intent) -> bool {
        !intent.is_general()
    }

    /// Render the template, or `None` when the intent has no template or the
    /// payload lacks the fields it needs.
    pub fn render(intent: Intent, payload: &Context) -> Option<String> {
        match intent {
            Intent::CropRecommendation => render_crop(payload),
            Intent::MarketYield => render_market(payload),
            Intent::RiskAssessment => render_risk(payload),
            Intent::PestDetection => render_pest(payload),
            Intent::FinanceAgent => render_finance(payload),
            Intent::General => None,
        }
    }
}

fn text<'a>(payload: &'a Context, key: &str) -> Option<&'a str> {
    payload.get(key).and_then(Value::as_str)
}

fn render_crop(payload: &Context) -> Option<String> {
    let crop = text(payload, "top_crop")?;
    let confidence = number_of(payload.get("confidence")).unwrap_or(0.0);
    let sentence = if confidence > HIGH_CONFIDENCE {
        format!("I recommend growing {} based on your conditions.", crop)
    } else if confidence >= MEDIUM_CONFIDENCE {
        format!(
            "I suggest growing {}, though conditions are not ideal, so monitor your crop closely.",
            crop
        )
    } else {
        format!(
            "{} might be suitable but consult an expert before planting.",
            capitalize(crop)
        )
    };
    Some(sentence)
}

fn render_market(payload: &Context) -> Option<String> {
    let price = number_of(payload.get("predicted_price"))?;
    let yield_estimate = number_of(payload.get("estimated_yield"))?;
    let profit = number_of(payload.get("estimated_profit"))?;
    let crop = text(payload, "crop").map(|c| format!(" for {}", c)).unwrap_or_default();
    Some(format!(
        "Expected yield{} is {} q/ha at a price of ₹{}/kg, for an estimated profit of ₹{}.",
        crop, yield_estimate, price, profit
    ))
}

fn render_risk(payload: &Context) -> Option<String> {
    let level = text(payload, "overall_risk_level")?;
    let crop = text(payload, "crop").unwrap_or("your crops");
    let location = text(payload, "location").unwrap_or("your area");
    let concerns: Vec<String> = payload
        .get("risk_factors")
        .and_then(Value::as_array)
        .map(|factors| {
            factors
                .iter()
                .take(2)
                .filter_map(|f| f.get("factor").and_then(Value::as_str))
                .map(|f| f.replace('_', " "))
                .collect()
        })
        .unwrap_or_default();
    let tail = if concerns.is_empty() {
        " No major risk factors identified.".to_string()
    } else {
        format!(" Main concerns: {}.", concerns.join(", "))
    };
    Some(format!(
        "Risk assessment for {} in {}: {} risk level.{}",
        crop,
        location,
        level.to_uppercase(),
        tail
    ))
}

fn render_pest(payload: &Context) -> Option<String> {
    let pests = payload.get("detected_pests")?.as_array()?;
    let Some(top) = pests.first() else {
        return Some("No pests detected. Keep monitoring your plants regularly.".to_string());
    };
    let name = top.get("name").and_then(Value::as_str)?;
    let severity = top.get("severity").and_then(Value::as_str).unwrap_or("Unknown");
    let treatment = payload
        .get("treatment_recommendations")
        .and_then(Value::as_array)
        .and_then(|t| t.first())
        .and_then(Value::as_str)
        .map(|t| format!(" Suggested treatment: {}.", t.trim_end_matches('.')))
        .unwrap_or_default();
    if name == "Healthy" {
        return Some("Your plant looks healthy. Keep monitoring it regularly.".to_string());
    }
    Some(format!(
        "The most likely problem is {} ({} severity).{}",
        name, severity, treatment
    ))
}

fn render_finance(payload: &Context) -> Option<String> {
    let schemes: Vec<&str> = payload
        .get("eligible_schemes")?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .collect();
    let tip = text(payload, "tip")
        .map(|t| format!(" Tip: {}", t))
        .unwrap_or_default();
    if schemes.is_empty() {
        return Some(format!("No eligible schemes found.{}", tip));
    }
    Some(format!("Eligible schemes: {}.{}", schemes.join(", "), tip))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Context {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_crop_wording_by_confidence() {
        let high = ResponseTemplate::render(
            Intent::CropRecommendation,
            &payload(json!({"top_crop": "rice", "confidence": 0.85})),
        )
        .unwrap();
        assert!(high.starts_with("I recommend growing rice"));

        let medium = ResponseTemplate::render(
            Intent::CropRecommendation,
            &payload(json!({"top_crop": "maize", "confidence": 0.6})),
        )
        .unwrap();
        assert!(medium.starts_with("I suggest growing maize, though"));

        let low = ResponseTemplate::render(
            Intent::CropRecommendation,
            &payload(json!({"top_crop": "wheat", "confidence": 0.3})),
        )
        .unwrap();
        assert!(low.starts_with("Wheat might be suitable but consult an expert"));
    }

    #[test]
    fn test_crop_boundary_at_point_seven_is_medium() {
        let text = ResponseTemplate::render(
            Intent::CropRecommendation,
            &payload(json!({"top_crop": "rice", "confidence": 0.7})),
        )
        .unwrap();
        assert!(text.starts_with("I suggest"));
    }

    #[test]
    fn test_missing_fields_yield_none() {
        assert!(ResponseTemplate::render(Intent::CropRecommendation, &Context::new()).is_none());
        assert!(ResponseTemplate::render(Intent::MarketYield, &Context::new()).is_none());
        assert!(ResponseTemplate::render(Intent::General, &Context::new()).is_none());
    }

    #[test]
    fn test_market_template() {
        let text = ResponseTemplate::render(
            Intent::MarketYield,
            &payload(json!({
                "predicted_price": 18.0,
                "estimated_yield": 3.0,
                "estimated_profit": -7946.0,
                "crop": "rice"
            })),
        )
        .unwrap();
        assert!(text.contains("for rice"));
        assert!(text.contains("₹18/kg"));
    }

    #[test]
    fn test_risk_template() {
        let text = ResponseTemplate::render(
            Intent::RiskAssessment,
            &payload(json!({
                "overall_risk_level": "high",
                "location": "Nashik",
                "risk_factors": [{"factor": "extreme_heat"}, {"factor": "drought_risk"}]
            })),
        )
        .unwrap();
        assert_eq!(
            text,
            "Risk assessment for your crops in Nashik: HIGH risk level. Main concerns: extreme heat, drought risk."
        );
    }

    #[test]
    fn test_pest_and_finance_templates() {
        let pest = ResponseTemplate::render(
            Intent::PestDetection,
            &payload(json!({
                "detected_pests": [{"name": "Aphids", "confidence": 0.9, "severity": "High"}],
                "treatment_recommendations": ["Apply systemic insecticide immediately"]
            })),
        )
        .unwrap();
        assert_eq!(
            pest,
            "The most likely problem is Aphids (High severity). Suggested treatment: Apply systemic insecticide immediately."
        );

        let finance = ResponseTemplate::render(
            Intent::FinanceAgent,
            &payload(json!({"eligible_schemes": ["PM-KISAN", "PMFBY Insurance"], "tip": "Save water."})),
        )
        .unwrap();
        assert_eq!(finance, "Eligible schemes: PM-KISAN, PMFBY Insurance. Tip: Save water.");
    }
}
