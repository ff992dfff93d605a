//! Regex and keyword battery turning free text into structured parameters.
//!
//! Matchers run on the lower-cased text, except location which needs the
//! original capitalisation. Caller context is applied last and always wins.
//! Only Fahrenheit temperatures are converted; area and weight values keep
//! their unit in the key name (`area_acres`, `quantity_quintals`, ...).

use super::value_objects::{ExtractedParameters, Timeframe};
use super::vocabulary::{
    FARMING_TYPES, FINANCIAL_PURPOSES, LOAN_TYPES, MARKET_TYPES, PLANT_PARTS, RISK_TYPES,
    SOIL_TYPES, SYMPTOMS, TIME_PERIODS, all_substrings, find_crop, first_substring,
};
use crate::core::query::Context;
use crate::intent::entities::Intent;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

const NUM: &str = r"(\d+\.?\d*)";
const LINK: &str = r"\s*(?:is|of|=|:)?\s*";

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid extractor pattern")
}

fn labelled(label: &str) -> Regex {
    compile(&format!(r"{label}{LINK}{NUM}"))
}

static PH: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![labelled(r"\bph"), labelled("acidity"), labelled("alkalinity")]
});

static NUTRIENTS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    vec![
        ("N", labelled(r"\b(?:nitrogen|nitrate|ammonia|n)")),
        ("P", labelled(r"\b(?:phosphorus|phosphate|p)")),
        ("K", labelled(r"\b(?:potassium|potash|k)")),
    ]
});

const DEGREE_UNIT: &str = r"\s*(?:degrees?|°)\s*(fahrenheit|f|celsius|c)\b";

/// Temperature patterns: the number in group 1, an optional scale word in group 2
static TEMPERATURE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        compile(&format!(r"temperature{LINK}{NUM}(?:{DEGREE_UNIT})?")),
        compile(&format!(r"{NUM}{DEGREE_UNIT}")),
    ]
});

static HUMIDITY: LazyLock<Regex> = LazyLock::new(|| labelled("humidity"));

static RAINFALL: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        labelled("rainfall"),
        labelled("precipitation"),
        compile(&format!(r"{NUM}\s*(?:mm|millimeters?|inch(?:es)?|in)\s*(?:rain|rainfall)")),
    ]
});

static AREA: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    vec![
        ("area_acres", compile(&format!(r"{NUM}\s*acres?\b"))),
        ("area_hectares", compile(&format!(r"{NUM}\s*(?:hectares?|ha)\b"))),
        ("area_sqft", compile(&format!(r"{NUM}\s*(?:sq\s*ft|square\s*feet)"))),
        ("area_sqm", compile(&format!(r"{NUM}\s*(?:sq\s*m|square\s*meters?)\b"))),
    ]
});

static QUANTITY: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    vec![
        ("quantity_tons", compile(&format!(r"{NUM}\s*(?:tons?|tonnes?)\b"))),
        ("quantity_quintals", compile(&format!(r"{NUM}\s*(?:quintals?|qtl)\b"))),
        ("quantity_kg", compile(&format!(r"{NUM}\s*(?:kg|kilograms?)\b"))),
        ("quantity_bags", compile(&format!(r"{NUM}\s*bags?\b"))),
        ("quantity_sacks", compile(&format!(r"{NUM}\s*sacks?\b"))),
    ]
});

/// Timeframe patterns: a captured count, or a fixed count of one
static TIMEFRAME: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    vec![
        ("days", compile(r"(\d+)\s*days?\b")),
        ("weeks", compile(r"(\d+)\s*weeks?\b")),
        ("months", compile(r"(\d+)\s*months?\b")),
        ("weeks", compile(r"next\s*week")),
        ("months", compile(r"next\s*month")),
        ("seasons", compile(r"this\s*season")),
        ("seasons", compile(r"next\s*season")),
    ]
});

const AMOUNT: &str = r"(\d+(?:,\d+)*(?:\.\d+)?)";

static MONEY: LazyLock<Vec<(f64, Regex)>> = LazyLock::new(|| {
    vec![
        (1.0, compile(&format!(r"(?:\b(?:rs\.?|rupees?)|₹)\s*{AMOUNT}"))),
        (1.0, compile(&format!(r"{AMOUNT}\s*(?:rs|rupees?)\b"))),
        (100_000.0, compile(&format!(r"{AMOUNT}\s*lakhs?\b"))),
        (10_000_000.0, compile(&format!(r"{AMOUNT}\s*crores?\b"))),
    ]
});

static LOCATION: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        compile(r"\b(?:in|at|near|around)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\b"),
        compile(r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\s+(?:area|region|district|state)\b"),
    ]
});

static NUMBERS: LazyLock<Regex> = LazyLock::new(|| compile(r"\b\d+\.?\d*\b"));

fn first_number(patterns: &[Regex], text: &str) -> Option<f64> {
    patterns
        .iter()
        .find_map(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Extracts structured parameters from query text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterExtractor;

impl ParameterExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Run the intent's matchers and the common ones, then overlay `context`.
    ///
    /// Never fails: a matcher without a match simply leaves its key out.
    pub fn extract(&self, text: &str, intent: Intent, context: &Context) -> ExtractedParameters {
        let lower = text.to_lowercase();
        let mut params = ExtractedParameters::new();

        match intent {
            Intent::CropRecommendation => {
                extract_soil(&lower, &mut params);
                extract_climate(&lower, &mut params);
                extract_area(&lower, &mut params);
                if let Some(kind) = first_substring(&lower, FARMING_TYPES) {
                    params.insert("farming_type", kind);
                }
            }
            Intent::MarketYield => {
                if let Some(crop) = find_crop(&lower) {
                    params.insert("crop", crop);
                }
                if let Some(timeframe) = extract_timeframe(&lower) {
                    params.insert("timeframe", json!(timeframe));
                }
                extract_quantity(&lower, &mut params);
                if let Some(market) = first_substring(&lower, MARKET_TYPES) {
                    params.insert("market_type", market);
                }
            }
            Intent::RiskAssessment => {
                let risks = extract_risk_types(&lower);
                if !risks.is_empty() {
                    params.insert("risk_types", risks);
                }
                if let Some(period) = first_substring(&lower, TIME_PERIODS) {
                    params.insert("time_period", period);
                }
            }
            Intent::PestDetection => {
                if let Some(crop) = find_crop(&lower) {
                    params.insert("crop_type", crop);
                }
                let symptoms = all_substrings(&lower, SYMPTOMS);
                if !symptoms.is_empty() {
                    params.insert("symptoms", symptoms);
                }
                let parts = all_substrings(&lower, PLANT_PARTS);
                if !parts.is_empty() {
                    params.insert("affected_parts", parts);
                }
            }
            Intent::FinanceAgent => {
                if let Some(amount) = extract_amount(&lower) {
                    params.insert("amount", amount);
                }
                if let Some(loan) = first_substring(&lower, LOAN_TYPES) {
                    params.insert("loan_type", loan);
                }
                if let Some(purpose) = first_substring(&lower, FINANCIAL_PURPOSES) {
                    params.insert("purpose", purpose);
                }
            }
            Intent::General => {
                if let Some(crop) = find_crop(&lower) {
                    params.insert("crop", crop);
                }
            }
        }

        if let Some(location) = extract_location(text) {
            params.insert("location", location);
        }
        let numbers = extract_numbers(text);
        if !numbers.is_empty() {
            params.insert("numbers", numbers);
        }

        params.overlay(context);
        params
    }
}

fn extract_soil(text: &str, params: &mut ExtractedParameters) {
    if let Some(ph) = first_number(&PH, text) {
        params.insert("ph", ph);
    }
    for (key, pattern) in NUTRIENTS.iter() {
        if let Some(value) = first_number(std::slice::from_ref(pattern), text) {
            params.insert(*key, value);
        }
    }
    if let Some(soil) = first_substring(text, SOIL_TYPES) {
        params.insert("soil_type", soil);
    }
}

fn extract_climate(text: &str, params: &mut ExtractedParameters) {
    if let Some(celsius) = extract_temperature(text) {
        params.insert("temperature", celsius);
    }
    if let Some(humidity) = first_number(std::slice::from_ref(&*HUMIDITY), text) {
        params.insert("humidity", humidity);
    }
    if let Some(rainfall) = first_number(&RAINFALL, text) {
        params.insert("rainfall", rainfall);
    }
}

/// Temperature in °C; a Fahrenheit reading is converted.
fn extract_temperature(text: &str) -> Option<f64> {
    TEMPERATURE.iter().find_map(|re| {
        let caps = re.captures(text)?;
        let value: f64 = caps.get(1)?.as_str().parse().ok()?;
        let fahrenheit = caps.get(2).is_some_and(|unit| unit.as_str().starts_with('f'));
        Some(if fahrenheit {
            (value - 32.0) * 5.0 / 9.0
        } else {
            value
        })
    })
}

fn extract_area(text: &str, params: &mut ExtractedParameters) {
    extract_first_unit(&AREA, text, params);
}

fn extract_quantity(text: &str, params: &mut ExtractedParameters) {
    extract_first_unit(&QUANTITY, text, params);
}

/// Record the first matching unit pattern under its unit-specific key.
fn extract_first_unit(patterns: &[(&'static str, Regex)], text: &str, params: &mut ExtractedParameters) {
    let found = patterns.iter().find_map(|(key, re)| {
        let value: f64 = re.captures(text)?.get(1)?.as_str().parse().ok()?;
        Some((*key, value))
    });
    if let Some((key, value)) = found {
        params.insert(key, value);
    }
}

fn extract_timeframe(text: &str) -> Option<Timeframe> {
    TIMEFRAME.iter().find_map(|(unit, re)| {
        let caps = re.captures(text)?;
        let value = match caps.get(1) {
            Some(count) => count.as_str().parse().ok()?,
            None => 1,
        };
        Some(Timeframe::new(value, *unit))
    })
}

fn extract_risk_types(text: &str) -> Vec<&'static str> {
    RISK_TYPES
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(risk, _)| *risk)
        .collect()
}

fn extract_amount(text: &str) -> Option<f64> {
    MONEY.iter().find_map(|(multiplier, re)| {
        let raw = re.captures(text)?.get(1)?.as_str().replace(',', "");
        let amount: f64 = raw.parse().ok()?;
        Some(amount * multiplier)
    })
}

/// Place name after "in/at/near/around", or before "area/region/district/state".
///
/// Needs the original capitalisation.
pub fn extract_location(text: &str) -> Option<String> {
    LOCATION
        .iter()
        .find_map(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

fn extract_numbers(text: &str) -> Vec<f64> {
    NUMBERS
        .find_iter(text)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str, intent: Intent) -> ExtractedParameters {
        ParameterExtractor::new().extract(text, intent, &Context::new())
    }

    #[test]
    fn test_crop_query_soil_and_ph() {
        let params = extract(
            "What crop should I plant in sandy soil with pH 6.5?",
            Intent::CropRecommendation,
        );
        assert_eq!(params.number("ph"), Some(6.5));
        assert_eq!(params.text("soil_type"), Some("sandy"));
        assert!(!params.contains_key("N"));
        assert!(!params.contains_key("P"));
        assert!(!params.contains_key("location"));
    }

    #[test]
    fn test_npk_and_climate() {
        let params = extract(
            "nitrogen 90, phosphorus is 42, potash: 43, humidity 80 and rainfall of 200",
            Intent::CropRecommendation,
        );
        assert_eq!(params.number("N"), Some(90.0));
        assert_eq!(params.number("P"), Some(42.0));
        assert_eq!(params.number("K"), Some(43.0));
        assert_eq!(params.number("humidity"), Some(80.0));
        assert_eq!(params.number("rainfall"), Some(200.0));
    }

    #[test]
    fn test_fahrenheit_converted_celsius_kept() {
        let params = extract("it is 77 degrees fahrenheit", Intent::CropRecommendation);
        assert!((params.number("temperature").unwrap() - 25.0).abs() < 1e-9);

        let params = extract("around 30°c during the day", Intent::CropRecommendation);
        assert_eq!(params.number("temperature"), Some(30.0));
    }

    #[test]
    fn test_labelled_fahrenheit_converted() {
        let params = extract("temperature is 95°F today", Intent::CropRecommendation);
        assert!((params.number("temperature").unwrap() - 35.0).abs() < 1e-9);

        let params = extract(
            "temperature of 95 degrees fahrenheit",
            Intent::CropRecommendation,
        );
        assert!((params.number("temperature").unwrap() - 35.0).abs() < 1e-9);

        let params = extract("temperature is 28", Intent::CropRecommendation);
        assert_eq!(params.number("temperature"), Some(28.0));
        let params = extract("temperature: 28 °C", Intent::CropRecommendation);
        assert_eq!(params.number("temperature"), Some(28.0));
    }

    #[test]
    fn test_area_keeps_unit() {
        let params = extract("I farm 5 acres of clay", Intent::CropRecommendation);
        assert_eq!(params.number("area_acres"), Some(5.0));
        let params = extract("2.5 hectares, organic", Intent::CropRecommendation);
        assert_eq!(params.number("area_hectares"), Some(2.5));
        assert_eq!(params.text("farming_type"), Some("organic"));
    }

    #[test]
    fn test_market_query() {
        let params = extract("Predict rice prices for this season", Intent::MarketYield);
        assert_eq!(params.text("crop"), Some("rice"));
        assert_eq!(
            params.get("timeframe"),
            Some(&json!({"value": 1, "unit": "seasons"}))
        );
    }

    #[test]
    fn test_market_quantity_and_counted_timeframe() {
        let params = extract("selling 20 quintals of wheat at the mandi in 3 weeks", Intent::MarketYield);
        assert_eq!(params.number("quantity_quintals"), Some(20.0));
        assert_eq!(params.text("market_type"), Some("mandi"));
        assert_eq!(
            params.get("timeframe"),
            Some(&json!({"value": 3, "unit": "weeks"}))
        );
        assert_eq!(params.get("numbers"), Some(&json!([20.0, 3.0])));
    }

    #[test]
    fn test_risk_query() {
        let params = extract(
            "Drought and pest risk near Nashik this month",
            Intent::RiskAssessment,
        );
        assert_eq!(params.get("risk_types"), Some(&json!(["drought", "pest"])));
        assert_eq!(params.text("time_period"), Some("this month"));
        assert_eq!(params.text("location"), Some("Nashik"));
    }

    #[test]
    fn test_location_suffix_form() {
        assert_eq!(
            extract_location("Rainfall in the Nashik district"),
            Some("Nashik".to_string())
        );
        assert_eq!(
            extract_location("Crops for Tamil Nadu state"),
            Some("Tamil Nadu".to_string())
        );
        assert_eq!(extract_location("what crop should i plant in sandy soil"), None);
    }

    #[test]
    fn test_pest_query() {
        let params = extract(
            "My tomato leaves show yellowing and holes",
            Intent::PestDetection,
        );
        assert_eq!(params.text("crop_type"), Some("tomato"));
        assert_eq!(params.get("symptoms"), Some(&json!(["yellowing", "holes"])));
        assert_eq!(params.get("affected_parts"), Some(&json!(["leaves"])));
    }

    #[test]
    fn test_finance_amounts() {
        let params = extract("need a crop loan of 2 lakh for seeds", Intent::FinanceAgent);
        assert_eq!(params.number("amount"), Some(200_000.0));
        assert_eq!(params.text("loan_type"), Some("crop loan"));
        assert_eq!(params.text("purpose"), Some("seeds"));

        let params = extract("Rs 15,000 for fertilizer", Intent::FinanceAgent);
        assert_eq!(params.number("amount"), Some(15_000.0));

        let params = extract("1.5 crore for a processing unit", Intent::FinanceAgent);
        assert_eq!(params.number("amount"), Some(15_000_000.0));
    }

    #[test]
    fn test_general_picks_up_crop() {
        let params = extract("tell me about mango", Intent::General);
        assert_eq!(params.text("crop"), Some("mango"));
    }

    #[test]
    fn test_context_always_wins() {
        let context = json!({"ph": 7.5, "soil_type": "loam", "location": "Pune"})
            .as_object()
            .cloned()
            .unwrap();
        let params = ParameterExtractor::new().extract(
            "sandy soil with ph 5.5 in Nagpur",
            Intent::CropRecommendation,
            &context,
        );
        assert_eq!(params.get("ph"), Some(&json!(7.5)));
        assert_eq!(params.get("soil_type"), Some(&json!("loam")));
        assert_eq!(params.get("location"), Some(&json!("Pune")));
    }

    #[test]
    fn test_no_matches_is_empty() {
        let params = extract("hello there", Intent::FinanceAgent);
        assert!(params.is_empty());
    }
}
