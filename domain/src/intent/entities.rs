//! Intent entities: the closed set of request categories and a scored label.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse category of a farmer's request, used to select a handling agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    CropRecommendation,
    MarketYield,
    RiskAssessment,
    PestDetection,
    FinanceAgent,
    General,
}

impl Intent {
    /// Intents a classifier can predict, in the fixed order used for
    /// deterministic tie-breaking.
    pub const CLASSIFIABLE: [Intent; 5] = [
        Intent::CropRecommendation,
        Intent::MarketYield,
        Intent::RiskAssessment,
        Intent::PestDetection,
        Intent::FinanceAgent,
    ];

    /// Get the wire name of this intent
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::CropRecommendation => "crop_recommendation",
            Intent::MarketYield => "market_yield",
            Intent::RiskAssessment => "risk_assessment",
            Intent::PestDetection => "pest_detection",
            Intent::FinanceAgent => "finance_agent",
            Intent::General => "general",
        }
    }

    /// Check if this is the catch-all intent
    pub fn is_general(&self) -> bool {
        matches!(self, Intent::General)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Intent {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "crop_recommendation" | "crop" => Ok(Intent::CropRecommendation),
            "market_yield" | "market" | "yield" => Ok(Intent::MarketYield),
            "risk_assessment" | "risk" => Ok(Intent::RiskAssessment),
            "pest_detection" | "pest" => Ok(Intent::PestDetection),
            "finance_agent" | "finance" => Ok(Intent::FinanceAgent),
            "general" => Ok(Intent::General),
            _ => Err(DomainError::UnknownIntent(s.to_string())),
        }
    }
}

/// An intent label with its confidence score (Value Object)
///
/// The confidence is always within `[0, 1]`; [`boost`](Self::boost) only ever
/// moves it upward and saturates at `1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedIntent {
    pub intent: Intent,
    pub confidence: f64,
}

impl ClassifiedIntent {
    /// Create a classified intent, clamping the confidence into `[0, 1]`.
    pub fn new(intent: Intent, confidence: f64) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self { intent, confidence }
    }

    /// Raise the confidence by `amount`, capped at `1.0`. Negative amounts are ignored.
    pub fn boost(self, amount: f64) -> Self {
        if amount.is_finite() && amount > 0.0 {
            Self::new(self.intent, (self.confidence + amount).min(1.0))
        } else {
            self
        }
    }

    /// Cap the confidence at `ceiling` (used by the keyword fallback).
    pub fn capped(self, ceiling: f64) -> Self {
        Self::new(self.intent, self.confidence.min(ceiling))
    }
}
