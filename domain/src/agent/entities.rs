//! Agent identity and the payload handed to an agent

use crate::core::error::DomainError;
use crate::core::query::Context;
use crate::intent::entities::Intent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The five prediction agents the router can dispatch to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Crop,
    MarketYield,
    Risk,
    Pest,
    Finance,
}

impl AgentKind {
    pub const ALL: [AgentKind; 5] = [
        AgentKind::Crop,
        AgentKind::MarketYield,
        AgentKind::Risk,
        AgentKind::Pest,
        AgentKind::Finance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::Crop => "crop",
            AgentKind::MarketYield => "market_yield",
            AgentKind::Risk => "risk",
            AgentKind::Pest => "pest",
            AgentKind::Finance => "finance",
        }
    }

    /// Static routing table from intent to agent. `general` has no agent.
    pub fn for_intent(intent: Intent) -> Option<AgentKind> {
        match intent {
            Intent::CropRecommendation => Some(AgentKind::Crop),
            Intent::MarketYield => Some(AgentKind::MarketYield),
            Intent::RiskAssessment => Some(AgentKind::Risk),
            Intent::PestDetection => Some(AgentKind::Pest),
            Intent::FinanceAgent => Some(AgentKind::Finance),
            Intent::General => None,
        }
    }

    /// Intent this agent answers
    pub fn intent(&self) -> Intent {
        match self {
            AgentKind::Crop => Intent::CropRecommendation,
            AgentKind::MarketYield => Intent::MarketYield,
            AgentKind::Risk => Intent::RiskAssessment,
            AgentKind::Pest => Intent::PestDetection,
            AgentKind::Finance => Intent::FinanceAgent,
        }
    }

    /// Short human description used in capability listings
    pub fn description(&self) -> &'static str {
        match self {
            AgentKind::Crop => "crop recommendations from soil and climate conditions",
            AgentKind::MarketYield => "market price, yield and profit estimates",
            AgentKind::Risk => "weather and farming risk assessment",
            AgentKind::Pest => "pest and disease identification from plant images",
            AgentKind::Finance => "loans, subsidies and government scheme eligibility",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AgentKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "crop" => Ok(AgentKind::Crop),
            "market_yield" | "market" => Ok(AgentKind::MarketYield),
            "risk" => Ok(AgentKind::Risk),
            "pest" => Ok(AgentKind::Pest),
            "finance" => Ok(AgentKind::Finance),
            _ => Err(DomainError::UnknownAgent(s.to_string())),
        }
    }
}

/// Input to an agent: working-language text plus the merged context
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AgentPayload {
    pub text: String,
    #[serde(default)]
    pub context: Context,
}

impl AgentPayload {
    pub fn new(text: impl Into<String>, context: Context) -> Self {
        Self {
            text: text.into(),
            context,
        }
    }
}
