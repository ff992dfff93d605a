//! Pipeline stages reported to progress listeners

use serde::{Deserialize, Serialize};
use std::fmt;

/// One stage of query handling, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Detect,
    TranslateIn,
    Classify,
    Extract,
    Route,
    Synthesize,
    TranslateOut,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::Detect,
        Stage::TranslateIn,
        Stage::Classify,
        Stage::Extract,
        Stage::Route,
        Stage::Synthesize,
        Stage::TranslateOut,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Detect => "detect",
            Stage::TranslateIn => "translate_in",
            Stage::Classify => "classify",
            Stage::Extract => "extract",
            Stage::Route => "route",
            Stage::Synthesize => "synthesize",
            Stage::TranslateOut => "translate_out",
        }
    }

    /// Progress label shown to users
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Detect => "Detecting language",
            Stage::TranslateIn => "Translating query",
            Stage::Classify => "Classifying intent",
            Stage::Extract => "Extracting parameters",
            Stage::Route => "Consulting agent",
            Stage::Synthesize => "Writing answer",
            Stage::TranslateOut => "Translating answer",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
