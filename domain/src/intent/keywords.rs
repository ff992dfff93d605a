//! Keyword tables for confidence boosting, the keyword fallback and help detection.

use super::entities::Intent;

/// Keywords that corroborate a predicted intent when found in the lower-cased text.
pub fn boosters(intent: Intent) -> &'static [&'static str] {
    match intent {
        Intent::CropRecommendation => &["recommend", "suggest", "best", "suitable", "plant", "grow"],
        Intent::MarketYield => &["price", "market", "yield", "forecast", "predict", "profit"],
        Intent::RiskAssessment => &["risk", "danger", "threat", "weather", "climate", "drought"],
        Intent::PestDetection => &["pest", "bug", "disease", "identify", "what is this"],
        Intent::FinanceAgent => &["loan", "credit", "subsidy", "cost", "budget", "money"],
        Intent::General => &[],
    }
}

/// Weighted keyword groups used when the text model is unavailable.
#[derive(Debug, Clone, Copy)]
pub struct KeywordPattern {
    pub primary: &'static [&'static str],
    pub secondary: &'static [&'static str],
    pub context: &'static [&'static str],
}

impl KeywordPattern {
    pub const PRIMARY_WEIGHT: u32 = 3;
    pub const SECONDARY_WEIGHT: u32 = 2;
    pub const CONTEXT_WEIGHT: u32 = 1;

    /// Score obtained when every keyword of the pattern matches
    pub fn max_score(&self) -> u32 {
        self.primary.len() as u32 * Self::PRIMARY_WEIGHT
            + self.secondary.len() as u32 * Self::SECONDARY_WEIGHT
            + self.context.len() as u32 * Self::CONTEXT_WEIGHT
    }

    /// Weighted number of keywords found in `text` (expected lower-cased)
    pub fn score(&self, text: &str) -> u32 {
        let hits = |words: &[&str]| words.iter().filter(|w| text.contains(*w)).count() as u32;
        hits(self.primary) * Self::PRIMARY_WEIGHT
            + hits(self.secondary) * Self::SECONDARY_WEIGHT
            + hits(self.context) * Self::CONTEXT_WEIGHT
    }
}

/// Fallback keyword pattern for a classifiable intent.
pub fn fallback_pattern(intent: Intent) -> Option<KeywordPattern> {
    let pattern = match intent {
        Intent::CropRecommendation => KeywordPattern {
            primary: &["recommend", "suggest", "best crop", "what to plant", "which crop"],
            secondary: &["soil", "climate", "suitable", "grow", "plant", "farming"],
            context: &["ph", "nitrogen", "phosphorus", "potassium", "temperature"],
        },
        Intent::MarketYield => KeywordPattern {
            primary: &["price", "market", "yield", "forecast", "predict"],
            secondary: &["profit", "revenue", "cost", "sell", "buy", "trade"],
            context: &["ton", "quintal", "per acre", "per hectare", "rupees"],
        },
        Intent::RiskAssessment => KeywordPattern {
            primary: &["risk", "danger", "threat", "weather risk", "climate risk"],
            secondary: &["drought", "flood", "storm", "temperature", "rainfall"],
            context: &["probability", "chance", "likely", "forecast", "warning"],
        },
        Intent::PestDetection => KeywordPattern {
            primary: &["pest", "bug", "disease", "identify", "what is this"],
            secondary: &["insect", "fungal", "bacterial", "infection", "damage"],
            context: &["leaf", "plant", "crop", "treatment", "control"],
        },
        Intent::FinanceAgent => KeywordPattern {
            primary: &["loan", "credit", "subsidy", "scheme", "financial"],
            secondary: &["cost", "budget", "money", "investment", "insurance"],
            context: &["bank", "government", "interest", "emi", "premium"],
        },
        Intent::General => return None,
    };
    Some(pattern)
}

/// Phrases that, making up the whole request, ask what the assistant can do.
pub const HELP_REQUESTS: &[&str] = &[
    "help",
    "help me",
    "hi",
    "hello",
    "menu",
    "what can you do",
    "what do you do",
    "how do i use this",
    "how does this work",
    "how can you help",
    "how can you help me",
];

/// Words the General Query Handler treats as a request for the capability list.
pub const HELP_KEYWORDS: &[&str] = &["help", "what can you do", "how to use", "how do i use", "capabilities", "menu"];

/// Whether the whole (normalized) query is a bare help request.
pub fn is_help_request(text: &str) -> bool {
    let normalized: String = text
        .trim()
        .trim_end_matches(['?', '!', '.'])
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    HELP_REQUESTS.contains(&normalized.as_str())
}

/// Whether the text mentions any help keyword.
pub fn mentions_help(text: &str) -> bool {
    let lower = text.to_lowercase();
    HELP_KEYWORDS.iter().any(|k| lower.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_score() {
        let crop = fallback_pattern(Intent::CropRecommendation).unwrap();
        assert_eq!(crop.max_score(), 5 * 3 + 6 * 2 + 5);
        assert!(fallback_pattern(Intent::General).is_none());
    }

    #[test]
    fn test_score_counts_weighted_hits() {
        let finance = fallback_pattern(Intent::FinanceAgent).unwrap();
        // "loan" primary, "bank" and "interest" context
        assert_eq!(finance.score("bank loan interest rate"), 3 + 1 + 1);
        assert_eq!(finance.score("nothing relevant"), 0);
    }

    #[test]
    fn test_help_request() {
        assert!(is_help_request("help"));
        assert!(is_help_request("  What can you   do? "));
        assert!(!is_help_request("help me identify this pest"));
    }

    #[test]
    fn test_mentions_help() {
        assert!(mentions_help("Can you HELP with my farm"));
        assert!(!mentions_help("rice prices"));
    }
}
