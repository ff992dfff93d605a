//! Fixed vocabularies used by the parameter extractor.

pub const CROPS: &[&str] = &[
    "wheat", "rice", "corn", "maize", "barley", "oats", "rye", "millet", "soybean", "soya",
    "chickpea", "lentil", "pea", "bean", "groundnut", "cotton", "jute", "hemp", "flax",
    "sugarcane", "sugar beet", "potato", "sweet potato", "cassava", "yam", "onion", "garlic",
    "tomato", "pepper", "chili", "eggplant", "cucumber", "pumpkin", "carrot", "radish", "turnip",
    "cabbage", "cauliflower", "broccoli", "lettuce", "spinach", "kale", "celery", "parsley",
    "coriander", "apple", "orange", "banana", "grape", "mango", "papaya", "guava", "coconut",
    "date", "fig", "pomegranate", "watermelon", "melon", "grapes", "jackfruit", "sappota",
    "lemon", "custard apple",
];

pub const SOIL_TYPES: &[&str] = &["clay", "sandy", "loam", "silt", "peat", "chalk", "saline"];

pub const FARMING_TYPES: &[&str] = &[
    "organic",
    "conventional",
    "hydroponic",
    "greenhouse",
    "polyhouse",
    "drip irrigation",
    "sprinkler",
    "traditional",
];

pub const MARKET_TYPES: &[&str] = &["wholesale", "retail", "mandi", "local", "export", "domestic"];

/// Risk category and the phrases that signal it, in reporting order
pub const RISK_TYPES: &[(&str, &[&str])] = &[
    ("drought", &["drought", "dry", "water shortage", "no rain"]),
    ("flood", &["flood", "flooding", "too much rain", "waterlogging"]),
    ("pest", &["pest", "insect", "bug", "infestation"]),
    ("disease", &["disease", "fungal", "bacterial", "viral", "infection"]),
    ("weather", &["weather", "climate", "temperature", "storm", "cyclone"]),
    ("market", &["market", "price", "demand", "supply"]),
    ("financial", &["financial", "economic", "cost", "profit", "loss"]),
];

pub const TIME_PERIODS: &[&str] = &[
    "today",
    "tomorrow",
    "this week",
    "next week",
    "this month",
    "next month",
    "this season",
    "next season",
    "short term",
    "long term",
    "immediate",
];

pub const SYMPTOMS: &[&str] = &[
    "yellowing",
    "browning",
    "wilting",
    "spots",
    "holes",
    "curling",
    "stunted",
    "discoloration",
    "rotting",
    "drying",
];

pub const PLANT_PARTS: &[&str] = &[
    "leaves", "stem", "roots", "flowers", "fruits", "branches", "trunk", "seeds", "pods",
];

pub const LOAN_TYPES: &[&str] = &[
    "crop loan",
    "kisan credit card",
    "kcc",
    "term loan",
    "equipment loan",
    "land purchase loan",
    "working capital",
];

pub const FINANCIAL_PURPOSES: &[&str] = &[
    "seeds",
    "fertilizer",
    "pesticide",
    "equipment",
    "machinery",
    "irrigation",
    "land",
    "storage",
    "processing",
    "marketing",
];

/// First vocabulary entry that occurs in `text` as a substring
pub fn first_substring(text: &str, vocabulary: &[&'static str]) -> Option<&'static str> {
    vocabulary.iter().copied().find(|term| text.contains(term))
}

/// Every vocabulary entry that occurs in `text` as a substring, in vocabulary order
pub fn all_substrings(text: &str, vocabulary: &[&'static str]) -> Vec<&'static str> {
    vocabulary
        .iter()
        .copied()
        .filter(|term| text.contains(term))
        .collect()
}

/// Whether `term` occurs in `text` as a whole word, allowing a plural suffix.
///
/// Keeps "rice" from matching inside "prices" while still finding "tomatoes".
pub fn contains_word(text: &str, term: &str) -> bool {
    text.match_indices(term).any(|(start, _)| {
        let before_ok = text[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let rest = &text[start + term.len()..];
        let rest = rest
            .strip_prefix("es")
            .filter(|r| r.chars().next().is_none_or(|c| !c.is_alphanumeric()))
            .or_else(|| rest.strip_prefix('s'))
            .unwrap_or(rest);
        let after_ok = rest.chars().next().is_none_or(|c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}

/// First crop named in `text` (expected lower-cased)
pub fn find_crop(text: &str) -> Option<&'static str> {
    CROPS.iter().copied().find(|crop| contains_word(text, crop))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_crop_whole_words() {
        assert_eq!(find_crop("predict rice prices"), Some("rice"));
        assert_eq!(find_crop("tomato prices this week"), Some("tomato"));
        assert_eq!(find_crop("expected price trends for soybeans"), Some("soybean"));
        assert_eq!(find_crop("will tomatoes sell"), Some("tomato"));
        assert_eq!(find_crop("market prices"), None);
    }

    #[test]
    fn test_first_substring() {
        assert_eq!(first_substring("sandy loam soil", SOIL_TYPES), Some("sandy"));
        assert_eq!(first_substring("black soil", SOIL_TYPES), None);
    }

    #[test]
    fn test_all_substrings() {
        let found = all_substrings("yellowing leaves with brown spots", SYMPTOMS);
        assert_eq!(found, vec!["yellowing", "spots"]);
    }
}
