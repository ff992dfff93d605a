//! Language code value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages the assistant can answer in: (code, English name).
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("pt", "Portuguese"),
    ("sw", "Swahili"),
    ("hi", "Hindi"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("kn", "Kannada"),
    ("ml", "Malayalam"),
    ("bn", "Bengali"),
    ("gu", "Gujarati"),
    ("pa", "Punjabi"),
    ("zh", "Chinese"),
    ("ar", "Arabic"),
    ("am", "Amharic"),
];

/// ISO 639-1-like language tag (Value Object)
///
/// Always stored lower-cased. Construction only checks the shape of the code
/// (2-3 ASCII letters); whether the language is supported is a separate
/// question answered by [`LanguageCode::is_supported`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    /// English, the working language of the pipeline
    pub fn english() -> Self {
        Self("en".to_string())
    }

    /// Get the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is English
    pub fn is_english(&self) -> bool {
        self.0 == "en"
    }

    /// Whether the assistant supports this language
    pub fn is_supported(&self) -> bool {
        SUPPORTED_LANGUAGES.iter().any(|(code, _)| *code == self.0)
    }

    /// English name of the language, if supported
    pub fn display_name(&self) -> Option<&'static str> {
        SUPPORTED_LANGUAGES
            .iter()
            .find(|(code, _)| *code == self.0)
            .map(|(_, name)| *name)
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for LanguageCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Region subtags ("pt-BR", "zh_CN") are dropped
        let primary = s
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if (2..=3).contains(&primary.len()) && primary.chars().all(|c| c.is_ascii_lowercase()) {
            Ok(Self(primary))
        } else {
            Err(DomainError::InvalidLanguage(s.to_string()))
        }
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lowercases_and_strips_region() {
        let code: LanguageCode = "pt-BR".parse().unwrap();
        assert_eq!(code.as_str(), "pt");
        let code: LanguageCode = "TA".parse().unwrap();
        assert_eq!(code.as_str(), "ta");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<LanguageCode>().is_err());
        assert!("english".parse::<LanguageCode>().is_err());
        assert!("e1".parse::<LanguageCode>().is_err());
    }

    #[test]
    fn test_supported() {
        assert!(LanguageCode::english().is_supported());
        assert_eq!(
            "ta".parse::<LanguageCode>().unwrap().display_name(),
            Some("Tamil")
        );
        assert!(!"xx".parse::<LanguageCode>().unwrap().is_supported());
    }

    #[test]
    fn test_serde_roundtrip_as_string() {
        let code: LanguageCode = "hi".parse().unwrap();
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"hi\"");
        assert!(serde_json::from_str::<LanguageCode>("\"not a code\"").is_err());
    }
}
