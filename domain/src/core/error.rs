//! Domain error types

use thiserror::Error;

/// Domain-level errors, raised when parsing identifiers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid language code: {0}")]
    InvalidLanguage(String),

    #[error("Unknown intent: {0}")]
    UnknownIntent(String),

    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("Unknown output format: {0} (expected answer, full or json)")]
    UnknownOutputFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            DomainError::UnknownIntent("weather".to_string()).to_string(),
            "Unknown intent: weather"
        );
        assert_eq!(
            DomainError::InvalidLanguage("e1".to_string()).to_string(),
            "Invalid language code: e1"
        );
    }
}
