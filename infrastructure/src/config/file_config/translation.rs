//! Translation and detection configuration from TOML
//! (`[translation]` and `[detection]` sections)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which translation backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationBackendKind {
    /// No backend: translation always falls back to the original text
    #[default]
    None,
    /// LibreTranslate-compatible HTTP API
    LibreTranslate,
}

/// Raw translation configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTranslationConfig {
    pub backend: TranslationBackendKind,
    /// Base URL of the LibreTranslate server
    pub url: Option<String>,
    pub api_key: Option<String>,
    /// Translation cache file; defaults under the user data directory
    pub cache_path: Option<PathBuf>,
    /// Entry ceiling before the oldest half is evicted
    pub cache_max_entries: usize,
}

impl Default for FileTranslationConfig {
    fn default() -> Self {
        Self {
            backend: TranslationBackendKind::None,
            url: None,
            api_key: None,
            cache_path: None,
            cache_max_entries: 10_000,
        }
    }
}

/// How the source language of a query is detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMethod {
    /// Local script and stop-word heuristics
    #[default]
    Script,
    /// Ask the translation backend
    Backend,
}

/// Raw detection configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDetectionConfig {
    pub method: DetectionMethod,
}

/// Raw query cache configuration from TOML (`[cache]` section)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCacheConfig {
    /// Query cache file; defaults under the user data directory
    pub path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_deserialize() {
        let config: FileTranslationConfig = toml::from_str(
            r#"
backend = "libretranslate"
url = "http://localhost:5000"
"#,
        )
        .unwrap();
        assert_eq!(config.backend, TranslationBackendKind::LibreTranslate);
        assert_eq!(config.url.as_deref(), Some("http://localhost:5000"));
        assert_eq!(config.cache_max_entries, 10_000);
    }
}
