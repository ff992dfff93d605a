//! LibreTranslate-compatible HTTP backend
//!
//! `POST /translate`, `POST /detect` and `GET /languages` with JSON bodies.

use async_trait::async_trait;
use demeter_application::ports::translation::{TranslationBackend, TranslationError};
use demeter_domain::LanguageCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

#[derive(Serialize)]
struct DetectRequest<'a> {
    q: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct DetectCandidate {
    confidence: f64,
    language: String,
}

#[derive(Deserialize)]
struct LanguageEntry {
    code: String,
    name: String,
}

pub struct LibreTranslateBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl LibreTranslateBackend {
    pub fn new(base_url: impl Into<String>) -> Result<Self, TranslationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("demeter/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TranslationError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
        })
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.is_empty());
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn read_json<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, TranslationError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::RequestFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| TranslationError::InvalidResponse(e.to_string()))
    }
}

fn request_failed(e: reqwest::Error) -> TranslationError {
    if e.is_timeout() {
        TranslationError::Timeout
    } else {
        TranslationError::RequestFailed(e.to_string())
    }
}

/// Most confident detection candidate
fn best_candidate(candidates: Vec<DetectCandidate>) -> Result<LanguageCode, TranslationError> {
    let best = candidates
        .into_iter()
        .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
        .ok_or_else(|| TranslationError::InvalidResponse("no detection candidates".to_string()))?;
    best.language
        .parse()
        .map_err(|_| TranslationError::UnsupportedLanguage(best.language))
}

#[async_trait]
impl TranslationBackend for LibreTranslateBackend {
    fn name(&self) -> &str {
        "libretranslate"
    }

    async fn translate(
        &self,
        text: &str,
        target: &LanguageCode,
        source: &LanguageCode,
    ) -> Result<String, TranslationError> {
        let request = TranslateRequest {
            q: text,
            source: source.as_str(),
            target: target.as_str(),
            format: "text",
            api_key: self.api_key.as_deref(),
        };
        debug!(source = %source, target = %target, "LibreTranslate request");
        let response = self
            .client
            .post(self.endpoint("translate"))
            .json(&request)
            .send()
            .await
            .map_err(request_failed)?;
        let body: TranslateResponse = Self::read_json(response).await?;
        Ok(body.translated_text)
    }

    async fn detect_language(&self, text: &str) -> Result<LanguageCode, TranslationError> {
        let request = DetectRequest {
            q: text,
            api_key: self.api_key.as_deref(),
        };
        let response = self
            .client
            .post(self.endpoint("detect"))
            .json(&request)
            .send()
            .await
            .map_err(request_failed)?;
        best_candidate(Self::read_json(response).await?)
    }

    async fn supported_languages(&self) -> Result<BTreeMap<String, String>, TranslationError> {
        let response = self
            .client
            .get(self.endpoint("languages"))
            .send()
            .await
            .map_err(request_failed)?;
        let entries: Vec<LanguageEntry> = Self::read_json(response).await?;
        Ok(entries.into_iter().map(|e| (e.code, e.name)).collect())
    }
}
