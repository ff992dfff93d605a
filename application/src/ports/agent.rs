//! Agent port
//!
//! Defines the interface every prediction agent implements. `predict` is the
//! only required operation; `process_query` and `format_result_text` are
//! optional and announced through [`AgentCapabilities`], which the registry
//! records once at registration.

use async_trait::async_trait;
use demeter_domain::{AgentKind, AgentPayload, AgentResult, Context};
use thiserror::Error;

/// Errors an agent may raise while predicting
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Prediction failed: {0}")]
    PredictionFailed(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// Optional operations an agent provides beyond `predict`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AgentCapabilities {
    /// `process_query` gives a richer answer than `predict` and is preferred
    pub process_query: bool,
    /// `format_result_text` renders the agent's own results
    pub format_result_text: bool,
}

impl AgentCapabilities {
    pub fn predict_only() -> Self {
        Self::default()
    }

    pub fn with_process_query(mut self) -> Self {
        self.process_query = true;
        self
    }

    pub fn with_formatter(mut self) -> Self {
        self.format_result_text = true;
        self
    }
}

/// A self-contained predictor for one domain question
///
/// Implementations live in the infrastructure layer.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Which agent this is
    fn kind(&self) -> AgentKind;

    /// Optional operations this agent implements
    fn capabilities(&self) -> AgentCapabilities {
        AgentCapabilities::predict_only()
    }

    /// Produce a result for the payload
    async fn predict(&self, payload: &AgentPayload) -> Result<AgentResult, AgentError>;

    /// Richer variant of `predict`, used when announced in the capabilities
    async fn process_query(
        &self,
        _text: &str,
        payload: &AgentPayload,
    ) -> Result<AgentResult, AgentError> {
        self.predict(payload).await
    }

    /// Render a result of this agent as English text, when announced
    fn format_result_text(&self, _result: &AgentResult, _context: &Context) -> Option<String> {
        None
    }
}
