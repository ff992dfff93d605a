//! Agent result: a tagged success/failure produced by exactly one dispatch.

use crate::core::query::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Why a dispatch did not produce a usable answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The agent returned an error or panicked
    AgentInvocation,
    /// The agent did not answer within the deadline
    Timeout,
    /// The agent rejected its input (e.g. no image for pest detection)
    InvalidInput,
    /// The request was a help request; a capability listing was returned
    HelpRequested,
    /// No agent could be matched to the request
    NotUnderstood,
    /// No agents are available at all
    Unavailable,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::AgentInvocation => "agent_invocation",
            FailureKind::Timeout => "timeout",
            FailureKind::InvalidInput => "invalid_input",
            FailureKind::HelpRequested => "help_requested",
            FailureKind::NotUnderstood => "not_understood",
            FailureKind::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of one agent dispatch.
///
/// `message`, when present, is a ready-made English answer that takes
/// precedence over response templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentResult {
    Success {
        payload: Context,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Failure {
        error: FailureKind,
        detail: String,
        #[serde(default)]
        payload: Context,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl AgentResult {
    pub fn success(payload: Context) -> Self {
        AgentResult::Success {
            payload,
            message: None,
        }
    }

    pub fn failure(error: FailureKind, detail: impl Into<String>) -> Self {
        AgentResult::Failure {
            error,
            detail: detail.into(),
            payload: Context::new(),
            message: None,
        }
    }

    /// Attach a ready-made answer
    pub fn with_message(mut self, text: impl Into<String>) -> Self {
        match &mut self {
            AgentResult::Success { message, .. } | AgentResult::Failure { message, .. } => {
                *message = Some(text.into());
            }
        }
        self
    }

    /// Add a structured field to the payload
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        match &mut self {
            AgentResult::Success { payload, .. } | AgentResult::Failure { payload, .. } => {
                payload.insert(key.into(), value.into());
            }
        }
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AgentResult::Success { .. })
    }

    pub fn payload(&self) -> &Context {
        match self {
            AgentResult::Success { payload, .. } | AgentResult::Failure { payload, .. } => payload,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            AgentResult::Success { message, .. } | AgentResult::Failure { message, .. } => {
                message.as_deref()
            }
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            AgentResult::Success { .. } => None,
            AgentResult::Failure { error, .. } => Some(*error),
        }
    }

    /// Machine-readable error string, `None` on success
    pub fn error_text(&self) -> Option<String> {
        match self {
            AgentResult::Success { .. } => None,
            AgentResult::Failure { error, detail, .. } => Some(format!("{}: {}", error, detail)),
        }
    }
}
