//! Query value object

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structured caller context: domain key → value (soil pH, image payload, location, ...)
pub type Context = Map<String, Value>;

/// A farmer query (Value Object)
///
/// Raw input text plus the optional structured context supplied by the caller.
/// Immutable once received.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Query {
    text: String,
    #[serde(default)]
    context: Context,
}

impl Query {
    /// Create a new query without context
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            context: Context::new(),
        }
    }

    /// Create a new query with caller context
    pub fn with_context(text: impl Into<String>, context: Context) -> Self {
        Self {
            text: text.into(),
            context,
        }
    }

    /// Get the raw query text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the caller context
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Whether the text carries no characters besides whitespace
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl From<&str> for Query {
    fn from(s: &str) -> Self {
        Query::new(s)
    }
}

impl From<String> for Query {
    fn from(s: String) -> Self {
        Query::new(s)
    }
}

/// Truthiness of a context value.
///
/// `null`, `false`, `0`, `""`, `[]` and `{}` count as absent.
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

/// Read a context entry as a number, accepting numeric strings.
pub fn number_of(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
