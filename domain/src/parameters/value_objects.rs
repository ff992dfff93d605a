//! Parameter value objects

use crate::core::query::{Context, number_of};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A relative time span mentioned in a query ("next month", "3 weeks")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeframe {
    pub value: u32,
    pub unit: String,
}

impl Timeframe {
    pub fn new(value: u32, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }
}

/// Structured values pulled out of a query, keyed by parameter name.
///
/// Values are plain JSON so agents receive them in the same shape as caller
/// context. Insertion order is preserved.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedParameters(Context);

impl ExtractedParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Read a parameter as a number
    pub fn number(&self, key: &str) -> Option<f64> {
        number_of(self.0.get(key))
    }

    /// Read a parameter as a string
    pub fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Copy every context entry over the extracted values; context always wins.
    pub fn overlay(&mut self, context: &Context) {
        for (key, value) in context {
            self.0.insert(key.clone(), value.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &Context {
        &self.0
    }

    pub fn into_map(self) -> Context {
        self.0
    }
}

impl From<Context> for ExtractedParameters {
    fn from(map: Context) -> Self {
        Self(map)
    }
}
