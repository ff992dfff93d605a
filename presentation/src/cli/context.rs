//! Caller context from `--context` / `--context-file` / `/context`

use demeter_domain::Context;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContextInputError {
    #[error("Context is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Context must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("Could not read context file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Parse a JSON object into a query context
pub fn parse_context(raw: &str) -> Result<Context, ContextInputError> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => Ok(map),
        Value::Null => Err(ContextInputError::NotAnObject("null")),
        Value::Bool(_) => Err(ContextInputError::NotAnObject("a boolean")),
        Value::Number(_) => Err(ContextInputError::NotAnObject("a number")),
        Value::String(_) => Err(ContextInputError::NotAnObject("a string")),
        Value::Array(_) => Err(ContextInputError::NotAnObject("an array")),
    }
}

pub fn read_context_file(path: &Path) -> Result<Context, ContextInputError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ContextInputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_context(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_accepted() {
        let context = parse_context(r#"{"location": "Nashik", "area": 2}"#).unwrap();
        assert_eq!(context["location"], "Nashik");
    }

    #[test]
    fn test_non_object_rejected() {
        let err = parse_context("[1, 2]").unwrap_err();
        assert_eq!(err.to_string(), "Context must be a JSON object, got an array");
        assert!(matches!(parse_context("{oops"), Err(ContextInputError::Json(_))));
    }

    #[test]
    fn test_file_round_trip_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ctx.json");
        std::fs::write(&path, r#"{"image_data": "abc"}"#).unwrap();
        assert_eq!(read_context_file(&path).unwrap()["image_data"], "abc");

        let missing = read_context_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(missing, ContextInputError::Io { .. }));
    }
}
