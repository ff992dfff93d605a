//! Core domain concepts shared across all subdomains.
//!
//! - [`query::Query`]: an incoming farmer query with its structured context
//! - [`language::LanguageCode`]: ISO 639-1-like language tag
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod language;
pub mod query;
