//! Port definitions (interfaces for external dependencies)
//!
//! Ports define the boundaries between the application layer and
//! infrastructure. Adapters in the infrastructure layer implement them.

pub mod agent;
pub mod conversation_logger;
pub mod language;
pub mod progress;
pub mod store;
pub mod translation;
