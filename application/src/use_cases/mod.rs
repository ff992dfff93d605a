//! Use cases
//!
//! Pipeline components and the orchestrating use case built from them.

pub mod handle_query;
pub mod route_agent;
pub mod synthesize;
pub mod translate;
