//! Command line parsing and context input

pub mod commands;
mod context;

pub use context::{ContextInputError, parse_context, read_context_file};
