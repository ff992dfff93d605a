//! Interactive chat module
//!
//! Provides a reedline-based chat interface that keeps a session context
//! across questions.

mod repl;

pub use repl::{ChatCommand, ChatRepl};
