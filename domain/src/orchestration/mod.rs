//! Orchestration domain: pipeline stages.

pub mod stage;
