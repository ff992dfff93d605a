//! Application-level configuration.
//!
//! - [`PipelineConfig`]: languages, routing floor, deadlines, memoization

pub mod pipeline;

pub use pipeline::PipelineConfig;
