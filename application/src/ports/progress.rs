//! Progress notification port
//!
//! Receives stage events while a query moves through the pipeline.

use demeter_domain::Stage;

/// Callback for progress updates during query handling
///
/// Implementations live in the presentation layer.
pub trait ProgressNotifier: Send + Sync {
    /// Called when a stage starts
    fn on_stage_start(&self, stage: Stage);

    /// Called when a stage finishes; `degraded` is set when it fell back
    fn on_stage_complete(&self, stage: Stage, degraded: bool);

    /// Called once the response is ready
    fn on_finished(&self) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_stage_start(&self, _stage: Stage) {}
    fn on_stage_complete(&self, _stage: Stage, _degraded: bool) {}
}
