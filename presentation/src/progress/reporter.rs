//! Progress reporting while a query moves through the pipeline

use colored::Colorize;
use demeter_application::ports::progress::ProgressNotifier;
use demeter_domain::Stage;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Single spinner naming the current stage
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn with_spinner(&self, f: impl FnOnce(&ProgressBar)) {
        let Ok(mut guard) = self.spinner.lock() else {
            return;
        };
        let spinner = guard.get_or_insert_with(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(Self::spinner_style());
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });
        f(spinner);
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_stage_start(&self, stage: Stage) {
        self.with_spinner(|pb| {
            pb.set_prefix(stage.label());
            pb.set_message("...");
        });
    }

    fn on_stage_complete(&self, _stage: Stage, degraded: bool) {
        if degraded {
            self.with_spinner(|pb| pb.set_message(format!("{}", "degraded".yellow())));
        }
    }

    fn on_finished(&self) {
        if let Ok(mut guard) = self.spinner.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_and_clear();
        }
    }
}

/// Plain text progress on stderr (no terminal control codes)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_stage_start(&self, stage: Stage) {
        eprintln!("{} {}", "->".cyan(), stage.label().bold());
    }

    fn on_stage_complete(&self, stage: Stage, degraded: bool) {
        if degraded {
            eprintln!("  {} {} (degraded)", "x".yellow(), stage);
        }
    }
}
