//! Spinner showing search progress for the demo binary

use crate::algorithm::executor::Resolution;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;
use std::time::Duration;

static SPINNER_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_spinner()
        .template("{spinner:.cyan} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
});

static DONE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_spinner()
        .template("[{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
});

/// Live step and backtrack counters on stderr
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter {
    /// Start a ticking spinner
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(SPINNER_STYLE.clone());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_message("starting");
        Self { bar }
    }

    /// Show the latest counters
    pub fn update(&self, steps: usize, backtracks: usize) {
        self.bar
            .set_message(format!("steps {steps}, backtracks {backtracks}"));
    }

    /// Freeze the spinner with the final outcome
    pub fn finish(&self, resolution: Resolution, steps: usize, backtracks: usize) {
        self.bar.set_style(DONE_STYLE.clone());
        self.bar.finish_with_message(format!(
            "{resolution:?} after {steps} steps, {backtracks} backtracks"
        ));
    }
}
