//! Progress bar across generated units

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::generate::{GenerationResult, ProgressReporter};

/// One bar ticking once per finished unit
pub struct UnitProgress {
    bar: ProgressBar,
}

impl UnitProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
        if let Ok(style) =
            ProgressStyle::default_bar().template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        Self { bar }
    }

    /// Progress that draws nothing, for `--json` and non-terminal output
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for UnitProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for UnitProgress {
    fn unit_started(&self, label: &str, index: usize, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_message(format!("({index}/{total}) {label}"));
    }

    fn unit_finished(&self, result: &GenerationResult) {
        if !result.success {
            self.bar.println(format!("failed: {}", result.label()));
        }
        self.bar.inc(1);
    }
}
