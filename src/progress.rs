use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while a request is in flight.
pub struct StepProgress {
    bar: ProgressBar,
}

impl StepProgress {
    /// Creates a spinner. If `silent` is true, the spinner is hidden.
    pub fn new(silent: bool) -> Self {
        let bar = if silent {
            ProgressBar::hidden()
        } else {
            ProgressBar::new_spinner()
        };

        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg} ({elapsed})") {
            bar.set_style(style);
        }
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Updates the step currently running.
    pub fn set_step(&self, step: impl Into<String>) {
        self.bar.set_message(step.into());
    }

    /// Clears the spinner once the step is done.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    /// Abandons the spinner (for cancellation).
    pub fn abandon(&self) {
        self.bar.abandon();
    }
}
