use indicatif::{ProgressBar, ProgressStyle};
use std::cell::Cell;
use std::time::Duration;

/// Spinner-based reporter for the sequential pipeline stages.
///
/// Each stage is announced with `start_stage`, which numbers it against the
/// total stage count. Report text is written by the caller, not the bar.
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
    total_stages: usize,
    current_stage: Cell<usize>,
}

impl ProgressReporter {
    pub fn new(total_stages: usize, silent: bool) -> Self {
        if silent {
            return Self {
                progress_bar: None,
                total_stages,
                current_stage: Cell::new(0),
            };
        }

        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(100));

        Self {
            progress_bar: Some(pb),
            total_stages,
            current_stage: Cell::new(0),
        }
    }

    pub fn start_stage(&self, message: &str) {
        self.current_stage.set(self.current_stage.get() + 1);
        if let Some(ref pb) = self.progress_bar {
            pb.set_prefix(format!("[{}/{}]", self.current_stage(), self.total_stages));
            pb.set_message(message.to_string());
        }
    }

    /// Status line for the current stage, numbered against the total.
    pub fn stage_line(&self, message: &str) -> String {
        format!("[{}/{}] {}", self.current_stage(), self.total_stages, message)
    }

    pub fn current_stage(&self) -> usize {
        self.current_stage.get()
    }

    pub fn finish_with_message(&self, message: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_with_message(message.to_string());
        }
    }

    /// Run `f` with the spinner cleared, so output written inside it is not
    /// overdrawn.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        match self.progress_bar {
            Some(ref pb) => pb.suspend(f),
            None => f(),
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }
    }
}
