//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`Progress`] struct which implements
//! [`DeleteProgressCallback`] to display a progress bar in the terminal while
//! redundant ROMs are being removed.
//!
//! # Accessible Mode
//!
//! When accessible mode is enabled (`--no-color` or `NO_COLOR`), the bar uses
//! plain ASCII characters and no colors.

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};

use crate::actions::delete::{BatchDeleteResult, DeleteProgressCallback, DeleteResult};

/// Progress reporter for the deletion pass.
pub struct Progress {
    bar: Mutex<Option<ProgressBar>>,
    quiet: bool,
    accessible: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no progress bar will be displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use romdupe::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self::with_accessible(quiet, false)
    }

    /// Create a new progress reporter with accessible mode.
    #[must_use]
    pub fn with_accessible(quiet: bool, accessible: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            quiet,
            accessible,
        }
    }

    /// Check if accessible mode is enabled.
    #[must_use]
    pub fn is_accessible(&self) -> bool {
        self.accessible
    }

    fn style(&self) -> ProgressStyle {
        if self.accessible {
            ProgressStyle::with_template("[{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-")
        } else {
            ProgressStyle::with_template(
                "[{elapsed_precise}] [{bar:40.red/blue}] {pos}/{len} ({percent}%) {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█>-")
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(ref pb) = *guard {
                f(pb);
            }
        }
    }
}

impl DeleteProgressCallback for Progress {
    fn on_before_delete(&self, filename: &str, index: usize, total: usize) {
        if self.quiet {
            return;
        }

        if let Ok(mut guard) = self.bar.lock() {
            let pb = guard.get_or_insert_with(|| {
                let pb = ProgressBar::new(total as u64);
                pb.set_style(self.style());
                pb
            });
            pb.set_position(index as u64);
            pb.set_message(truncate_name(filename, 40));
        }
    }

    fn on_delete_success(&self, _filename: &str, _result: &DeleteResult) {
        self.with_bar(|pb| pb.inc(1));
    }

    fn on_delete_failure(&self, filename: &str, error: &str) {
        self.with_bar(|pb| {
            pb.inc(1);
            pb.println(format!("Error deleting {}: {}", filename, error));
        });
    }

    fn on_complete(&self, result: &BatchDeleteResult) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_with_message(format!("{} deleted", result.success_count()));
            }
        }
    }
}

/// Truncate a filename for display in the progress bar.
fn truncate_name(name: &str, max_chars: usize) -> String {
    let count = name.chars().count();
    if count <= max_chars {
        return name.to_string();
    }

    let tail: String = name.chars().skip(count - (max_chars - 3)).collect();
    format!("...{}", tail)
}
