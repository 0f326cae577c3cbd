//! Progress reporting while consuming the issue tracker feeds.

use crate::config::ProgressConfig;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{debug, info};

const SPINNER_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {prefix}: {pos} {msg}";

/// Counts processed items and shows a live counter on stderr.
pub struct ProgressReporter {
    label: String,
    bar: ProgressBar,
    interval: u64,
    count: u64,
}

impl ProgressReporter {
    /// Start reporting progress for items called `label`.
    pub fn new(label: &str, config: &ProgressConfig) -> Self {
        let bar = if config.enabled {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::with_template(SPINNER_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        } else {
            ProgressBar::hidden()
        };
        bar.set_prefix(label.to_string());

        Self {
            label: label.to_string(),
            bar,
            interval: config.interval,
            count: 0,
        }
    }

    /// Record one more processed item.
    pub fn tick(&mut self) {
        self.count += 1;
        self.bar.inc(1);

        if self.interval > 0 && self.count % self.interval == 0 {
            let (label, count) = (&self.label, self.count);
            self.bar.suspend(|| debug!("{}: {} processed", label, count));
        }
    }

    /// Mark the feed as exhausted.
    pub fn finish(&self) {
        self.bar.finish_with_message("done");
        info!("Processed {} {}", self.count, self.label);
    }

    /// The underlying bar, for code that logs while it is drawn.
    pub fn bar(&self) -> &ProgressBar {
        &self.bar
    }

    /// Number of items processed so far.
    pub fn count(&self) -> u64 {
        self.count
    }
}
