use indicatif::{ProgressBar, ProgressStyle};

use svrefine_core::models::Position;

///
/// Receives one tick per refined call. Purely informational: ticks must not fail or block.
///
pub trait ProgressReporter {
    fn tick(&self, position: &Position);
}

impl ProgressReporter for ProgressBar {
    fn tick(&self, position: &Position) {
        self.inc(1);
        self.set_message(position.to_string());
    }
}

/// A spinner labelled with the aggregator name, showing the last position reached.
pub fn spinner(label: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {prefix} {msg} ({pos} calls)")
    {
        pb.set_style(style);
    }
    pb.set_prefix(label.to_string());
    pb
}
