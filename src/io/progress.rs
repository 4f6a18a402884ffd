//! Terminal progress display for long-running solves

use crate::algorithm::executor::{Checkpoint, SolveReport, SolveStatus};
use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static SWEEP_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    let template = format!(
        "[{{elapsed_precise}}] [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} sweeps {{msg}}"
    );
    ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Progress bar over the sweep budget with the latest residual as message
pub struct SolveProgress {
    bar: ProgressBar,
    threshold: f64,
}

impl SolveProgress {
    /// Create a bar sized to the sweep budget
    pub fn new(max_sweeps: usize, threshold: f64) -> Self {
        let bar = ProgressBar::new(max_sweeps as u64);
        bar.set_style(SWEEP_STYLE.clone());
        Self { bar, threshold }
    }

    /// Create a bar that never draws
    pub fn hidden(max_sweeps: usize, threshold: f64) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(max_sweeps as u64);
        Self { bar, threshold }
    }

    /// Show the latest residual check
    pub fn update(&self, checkpoint: Checkpoint) {
        self.bar.set_position(checkpoint.sweeps as u64);
        self.bar
            .set_message(Self::residual_message(checkpoint.residual, self.threshold));
    }

    /// Sweeps currently displayed
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Close the bar with a summary of the outcome
    pub fn finish(&self, report: &SolveReport) {
        let outcome = match report.status {
            SolveStatus::Converged => "converged",
            SolveStatus::BudgetExhausted => "budget exhausted",
            SolveStatus::Cancelled => "cancelled",
        };
        // Finishing fills the bar, so shrink it to the sweeps actually run
        self.bar.set_length(report.sweeps_performed as u64);
        self.bar.finish_with_message(format!(
            "{outcome} (residual {:.4})",
            report.final_residual
        ));
    }

    /// Message text for a residual compared to the threshold
    pub fn residual_message(residual: f64, threshold: f64) -> String {
        format!("residual {residual:.4} / {threshold}")
    }
}
