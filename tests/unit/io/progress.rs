//! Tests for the sweep progress display

#[cfg(test)]
mod tests {
    use poissonblend::algorithm::executor::{Checkpoint, SolveReport, SolveStatus};
    use poissonblend::io::progress::SolveProgress;

    // Tests the message shows four decimals and the threshold
    #[test]
    fn test_residual_message() {
        assert_eq!(
            SolveProgress::residual_message(12.345_678, 1.0),
            "residual 12.3457 / 1"
        );
        assert_eq!(
            SolveProgress::residual_message(0.5, 0.25),
            "residual 0.5000 / 0.25"
        );
    }

    // Tests checkpoints move the bar to the sweep count
    #[test]
    fn test_update_position() {
        let progress = SolveProgress::hidden(1_000, 1.0);
        assert_eq!(progress.position(), 0);

        progress.update(Checkpoint {
            sweeps: 300,
            residual: 4.0,
        });
        assert_eq!(progress.position(), 300);
    }

    // Tests finishing stops the bar at the sweeps run rather than the budget
    #[test]
    fn test_finish() {
        let progress = SolveProgress::hidden(1_000, 1.0);
        progress.finish(&SolveReport {
            sweeps_performed: 700,
            final_residual: 0.9,
            threshold: 1.0,
            status: SolveStatus::Converged,
        });
        assert_eq!(progress.position(), 700);
    }

    // Tests a solve that needed no sweeps ends the bar at zero
    #[test]
    fn test_finish_without_sweeps() {
        let progress = SolveProgress::hidden(50_000, 1.0);
        progress.update(Checkpoint {
            sweeps: 0,
            residual: 0.0,
        });
        progress.finish(&SolveReport {
            sweeps_performed: 0,
            final_residual: 0.0,
            threshold: 1.0,
            status: SolveStatus::Converged,
        });
        assert_eq!(progress.position(), 0);
    }

    // Tests a visible bar accepts updates
    #[test]
    fn test_visible_bar() {
        let progress = SolveProgress::new(10, 1.0);
        progress.update(Checkpoint {
            sweeps: 10,
            residual: 2.0,
        });
        progress.finish(&SolveReport {
            sweeps_performed: 10,
            final_residual: 2.0,
            threshold: 1.0,
            status: SolveStatus::BudgetExhausted,
        });
        assert_eq!(progress.position(), 10);
    }
}
