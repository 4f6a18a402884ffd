//! Tests for solver defaults and limits

#[cfg(test)]
mod tests {
    use poissonblend::io::configuration::{
        CHANNEL_MAX, DEFAULT_CONVERGENCE_THRESHOLD, DEFAULT_LOG_LEVEL, DEFAULT_MAX_SWEEPS,
        DEFAULT_SWEEP_BATCH, MAX_CANVAS_DIMENSION, OUTPUT_EXTENSION, OUTPUT_SUFFIX,
        PROGRESS_BAR_WIDTH,
    };

    // Tests the stopping rule defaults
    #[test]
    fn test_stopping_rule_defaults() {
        assert!((DEFAULT_CONVERGENCE_THRESHOLD - 1.0).abs() < f64::EPSILON);
        assert_eq!(DEFAULT_SWEEP_BATCH, 100);
        assert_eq!(DEFAULT_MAX_SWEEPS, 50_000);
    }

    // Tests the budget is a whole number of batches
    #[test]
    fn test_budget_is_multiple_of_batch() {
        assert_eq!(DEFAULT_MAX_SWEEPS % DEFAULT_SWEEP_BATCH, 0);
    }

    // Tests the canvas limit
    #[test]
    fn test_max_canvas_dimension() {
        assert_eq!(MAX_CANVAS_DIMENSION, 16_384);
    }

    // Tests the channel range matches 8-bit output
    #[test]
    fn test_channel_max() {
        assert!((CHANNEL_MAX - f64::from(u8::MAX)).abs() < f64::EPSILON);
    }

    // Tests display and output naming settings
    #[test]
    fn test_output_settings() {
        assert_eq!(PROGRESS_BAR_WIDTH, 40);
        assert_eq!(DEFAULT_LOG_LEVEL, "info");
        assert_eq!(OUTPUT_SUFFIX, "_blended");
        assert_eq!(OUTPUT_EXTENSION, "png");
    }
}
