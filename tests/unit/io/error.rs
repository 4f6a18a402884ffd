//! Tests for error messages and error source chains

#[cfg(test)]
mod tests {
    use poissonblend::BlendError;
    use poissonblend::io::error::{ensure_dimensions, invalid_parameter};
    use std::error::Error;
    use std::path::PathBuf;

    // Tests dimension mismatches name the input and both sizes
    #[test]
    fn test_dimension_mismatch_display() {
        let err = ensure_dimensions("mask", (8, 6), (6, 8)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Dimension mismatch for mask: expected 8x6, got 6x8"
        );
    }

    // Tests mask errors carry the pixel position
    #[test]
    fn test_invalid_mask_display() {
        let err = BlendError::InvalidMask {
            x: 0,
            y: 3,
            reason: "active pixel lies on the outer border".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid mask at (0, 3): active pixel lies on the outer border"
        );
    }

    // Tests non-convergence reports sweeps, residual and threshold
    #[test]
    fn test_non_convergence_display() {
        let err = BlendError::NonConvergence {
            sweeps: 50_000,
            residual: 3.25,
            threshold: 1.0,
        };
        let message = err.to_string();
        assert!(message.contains("50000 sweeps"));
        assert!(message.contains("3.2500"));
        assert!(message.contains("threshold 1"));
    }

    // Tests placement errors keep negative coordinates
    #[test]
    fn test_placement_display() {
        let err = BlendError::PlacementOutOfBounds {
            x: -2,
            y: 5,
            canvas: (10, 10),
        };
        assert!(err.to_string().contains("(-2, 5)"));
        assert!(err.to_string().contains("10x10"));
    }

    // Tests the parameter helper formats value and reason
    #[test]
    fn test_invalid_parameter_helper() {
        let err = invalid_parameter("sweep_batch", &0, &"must be at least 1");
        assert_eq!(
            err.to_string(),
            "Invalid parameter 'sweep_batch' = '0': must be at least 1"
        );
    }

    // Tests I/O failures expose their underlying cause
    #[test]
    fn test_error_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = BlendError::FileSystem {
            path: PathBuf::from("/out"),
            operation: "create directory",
            source: io,
        };
        assert_eq!(err.source().map(ToString::to_string), Some("denied".to_string()));

        let converted = BlendError::from(std::io::Error::other("disk full"));
        assert!(converted.source().is_some());

        assert!(BlendError::WorkerPanicked.source().is_none());
        assert!(BlendError::Cancelled { sweeps: 4 }.source().is_none());
    }
}
