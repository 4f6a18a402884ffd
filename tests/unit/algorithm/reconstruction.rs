//! Tests for writing solved estimates back into the destination

#[cfg(test)]
mod tests {
    use crate::{mask_with, uniform};
    use poissonblend::{BlendError, LinearSystem, Mask, reconstruct_image};

    // Tests out-of-range estimates are clamped per channel
    #[test]
    fn test_reconstruct_clamps() {
        let destination = uniform(5, 5, [50, 50, 50]);
        let mask = mask_with(5, 5, &[(2, 2)]);
        let mut system =
            LinearSystem::build(&destination, &mask, &destination).expect("valid inputs");
        assert!(system.set_estimate(0, [-10.0, 300.0, 127.6]));

        let output = reconstruct_image(&destination, &mask, &system).expect("same canvas");

        assert_eq!(output.get_rgb(2, 2), Some([0, 255, 128]));
    }

    // Tests inactive pixels are copied verbatim and the input is untouched
    #[test]
    fn test_reconstruct_copies_inactive() {
        let mut destination = uniform(6, 5, [1, 2, 3]);
        destination.set(0, 0, 0xFF00_0000);
        let mask = mask_with(6, 5, &[(2, 2), (3, 2)]);
        let mut system =
            LinearSystem::build(&destination, &mask, &destination).expect("valid inputs");
        assert!(system.set_estimate(0, [9.0; 3]));
        assert!(system.set_estimate(1, [8.0; 3]));
        let before = destination.clone();

        let output = reconstruct_image(&destination, &mask, &system).expect("same canvas");

        assert_eq!(destination, before);
        assert_eq!(output.get_rgb(2, 2), Some([9, 9, 9]));
        assert_eq!(output.get_rgb(3, 2), Some([8, 8, 8]));
        assert_eq!(output.get(0, 0), Some(0xFF00_0000));
        for y in 0..5 {
            for x in 0..6 {
                if !mask.is_active(x, y) {
                    assert_eq!(output.get(x, y), destination.get(x, y));
                }
            }
        }
    }

    // Tests an empty mask returns an identical copy of the destination
    #[test]
    fn test_reconstruct_empty_mask() {
        let destination = uniform(4, 4, [10, 20, 30]);
        let mask = Mask::new(4, 4);
        let system = LinearSystem::build(&destination, &mask, &destination).expect("valid inputs");

        let output = reconstruct_image(&destination, &mask, &system).expect("same canvas");
        assert_eq!(output, destination);
    }

    // Tests reconstruction is idempotent for the same system
    #[test]
    fn test_reconstruct_idempotent() {
        let destination = uniform(6, 6, [100, 0, 200]);
        let mask = mask_with(6, 6, &[(2, 2), (2, 3), (3, 3)]);
        let mut system =
            LinearSystem::build(&uniform(6, 6, [5, 5, 5]), &mask, &destination).expect("valid");
        system.step_many(5);

        let first = reconstruct_image(&destination, &mask, &system).expect("same canvas");
        let second = reconstruct_image(&destination, &mask, &system).expect("same canvas");
        assert_eq!(first, second);
    }

    // Tests a mask of another size is rejected
    #[test]
    fn test_reconstruct_dimension_mismatch() {
        let destination = uniform(5, 5, [0, 0, 0]);
        let mask = mask_with(5, 5, &[(2, 2)]);
        let system = LinearSystem::build(&destination, &mask, &destination).expect("valid inputs");

        let result = reconstruct_image(&destination, &Mask::new(6, 5), &system);
        assert!(matches!(result, Err(BlendError::DimensionMismatch { .. })));

        let result = reconstruct_image(&uniform(6, 5, [0, 0, 0]), &Mask::new(6, 5), &system);
        assert!(matches!(
            result,
            Err(BlendError::DimensionMismatch {
                input: "system canvas",
                ..
            })
        ));
    }
}
