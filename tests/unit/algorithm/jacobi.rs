//! Tests for double-buffered Jacobi sweeps

#[cfg(test)]
mod tests {
    use crate::{mask_with, uniform};
    use poissonblend::algorithm::assembly::{Rgb, Variable};
    use poissonblend::algorithm::jacobi::{sweep, sweep_into, update_variable};
    use poissonblend::spatial::canvas::is_strict_interior;
    use poissonblend::{LinearSystem, Mask, PackedImage};
    use rand::{Rng, SeedableRng, rngs::StdRng};

    // Two linked pixels with rhs +60 and -60 on every channel
    fn two_pixel_system() -> LinearSystem {
        let mut source = uniform(6, 5, [0, 0, 0]);
        source.set_rgb(2, 2, [100, 100, 100]);
        source.set_rgb(3, 2, [40, 40, 40]);
        let mask = mask_with(6, 5, &[(2, 2), (3, 2)]);
        let destination = uniform(6, 5, [0, 0, 0]);
        LinearSystem::build(&source, &mask, &destination).expect("valid inputs")
    }

    // Tests the update divides rhs plus linked estimates by the degree
    #[test]
    fn test_update_variable_formula() {
        let variable = Variable {
            pixel: [2, 2],
            degree: 4,
            links: [Some(1), None, Some(2), None],
            rhs: [4.0, 8.0, 12.0],
        };
        let previous = [[100.0; 3], [4.0, 0.0, -4.0], [8.0, 8.0, 8.0]];

        let next = update_variable(&variable, previous[0], &previous);
        assert_eq!(next, [4.0, 4.0, 4.0]);
    }

    // Tests a degree-zero variable keeps its value instead of dividing by zero
    #[test]
    fn test_update_variable_zero_degree() {
        let variable = Variable {
            pixel: [1, 1],
            degree: 0,
            links: [None; 4],
            rhs: [5.0, 5.0, 5.0],
        };
        let next = update_variable(&variable, [1.0, 2.0, 3.0], &[[1.0, 2.0, 3.0]]);
        assert_eq!(next, [1.0, 2.0, 3.0]);
    }

    // Tests one sweep reads only the previous estimate (Jacobi, not Gauss-Seidel)
    #[test]
    fn test_sweep_uses_previous_estimate_only() {
        let system = two_pixel_system();
        let previous = system.estimate().to_vec();

        let next = sweep(system.variables(), &previous);

        // Gauss-Seidel would give the second pixel (-60 + 15) / 4
        assert_eq!(next, vec![[15.0; 3], [-15.0; 3]]);
        assert_eq!(previous, vec![[0.0; 3]; 2]);
    }

    // Tests stepping the system matches the pure sweep
    #[test]
    fn test_step_matches_sweep() {
        let mut system = two_pixel_system();
        let mut expected = system.estimate().to_vec();
        for _ in 0..3 {
            expected = sweep(system.variables(), &expected);
        }

        system.step();
        system.step_many(2);

        assert_eq!(system.estimate(), expected.as_slice());
        assert_eq!(system.estimate()[0], [12.1875; 3]);
    }

    // Tests writing into a caller buffer leaves the source buffer intact
    #[test]
    fn test_sweep_into() {
        let system = two_pixel_system();
        let previous = vec![[15.0; 3], [-15.0; 3]];
        let mut next = vec![[0.0; 3]; 2];

        sweep_into(system.variables(), &previous, &mut next);

        assert_eq!(next, vec![[11.25; 3], [-11.25; 3]]);
        assert_eq!(previous, vec![[15.0; 3], [-15.0; 3]]);
    }

    // Tests sweeping an empty system is a no-op
    #[test]
    fn test_empty_sweep() {
        assert!(sweep(&[], &[]).is_empty());
    }

    fn random_system(rng: &mut StdRng, size: usize) -> LinearSystem {
        let mut source = PackedImage::new(size, size, 0);
        let mut destination = PackedImage::new(size, size, 0);
        let mut mask = Mask::new(size, size);
        for y in 0..size {
            for x in 0..size {
                source.set(x, y, rng.random::<u32>() & 0x00FF_FFFF);
                destination.set(x, y, rng.random::<u32>() & 0x00FF_FFFF);
                if is_strict_interior((size, size), x, y)
                    && (2..size - 2).contains(&x)
                    && rng.random_bool(0.7)
                {
                    mask.set(x, y, 255);
                }
            }
        }
        LinearSystem::build(&source, &mask, &destination).expect("valid inputs")
    }

    // Element-wise update with no shared state, the order-independent reference
    fn reference_sweep(variables: &[Variable], previous: &[Rgb]) -> Vec<Rgb> {
        variables
            .iter()
            .zip(previous)
            .map(|(variable, own)| update_variable(variable, *own, previous))
            .collect()
    }

    // Tests the compiled sweep (serial, or parallel with the rayon feature)
    // is bit-identical to the element-wise reference over many sweeps
    #[test]
    fn test_sweep_into_matches_reference() {
        let mut rng = StdRng::seed_from_u64(31);

        for _ in 0..5 {
            let mut system = random_system(&mut rng, 24);
            let mut expected = system.estimate().to_vec();

            for _ in 0..20 {
                let reference = reference_sweep(system.variables(), &expected);
                let mut next = vec![[0.0; 3]; expected.len()];
                sweep_into(system.variables(), &expected, &mut next);
                assert_eq!(next, reference);

                system.step();
                assert_eq!(system.estimate(), reference.as_slice());
                expected = reference;
            }
        }
    }

    // Tests parallel sweeps on a large system stay bit-identical to the reference
    #[cfg(feature = "rayon")]
    #[test]
    fn test_parallel_sweep_large_system() {
        let mut rng = StdRng::seed_from_u64(97);
        let mut system = random_system(&mut rng, 96);
        let mut expected = system.estimate().to_vec();

        for _ in 0..10 {
            expected = reference_sweep(system.variables(), &expected);
            system.step();
        }

        assert_eq!(system.estimate(), expected.as_slice());
    }
}
