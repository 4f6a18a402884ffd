//! Jacobi sweeps over the assembled system
//!
//! A sweep reads only the previous estimate and writes only the next one;
//! the two buffers are swapped after every full sweep. Updating in place
//! would be Gauss-Seidel, not Jacobi.

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::algorithm::assembly::{LinearSystem, Rgb, Variable};

/// New estimate for one variable given the previous estimate of all variables
///
/// `x'[i] = (b[i] + sum(x[j] for linked j)) / D[i]`, per channel. A variable
/// with zero degree keeps its previous value.
pub fn update_variable(variable: &Variable, own: Rgb, previous: &[Rgb]) -> Rgb {
    if variable.degree == 0 {
        return own;
    }

    let mut next = variable.rhs;
    for neighbor in variable.linked().filter_map(|j| previous.get(j)) {
        for (value, contribution) in next.iter_mut().zip(neighbor) {
            *value += contribution;
        }
    }

    let degree = f64::from(variable.degree);
    next.map(|value| value / degree)
}

/// Perform one full sweep, returning the next estimate
pub fn sweep(variables: &[Variable], previous: &[Rgb]) -> Vec<Rgb> {
    let mut next = previous.to_vec();
    sweep_into(variables, previous, &mut next);
    next
}

/// Perform one full sweep, writing the next estimate into `next`
///
/// Entries of `next` beyond the shorter of `variables` and `previous` are
/// left untouched.
#[cfg(not(feature = "rayon"))]
pub fn sweep_into(variables: &[Variable], previous: &[Rgb], next: &mut [Rgb]) {
    for ((slot, variable), own) in next.iter_mut().zip(variables).zip(previous) {
        *slot = update_variable(variable, *own, previous);
    }
}

/// Perform one full sweep, writing the next estimate into `next`
///
/// Entries of `next` beyond the shorter of `variables` and `previous` are
/// left untouched.
#[cfg(feature = "rayon")]
pub fn sweep_into(variables: &[Variable], previous: &[Rgb], next: &mut [Rgb]) {
    next.par_iter_mut()
        .zip(variables.par_iter())
        .zip(previous.par_iter())
        .for_each(|((slot, variable), own)| {
            *slot = update_variable(variable, *own, previous);
        });
}

impl LinearSystem {
    /// Advance the estimate by one Jacobi sweep
    pub fn step(&mut self) {
        if self.scratch.len() != self.estimate.len() {
            self.scratch.clone_from(&self.estimate);
        }
        sweep_into(&self.variables, &self.estimate, &mut self.scratch);
        std::mem::swap(&mut self.estimate, &mut self.scratch);
    }

    /// Advance the estimate by `count` Jacobi sweeps
    pub fn step_many(&mut self, count: usize) {
        for _ in 0..count {
            self.step();
        }
    }
}
