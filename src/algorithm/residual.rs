//! Convergence metric for the driving loop

use crate::algorithm::assembly::{LinearSystem, Rgb, Variable};

/// Unnormalised equation error of one variable, per channel
///
/// `e[k] = b[k] + sum(x[j][k] for linked j) - D * x[i][k]`
pub fn equation_error(variable: &Variable, own: Rgb, estimate: &[Rgb]) -> Rgb {
    let mut error = variable.rhs;
    for neighbor in variable.linked().filter_map(|j| estimate.get(j)) {
        for (value, contribution) in error.iter_mut().zip(neighbor) {
            *value += contribution;
        }
    }

    let degree = f64::from(variable.degree);
    for (value, current) in error.iter_mut().zip(own) {
        *value -= degree * current;
    }
    error
}

/// Euclidean norm of the residual across every variable and channel combined
pub fn residual_norm(variables: &[Variable], estimate: &[Rgb]) -> f64 {
    variables
        .iter()
        .zip(estimate)
        .map(|(variable, own)| {
            equation_error(variable, *own, estimate)
                .iter()
                .map(|e| e * e)
                .sum::<f64>()
        })
        .sum::<f64>()
        .sqrt()
}

impl LinearSystem {
    /// Residual norm of the current estimate
    pub fn residual(&self) -> f64 {
        residual_norm(&self.variables, &self.estimate)
    }
}
