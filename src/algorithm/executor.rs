//! Driving loop: alternates residual checks with batches of Jacobi sweeps
//!
//! The loop stops as soon as the residual norm reaches the convergence
//! threshold, the sweep budget is spent, or a cancellation is observed. Each
//! stop leaves the system holding the estimate it reached, so a caller can
//! still reconstruct a partial result.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::thread::JoinHandle;

use log::{debug, info, warn};

use crate::algorithm::assembly::LinearSystem;
use crate::algorithm::reconstruction::reconstruct_image;
use crate::io::configuration::{
    DEFAULT_CONVERGENCE_THRESHOLD, DEFAULT_MAX_SWEEPS, DEFAULT_SWEEP_BATCH,
};
use crate::io::error::{BlendError, Result, invalid_parameter};
use crate::spatial::canvas::{Mask, PackedImage};

/// Parameters controlling when the driving loop stops
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverConfig {
    /// Residual norm at or below which the solve has converged
    pub convergence_threshold: f64,
    /// Upper bound on the number of sweeps performed
    pub max_sweeps: usize,
    /// Sweeps performed between two residual checks
    pub sweep_batch: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            convergence_threshold: DEFAULT_CONVERGENCE_THRESHOLD,
            max_sweeps: DEFAULT_MAX_SWEEPS,
            sweep_batch: DEFAULT_SWEEP_BATCH,
        }
    }
}

impl SolverConfig {
    /// Check that every parameter is usable
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The threshold is negative or not finite
    /// - `max_sweeps` is zero
    /// - `sweep_batch` is zero
    pub fn validate(&self) -> Result<()> {
        if !self.convergence_threshold.is_finite() || self.convergence_threshold < 0.0 {
            return Err(invalid_parameter(
                "convergence_threshold",
                &self.convergence_threshold,
                &"must be finite and non-negative",
            ));
        }
        if self.max_sweeps == 0 {
            return Err(invalid_parameter(
                "max_sweeps",
                &self.max_sweeps,
                &"must be at least 1",
            ));
        }
        if self.sweep_batch == 0 {
            return Err(invalid_parameter(
                "sweep_batch",
                &self.sweep_batch,
                &"must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Why the driving loop stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveStatus {
    /// Residual reached the threshold
    Converged,
    /// Sweep budget ran out first
    BudgetExhausted,
    /// Cancellation was requested
    Cancelled,
}

/// Residual observed after a number of sweeps
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Checkpoint {
    /// Sweeps performed so far
    pub sweeps: usize,
    /// Residual norm of the current estimate
    pub residual: f64,
}

/// Outcome of a solve
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolveReport {
    /// Total sweeps performed
    pub sweeps_performed: usize,
    /// Residual norm of the final estimate
    pub final_residual: f64,
    /// Threshold the residual was compared against
    pub threshold: f64,
    /// Why the loop stopped
    pub status: SolveStatus,
}

impl SolveReport {
    /// Whether the residual reached the threshold
    pub fn is_converged(&self) -> bool {
        self.status == SolveStatus::Converged
    }

    /// Turn a non-converged outcome into an error
    ///
    /// # Errors
    ///
    /// Returns [`BlendError::NonConvergence`] if the budget ran out and
    /// [`BlendError::Cancelled`] if the solve was cancelled
    pub fn ensure_converged(&self) -> Result<()> {
        match self.status {
            SolveStatus::Converged => Ok(()),
            SolveStatus::BudgetExhausted => Err(BlendError::NonConvergence {
                sweeps: self.sweeps_performed,
                residual: self.final_residual,
                threshold: self.threshold,
            }),
            SolveStatus::Cancelled => Err(BlendError::Cancelled {
                sweeps: self.sweeps_performed,
            }),
        }
    }
}

/// Cooperative cancellation flag shared between a solve and its owner
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; observed at the next residual check
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Jacobi driving loop over an assembled system
///
/// Manages the sweep count, the latest residual and the stopping rule. Use
/// [`PoissonSolver::execute_batch`] to drive it step by step or
/// [`PoissonSolver::run`] to drive it to completion.
#[derive(Debug)]
pub struct PoissonSolver {
    system: LinearSystem,
    config: SolverConfig,
    sweeps: usize,
    residual: f64,
    cancellation: CancellationToken,
}

impl PoissonSolver {
    /// Create a solver and evaluate the initial residual
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn new(system: LinearSystem, config: SolverConfig) -> Result<Self> {
        config.validate()?;
        let residual = system.residual();
        Ok(Self {
            system,
            config,
            sweeps: 0,
            residual,
            cancellation: CancellationToken::new(),
        })
    }

    /// Observe `token` for cancellation requests
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Sweeps performed and residual at the latest check
    pub const fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            sweeps: self.sweeps,
            residual: self.residual,
        }
    }

    /// Terminal status, or `None` while the loop should keep sweeping
    pub fn status(&self) -> Option<SolveStatus> {
        if self.residual <= self.config.convergence_threshold {
            Some(SolveStatus::Converged)
        } else if self.cancellation.is_cancelled() {
            Some(SolveStatus::Cancelled)
        } else if self.sweeps >= self.config.max_sweeps {
            Some(SolveStatus::BudgetExhausted)
        } else {
            None
        }
    }

    /// Perform one batch of sweeps followed by a residual check
    ///
    /// The batch is shortened so the total never exceeds `max_sweeps`.
    /// Returns whether the loop should continue.
    pub fn execute_batch(&mut self) -> bool {
        if self.status().is_some() {
            return false;
        }
        self.sweep_batch();
        self.status().is_none()
    }

    fn sweep_batch(&mut self) {
        let remaining = self.config.max_sweeps.saturating_sub(self.sweeps);
        let batch = self.config.sweep_batch.min(remaining);
        self.system.step_many(batch);
        self.sweeps += batch;
        self.residual = self.system.residual();

        debug!("Sweep {}: residual {:.6}", self.sweeps, self.residual);
    }

    /// Drive the loop to completion, reporting every residual check
    pub fn run<F>(&mut self, mut observer: F) -> SolveReport
    where
        F: FnMut(Checkpoint),
    {
        let status = loop {
            observer(self.checkpoint());
            if let Some(status) = self.status() {
                break status;
            }
            self.sweep_batch();
        };

        let report = self.report_with(status);
        match status {
            SolveStatus::Converged => info!(
                "Converged after {} sweeps (residual {:.6})",
                report.sweeps_performed, report.final_residual
            ),
            SolveStatus::BudgetExhausted => warn!(
                "Sweep budget of {} exhausted with residual {:.6} above threshold {}",
                self.config.max_sweeps, report.final_residual, report.threshold
            ),
            SolveStatus::Cancelled => info!(
                "Cancelled after {} sweeps (residual {:.6})",
                report.sweeps_performed, report.final_residual
            ),
        }
        report
    }

    /// Current outcome; `status` is `BudgetExhausted` while the loop is still running
    pub fn report(&self) -> SolveReport {
        self.report_with(self.status().unwrap_or(SolveStatus::BudgetExhausted))
    }

    const fn report_with(&self, status: SolveStatus) -> SolveReport {
        SolveReport {
            sweeps_performed: self.sweeps,
            final_residual: self.residual,
            threshold: self.config.convergence_threshold,
            status,
        }
    }

    /// System being solved
    pub const fn system(&self) -> &LinearSystem {
        &self.system
    }

    /// Release the system with its current estimate
    pub fn into_system(self) -> LinearSystem {
        self.system
    }
}

/// Solve `system` until convergence, budget exhaustion or cancellation
///
/// # Errors
///
/// Returns an error if the configuration is invalid. Non-convergence is not
/// an error here; inspect the report or call [`SolveReport::ensure_converged`].
pub fn solve(system: LinearSystem, config: &SolverConfig) -> Result<(LinearSystem, SolveReport)> {
    solve_with(system, config, &CancellationToken::new(), |_| {})
}

/// [`solve`] with a cancellation token and a checkpoint observer
///
/// # Errors
///
/// Returns an error if the configuration is invalid
pub fn solve_with<F>(
    system: LinearSystem,
    config: &SolverConfig,
    cancellation: &CancellationToken,
    observer: F,
) -> Result<(LinearSystem, SolveReport)>
where
    F: FnMut(Checkpoint),
{
    let mut solver = PoissonSolver::new(system, *config)?.with_cancellation(cancellation.clone());
    let report = solver.run(observer);
    Ok((solver.into_system(), report))
}

/// Blended image together with the solve outcome
#[derive(Debug, Clone)]
pub struct BlendOutput {
    /// Destination with the solved region written in
    pub image: PackedImage,
    /// How the solve ended
    pub report: SolveReport,
}

/// Assemble, solve and reconstruct in one call
///
/// A non-converged solve still produces an image; check `report.status`.
///
/// # Errors
///
/// Returns an error if:
/// - The inputs differ in size
/// - The mask has an active pixel on the outer border
/// - The configuration is invalid
pub fn blend(
    source: &PackedImage,
    mask: &Mask,
    destination: &PackedImage,
    config: &SolverConfig,
) -> Result<BlendOutput> {
    let system = LinearSystem::build(source, mask, destination)?;
    let (system, report) = solve(system, config)?;
    let image = reconstruct_image(destination, mask, &system)?;
    Ok(BlendOutput { image, report })
}

#[derive(Debug, Default)]
struct SharedProgress {
    sweeps: AtomicUsize,
    residual_bits: AtomicU64,
}

impl SharedProgress {
    fn store(&self, checkpoint: Checkpoint) {
        self.sweeps.store(checkpoint.sweeps, Ordering::Relaxed);
        self.residual_bits
            .store(checkpoint.residual.to_bits(), Ordering::Relaxed);
    }

    fn load(&self) -> Checkpoint {
        Checkpoint {
            sweeps: self.sweeps.load(Ordering::Relaxed),
            residual: f64::from_bits(self.residual_bits.load(Ordering::Relaxed)),
        }
    }
}

/// Solve running on a background thread
///
/// The owner can poll progress, request cancellation and join for the result.
pub struct SolveHandle {
    cancellation: CancellationToken,
    progress: Arc<SharedProgress>,
    worker: JoinHandle<Result<(LinearSystem, SolveReport)>>,
}

impl SolveHandle {
    /// Start solving `system` on a new thread
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid; nothing is spawned
    pub fn spawn(system: LinearSystem, config: SolverConfig) -> Result<Self> {
        config.validate()?;

        let cancellation = CancellationToken::new();
        let progress = Arc::new(SharedProgress::default());
        let worker_token = cancellation.clone();
        let worker_progress = Arc::clone(&progress);

        let worker = std::thread::spawn(move || {
            solve_with(system, &config, &worker_token, |checkpoint| {
                worker_progress.store(checkpoint);
            })
        });

        Ok(Self {
            cancellation,
            progress,
            worker,
        })
    }

    /// Request cancellation; the worker stops at its next residual check
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Latest checkpoint published by the worker
    pub fn latest(&self) -> Checkpoint {
        self.progress.load()
    }

    /// Whether the worker has finished
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Wait for the worker and take its result
    ///
    /// # Errors
    ///
    /// Returns an error if the worker panicked or the solve failed
    pub fn join(self) -> Result<(LinearSystem, SolveReport)> {
        self.worker
            .join()
            .map_err(|_panic| BlendError::WorkerPanicked)?
    }
}
