//! Command-line interface for blending a source region into a destination image

use crate::algorithm::assembly::LinearSystem;
use crate::algorithm::executor::{PoissonSolver, SolveReport, SolverConfig};
use crate::algorithm::reconstruction::reconstruct_image;
use crate::io::configuration::{
    DEFAULT_CONVERGENCE_THRESHOLD, DEFAULT_MAX_SWEEPS, DEFAULT_SWEEP_BATCH, OUTPUT_EXTENSION,
    OUTPUT_SUFFIX,
};
use crate::io::error::Result;
use crate::io::image::{load_color_image, load_mask, save_color_image};
use crate::io::logging::log_level;
use crate::io::progress::SolveProgress;
use crate::spatial::composite::compose;
use clap::Parser;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "poissonblend")]
#[command(
    author,
    version,
    about = "Seamlessly blend a masked source region into a destination image",
    allow_negative_numbers = true
)]
/// Command-line arguments for the blending tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Source image supplying the pasted region and its gradients
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Mask image the size of SOURCE; nonzero pixels are blended
    #[arg(value_name = "MASK")]
    pub mask: PathBuf,

    /// Destination image supplying the canvas and boundary colors
    #[arg(value_name = "DESTINATION")]
    pub destination: PathBuf,

    /// Destination column of the source's left edge (may be negative)
    #[arg(short = 'x', long, default_value_t = 0)]
    pub offset_x: i64,

    /// Destination row of the source's top edge (may be negative)
    #[arg(short = 'y', long, default_value_t = 0)]
    pub offset_y: i64,

    /// Output path (defaults to <DESTINATION>_blended.png)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Residual norm at which the solve stops
    #[arg(short, long, default_value_t = DEFAULT_CONVERGENCE_THRESHOLD)]
    pub threshold: f64,

    /// Maximum Jacobi sweeps before giving up
    #[arg(short, long, default_value_t = DEFAULT_MAX_SWEEPS)]
    pub max_sweeps: usize,

    /// Sweeps between residual checks
    #[arg(short, long, default_value_t = DEFAULT_SWEEP_BATCH)]
    pub batch: usize,

    /// Fail without writing output if the solve does not converge
    #[arg(short, long)]
    pub strict: bool,

    /// Overwrite the output if it already exists
    #[arg(short = 'f', long)]
    pub overwrite: bool,

    /// Suppress progress output and informational logging
    #[arg(short, long)]
    pub quiet: bool,

    /// Log every residual check
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Check if an existing output file should be left alone
    pub const fn skip_existing(&self) -> bool {
        !self.overwrite
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Log level implied by `--verbose` and `--quiet`
    pub const fn log_level(&self) -> &'static str {
        log_level(self.verbose, self.quiet)
    }

    /// Solver parameters from the command line
    pub const fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            convergence_threshold: self.threshold,
            max_sweeps: self.max_sweeps,
            sweep_batch: self.batch,
        }
    }

    /// Where the blended image is written
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| Self::default_output_path(&self.destination))
    }

    fn default_output_path(destination: &Path) -> PathBuf {
        let stem = destination.file_stem().unwrap_or_default();
        let output_name = format!(
            "{}{}.{}",
            stem.to_string_lossy(),
            OUTPUT_SUFFIX,
            OUTPUT_EXTENSION
        );

        if let Some(parent) = destination.parent() {
            parent.join(output_name)
        } else {
            PathBuf::from(output_name)
        }
    }
}

/// Orchestrates loading, placement, solving and export for one blend
pub struct BlendProcessor {
    cli: Cli,
}

impl BlendProcessor {
    /// Create a processor with the given CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the blend described by the CLI arguments
    ///
    /// Returns `None` when the output already exists and is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The solver parameters are invalid
    /// - An input image cannot be loaded
    /// - The source and mask cannot be placed onto the destination
    /// - The solve does not converge and `--strict` is set
    /// - The output cannot be written
    pub fn process(&self) -> Result<Option<SolveReport>> {
        let config = self.cli.solver_config();
        config.validate()?;

        let output_path = self.cli.output_path();
        if self.cli.skip_existing() && output_path.exists() {
            info!(
                "Output {} already exists, skipping (use --overwrite to replace)",
                output_path.display()
            );
            return Ok(None);
        }

        let start_time = Instant::now();

        let source = load_color_image(&self.cli.source)?;
        let source_mask = load_mask(&self.cli.mask)?;
        let destination = load_color_image(&self.cli.destination)?;

        let composite = compose(
            &source,
            &source_mask,
            &destination,
            [self.cli.offset_x, self.cli.offset_y],
        )?;
        let system = LinearSystem::build(&composite.source, &composite.mask, &destination)?;

        let progress = if self.cli.should_show_progress() {
            SolveProgress::new(config.max_sweeps, config.convergence_threshold)
        } else {
            SolveProgress::hidden(config.max_sweeps, config.convergence_threshold)
        };

        let mut solver = PoissonSolver::new(system, config)?;
        let report = solver.run(|checkpoint| progress.update(checkpoint));
        progress.finish(&report);

        if self.cli.strict {
            report.ensure_converged()?;
        } else if !report.is_converged() {
            warn!(
                "Writing partial result: residual {:.4} after {} sweeps",
                report.final_residual, report.sweeps_performed
            );
        }

        let blended = reconstruct_image(&destination, &composite.mask, solver.system())?;
        save_color_image(&blended, &output_path)?;

        info!(
            "Wrote {} in {:.2?}",
            output_path.display(),
            start_time.elapsed()
        );

        Ok(Some(report))
    }
}
