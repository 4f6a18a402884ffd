//! CLI entry point for Poisson image blending

use clap::Parser;
use poissonblend::io::cli::{BlendProcessor, Cli};
use poissonblend::io::logging::init_logging;

fn main() -> poissonblend::Result<()> {
    let cli = Cli::parse();
    let _logger = init_logging(cli.log_level())?;
    let processor = BlendProcessor::new(cli);
    processor.process()?;
    Ok(())
}
