//! credit-eda: command-line entry point

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use credit_eda::cli::Cli;
use credit_eda::plot::PngVisualizer;
use credit_eda::utils::{print_banner, print_completion, print_config, print_info};
use credit_eda::workflow::run_analysis;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config = cli.run_config()?;

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(
        &config.input,
        config.target(),
        &config.output,
        config.figures_dir.as_deref(),
        &config.cleaning.outlier_strategy.to_string(),
    );

    let outcome = run_analysis(&config, &PngVisualizer::default())?;

    let skipped = outcome.skipped().count();
    if skipped > 0 {
        print_info(&format!("{} step(s) skipped, see notices above", skipped));
    }
    print_completion();

    Ok(())
}
