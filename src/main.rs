//! nativedep CLI - external native dependency build orchestrator
//!
//! Entry point for the nativedep command-line application.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use nativedep::cli::output::{display_error, OutputConfig};
use nativedep::cli::Cli;

// Not `#[tokio::main]`: the process supervisor owns its runtime and blocks on it.
fn main() {
    let cli = Cli::parse();

    // Apply output configuration globally
    let output_config = OutputConfig::new(cli.quiet, cli.json, cli.verbose);
    output_config.apply_global();

    // Initialize tracing subscriber; RUST_LOG directives refine the -v level
    let env_directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder().parse_lossy(output_config.filter_directives(&env_directives)),
        )
        .init();

    if let Err(e) = cli.run() {
        display_error(&e);
        std::process::exit(1);
    }
}
