//! Rpmbatch CLI - build interdependent RPM packages in dependency order
//!
//! Entry point for the rpmbatch command-line application.

use anyhow::Result;
use clap::Parser;

use rpmbatch::cli::output::display_error;
use rpmbatch::cli::Cli;
use rpmbatch::infra::actions;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output_config = cli.output_config(actions::detected());

    // Initialize tracing subscriber, RUST_LOG overrides the verbosity flags
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(output_config.log_level())),
        )
        .with_writer(std::io::stderr)
        .init();

    // Apply output configuration globally
    output_config.apply_global();

    // Run the command and handle errors
    match cli.run().await {
        Ok(()) => Ok(()),
        Err(e) => {
            display_error(&e);
            std::process::exit(1);
        }
    }
}
