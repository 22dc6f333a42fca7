//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no business logic - that belongs in the [`crate::core`] module.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use commands::Commands;
use output::OutputConfig;

/// Rpmbatch - build interdependent RPM packages in dependency order
///
/// Reads a batch of spec files, works out which packages of the batch have
/// to be built before which, and runs rpmbuild over them in that order.
#[derive(Parser, Debug)]
#[command(name = "rpmbatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Emit GitHub Actions log groups and step outputs
    #[arg(long, global = true)]
    pub github: bool,

    /// Use this config file instead of the one in the config directory
    #[arg(long, global = true, env = "RPMBATCH_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Output settings requested by the global flags
    pub fn output_config(&self, in_github_actions: bool) -> OutputConfig {
        OutputConfig::new(
            self.quiet,
            self.json,
            self.verbose,
            self.github || in_github_actions,
        )
    }

    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        if let Some(cmd) = self.command {
            cmd.run(self.config.as_deref()).await
        } else {
            // No subcommand provided, show help
            use clap::CommandFactory;
            let mut cmd = Self::command();
            cmd.print_help()?;
            Ok(())
        }
    }
}
