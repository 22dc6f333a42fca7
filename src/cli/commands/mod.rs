//! CLI command implementations
//!
//! Each command is implemented in its own submodule. The steps shared by
//! several commands (config loading, descriptor loading, batch assembly)
//! live here.

pub mod build;
pub mod doctor;
pub mod parse;
pub mod queue;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::core::batch::{BatchBuilder, BatchReport};
use crate::core::global_config::GlobalConfig;
use crate::core::input::split_values;
use crate::infra::actions::Group;
use crate::infra::dirs::RpmbatchDirs;
use crate::infra::expand::{self, Loaded, RawFileProvider, RpmspecProvider};
use crate::infra::filesystem;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build every eligible package in dependency order
    Build {
        #[command(flatten)]
        batch: BatchArgs,

        /// Continue with the rest of the queue after a failed package
        #[arg(short, long)]
        keep_going: bool,

        /// Do not publish built packages through a local yum repository
        #[arg(long)]
        no_local_repo: bool,

        /// Run the %check section of each package
        #[arg(long)]
        with_check: bool,

        /// Packages to install before building (comma or newline separated)
        #[arg(long, env = "INPUT_YUM-EXTRAS")]
        extra_packages: Vec<String>,
    },

    /// Print the build order without building anything
    Queue {
        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Print the facts extracted from each spec file
    Parse {
        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Check that the RPM tooling is installed
    Doctor,
}

/// Arguments selecting and reading the batch
#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// Spec files or directories containing them (comma separated lists allowed)
    #[arg(required = true)]
    pub specs: Vec<String>,

    /// Host RPM architecture (defaults to the machine architecture)
    #[arg(long)]
    pub arch: Option<String>,

    /// Number of spec files expanded in parallel
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Read spec files verbatim instead of expanding macros with rpmspec
    #[arg(long)]
    pub no_expand: bool,
}

impl Commands {
    /// Execute the command
    pub async fn run(self, config_path: Option<&Path>) -> Result<()> {
        let config = load_config(config_path)?;

        match self {
            Commands::Build {
                batch,
                keep_going,
                no_local_repo,
                with_check,
                extra_packages,
            } => {
                build::execute(
                    &config,
                    &batch,
                    build::BuildOptions {
                        keep_going,
                        no_local_repo,
                        with_check,
                        extra_packages: split_values(extra_packages),
                    },
                )
                .await
            }
            Commands::Queue { batch } => queue::execute(&config, &batch).await,
            Commands::Parse { batch } => parse::execute(&config, &batch).await,
            Commands::Doctor => {
                doctor::execute(&config_file_path(config_path), config.repo_enabled()).await
            }
        }
    }
}

fn config_file_path(explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(
        || RpmbatchDirs::new().global_config_path(),
        Path::to_path_buf,
    )
}

/// Load the global configuration, from `explicit` if given
pub fn load_config(explicit: Option<&Path>) -> Result<GlobalConfig> {
    let path = config_file_path(explicit);
    tracing::debug!("Loading configuration from {}", path.display());
    GlobalConfig::load_from_path(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// Host RPM architecture for this run
///
/// `--arch` accepts machine names too (`amd64`, `arm64`), translated the
/// same way as the detected architecture.
pub fn host_arch(config: &GlobalConfig, args: &BatchArgs) -> String {
    match &args.arch {
        Some(arch) => config.arch_table().translate(arch),
        None => config.host_arch(),
    }
}

/// Spec paths named by the arguments, directories expanded
pub fn spec_paths(args: &BatchArgs) -> Vec<PathBuf> {
    let paths: Vec<PathBuf> = split_values(&args.specs)
        .into_iter()
        .map(PathBuf::from)
        .collect();
    filesystem::discover_specs(&paths)
}

/// Read every spec named by `args`
pub async fn load_descriptors(config: &GlobalConfig, args: &BatchArgs) -> Result<Vec<Loaded>> {
    let _group = Group::start("Reading RPM spec files");

    let paths = spec_paths(args);
    let cwd = std::env::current_dir().context("Failed to determine the current directory")?;
    let jobs = args.jobs.filter(|j| *j > 0).unwrap_or_else(|| config.jobs());
    tracing::info!("Reading {} spec files with {jobs} workers", paths.len());

    let loaded = if args.no_expand {
        expand::load_descriptors(Arc::new(RawFileProvider), paths, cwd, jobs).await
    } else {
        let provider = RpmspecProvider::new(config.expand_command());
        expand::load_descriptors(Arc::new(provider), paths, cwd, jobs).await
    };
    Ok(loaded)
}

/// Read specs and assemble the batch for `host_arch`
pub async fn load_batch(
    config: &GlobalConfig,
    args: &BatchArgs,
    host_arch: &str,
) -> Result<BatchReport> {
    let mut builder = BatchBuilder::new(host_arch);
    for (path, parsed) in load_descriptors(config, args).await? {
        builder.add(&path, parsed);
    }
    Ok(builder.finish())
}
