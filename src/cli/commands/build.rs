//! Build command implementation
//!
//! Implements `rpmbatch build`: reads the batch, computes the build queue and
//! drives rpmbuild over it.

use anyhow::{bail, Context, Result};

use crate::cli::commands::queue::{print_queue, print_skipped, queue_json};
use crate::cli::commands::{host_arch, load_batch, BatchArgs};
use crate::cli::output::{create_build_bar, is_json, is_quiet, print_success, print_warning, status};
use crate::config::defaults::SUCCESSFUL_OUTPUT_KEY;
use crate::core::builder::{BuildEvent, BuildOrchestrator, BuildSummary, FailurePolicy};
use crate::core::global_config::GlobalConfig;
use crate::core::queue::build_queue;
use crate::infra::actions::{self, Group};
use crate::infra::driver::{DriverOptions, RpmBuildDriver};
use crate::infra::runner::SystemRunner;

/// Build options
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Continue after a failed package
    pub keep_going: bool,
    /// Skip the local repository
    pub no_local_repo: bool,
    /// Run %check
    pub with_check: bool,
    /// Packages installed before the batch
    pub extra_packages: Vec<String>,
}

/// Execute the build command
pub async fn execute(config: &GlobalConfig, args: &BatchArgs, options: BuildOptions) -> Result<()> {
    let arch = host_arch(config, args);
    let report = load_batch(config, args, &arch).await?;

    if !is_json() && !is_quiet() {
        print_skipped(&report.skipped);
    }
    report.ensure_not_empty()?;

    let queue = {
        let _group = Group::start("Building jobs queue");
        let queue = build_queue(&report.batch, &report.batch.sorted_names());
        tracing::debug!("Package build order: {}", queue.names().join(", "));
        queue
    };
    if !is_json() && !is_quiet() {
        print_queue(&arch, &queue);
    }

    let cwd = std::env::current_dir().context("Failed to determine the current directory")?;
    let extra_packages = if options.extra_packages.is_empty() {
        config.build.extra_packages.clone()
    } else {
        options.extra_packages
    };
    let repo_enabled = config.repo_enabled() && !options.no_local_repo;
    let driver_options = DriverOptions {
        nocheck: config.nocheck() && !options.with_check,
        extra_packages,
        repo_config_path: repo_enabled.then(|| config.repo_config_path()),
        repo_source_dir: cwd,
    };
    let policy = if options.keep_going || config.keep_going() {
        FailurePolicy::KeepGoing
    } else {
        FailurePolicy::FailFast
    };

    let mut driver = RpmBuildDriver::new(SystemRunner, driver_options);
    let bar = create_build_bar(queue.len() as u64);
    let summary = BuildOrchestrator::new()
        .with_policy(policy)
        .run(&queue, &mut driver, |event| match event {
            BuildEvent::Started { descriptor, .. } => bar.set_message(descriptor.name.clone()),
            BuildEvent::Succeeded { .. } => bar.inc(1),
            BuildEvent::Failed { descriptor, error } => {
                bar.suspend(|| print_warning(&format!("{} failed: {error}", descriptor.name)));
                bar.inc(1);
            }
        });
    bar.finish_and_clear();

    publish_outputs(&summary)?;

    if is_json() {
        let mut doc = queue_json(&arch, &queue, &report);
        doc["successful"] = serde_json::json!(summary.succeeded);
        doc["failed"] = serde_json::json!(summary
            .failed
            .iter()
            .map(|f| serde_json::json!({
                "name": f.name,
                "source_path": f.source_path,
                "error": f.error,
            }))
            .collect::<Vec<_>>());
        doc["not_attempted"] = serde_json::json!(summary.not_attempted);
        println!("{}", serde_json::to_string_pretty(&doc).unwrap_or_default());
    } else if !is_quiet() {
        print_summary(&summary);
    }

    if let Some(error) = &summary.prepare_error {
        bail!("Failed to prepare the build environment: {error}");
    }
    if !summary.is_success() {
        bail!(
            "{} of {} packages failed to build",
            summary.failed.len(),
            queue.len()
        );
    }
    Ok(())
}

/// Publish the list of built spec paths as a step output
fn publish_outputs(summary: &BuildSummary) -> Result<()> {
    if !actions::is_enabled() {
        return Ok(());
    }
    let successful = summary
        .succeeded
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(",");
    actions::set_output(SUCCESSFUL_OUTPUT_KEY, &successful)
        .context("Failed to write the step output")?;
    Ok(())
}

fn print_summary(summary: &BuildSummary) {
    println!();
    if summary.is_success() {
        print_success("Build complete!");
    }
    println!("  Packages built: {}", summary.succeeded.len());
    for failed in &summary.failed {
        println!("  {} {}: {}", status::ERROR, failed.name, failed.error);
    }
    if !summary.not_attempted.is_empty() {
        println!("  Not attempted: {}", summary.not_attempted.join(", "));
    }
}
