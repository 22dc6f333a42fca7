//! CLI command for `rpmbatch queue`
//!
//! Prints the build order of the batch and everything that was left out.

use anyhow::Result;

use crate::cli::commands::{host_arch, load_batch, BatchArgs};
use crate::cli::output::{is_json, is_quiet, print_detail, print_info, status};
use crate::core::batch::{BatchReport, Skipped};
use crate::core::global_config::GlobalConfig;
use crate::core::queue::{build_queue, BuildQueue};
use crate::infra::actions::Group;

/// Execute the queue command
pub async fn execute(config: &GlobalConfig, args: &BatchArgs) -> Result<()> {
    let arch = host_arch(config, args);
    let report = load_batch(config, args, &arch).await?;

    let queue = {
        let _group = Group::start("Building jobs queue");
        build_queue(&report.batch, &report.batch.sorted_names())
    };

    if is_json() {
        println!(
            "{}",
            serde_json::to_string_pretty(&queue_json(&arch, &queue, &report)).unwrap_or_default()
        );
    } else if !is_quiet() {
        print_queue(&arch, &queue);
        print_skipped(&report.skipped);
    }

    report.ensure_not_empty()?;
    Ok(())
}

/// JSON document describing a queue and the skipped descriptors
pub fn queue_json(arch: &str, queue: &BuildQueue<'_>, report: &BatchReport) -> serde_json::Value {
    serde_json::json!({
        "host_arch": arch,
        "queue": queue.entries().iter().map(|d| serde_json::json!({
            "name": d.name,
            "source_path": d.source_path,
            "build_root": d.build_root,
        })).collect::<Vec<_>>(),
        "skipped": skipped_json(&report.skipped),
        "cycle_edges": queue.cycle_edges().iter().map(|e| serde_json::json!({
            "package": e.package,
            "dependency": e.dependency,
        })).collect::<Vec<_>>(),
    })
}

/// JSON list of skipped descriptors
pub fn skipped_json(skipped: &[Skipped]) -> Vec<serde_json::Value> {
    skipped
        .iter()
        .map(|s| {
            serde_json::json!({
                "path": s.path,
                "name": s.name,
                "kind": s.reason.kind(),
                "reason": s.reason.to_string(),
            })
        })
        .collect()
}

/// Print the build order
pub fn print_queue(arch: &str, queue: &BuildQueue<'_>) {
    print_info(&format!(
        "Package build order ({} packages, host architecture {arch}):",
        queue.len()
    ));
    for (i, descriptor) in queue.entries().iter().enumerate() {
        println!(
            "  {:>3}. {} ({})",
            i + 1,
            descriptor.name,
            descriptor.source_path.display()
        );
    }
    for edge in queue.cycle_edges() {
        print_detail(&format!(
            "{} Ignored cyclic dependency {} -> {}",
            status::WARNING,
            edge.package,
            edge.dependency
        ));
    }
}

/// Print skipped descriptors with their reasons
pub fn print_skipped(skipped: &[Skipped]) {
    if skipped.is_empty() {
        return;
    }
    println!();
    print_info(&format!("Skipped {} spec files:", skipped.len()));
    for s in skipped {
        println!("  {} {}: {}", status::ERROR, s.path.display(), s.reason);
    }
}
