//! CLI command for `rpmbatch doctor`

use anyhow::{bail, Result};
use std::path::Path;

use crate::cli::output::{is_json, is_quiet, print_detail, print_info, print_success, print_warning, status};
use crate::core::doctor::{run_doctor, DoctorReport, ToolStatus};

/// Execute the doctor command
pub async fn execute(config_path: &Path, repo_enabled: bool) -> Result<()> {
    let report = run_doctor(config_path, repo_enabled);

    if is_json() {
        println!("{}", serde_json::to_string_pretty(&report).unwrap_or_default());
    } else if !is_quiet() {
        print_report(&report);
    }

    let missing: Vec<&str> = report.missing_required().map(|t| t.tool).collect();
    if !missing.is_empty() {
        bail!("Missing required tools: {}", missing.join(", "));
    }
    if let Some(error) = &report.config_error {
        bail!("Invalid configuration: {error}");
    }
    Ok(())
}

fn print_report(report: &DoctorReport) {
    print_info("Checking RPM tooling...");
    println!();

    for check in &report.tools {
        let optional = if check.required { "" } else { " [optional]" };
        match &check.status {
            ToolStatus::Found { path, version } => {
                let version = version.as_deref().map(|v| format!(" {v}")).unwrap_or_default();
                println!("  {} {}{version}{optional}", status::SUCCESS, check.tool);
                print_detail(&path.display().to_string());
            }
            ToolStatus::Missing { install_hint } => {
                println!("  {} {}{optional}", status::ERROR, check.tool);
                print_detail(&format!("not found in PATH, {install_hint}"));
            }
        }
    }
    if let Some(error) = &report.config_error {
        print_warning(error);
    }

    println!();
    if report.is_complete() {
        print_success("All checks passed");
    } else if report.is_usable() {
        print_warning("Optional tools are missing; the local repository cannot be used");
    }
}
