//! Tooling checks behind `rpmbatch doctor`
//!
//! Locates every program the build driver runs and confirms the global
//! configuration parses.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::config::defaults::{REPO_TOOLS, REQUIRED_TOOLS};
use crate::core::global_config::GlobalConfig;

/// Where a tool was found, or what to install when it was not
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolStatus {
    Found {
        path: PathBuf,
        version: Option<String>,
    },
    Missing {
        install_hint: &'static str,
    },
}

/// One external program and whether the run depends on it
#[derive(Debug, Clone, Serialize)]
pub struct ToolCheck {
    pub tool: &'static str,
    /// Missing optional tools only produce a warning
    pub required: bool,
    #[serde(flatten)]
    pub status: ToolStatus,
}

impl ToolCheck {
    pub fn is_found(&self) -> bool {
        matches!(self.status, ToolStatus::Found { .. })
    }
}

/// Everything `rpmbatch doctor` found
#[derive(Debug, Default, Serialize)]
pub struct DoctorReport {
    pub tools: Vec<ToolCheck>,
    /// Parse error of the config file, if any
    pub config_error: Option<String>,
}

impl DoctorReport {
    /// Required tools that could not be found
    pub fn missing_required(&self) -> impl Iterator<Item = &ToolCheck> {
        self.tools.iter().filter(|t| t.required && !t.is_found())
    }

    /// True when the batch can be built: every required tool present, config valid
    pub fn is_usable(&self) -> bool {
        self.missing_required().next().is_none() && self.config_error.is_none()
    }

    /// True when nothing at all is missing
    pub fn is_complete(&self) -> bool {
        self.is_usable() && self.tools.iter().all(ToolCheck::is_found)
    }
}

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+\.\d+(?:\.\d+)*)").expect("version pattern is valid"))
}

/// First dotted version number in a `--version` banner
fn parse_version(banner: &str) -> Option<String> {
    version_regex()
        .captures(banner)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn install_hint(tool: &str) -> &'static str {
    match tool {
        "rpmspec" | "rpmbuild" => "install the rpm-build package",
        "spectool" => "install the rpmdevtools package",
        "yum-builddep" => "install yum-utils (or dnf-plugins-core)",
        "createrepo" => "install createrepo or createrepo_c",
        _ => "install it with the system package manager",
    }
}

/// Locate `tool` on PATH and ask it for its version
pub fn probe_tool(tool: &'static str, required: bool) -> ToolCheck {
    let status = match which::which(tool) {
        Ok(path) => {
            let version = std::process::Command::new(&path)
                .arg("--version")
                .output()
                .ok()
                .and_then(|out| {
                    parse_version(&String::from_utf8_lossy(&out.stdout))
                        .or_else(|| parse_version(&String::from_utf8_lossy(&out.stderr)))
                });
            ToolStatus::Found { path, version }
        }
        Err(_) => ToolStatus::Missing {
            install_hint: install_hint(tool),
        },
    };
    ToolCheck {
        tool,
        required,
        status,
    }
}

/// Check every tool and the config file at `config_path`
///
/// The repository tools are only required while the local repository is enabled.
pub fn run_doctor(config_path: &Path, repo_enabled: bool) -> DoctorReport {
    let tools = REQUIRED_TOOLS
        .iter()
        .copied()
        .map(|tool| probe_tool(tool, true))
        .chain(REPO_TOOLS.iter().copied().map(|tool| probe_tool(tool, repo_enabled)))
        .collect();

    DoctorReport {
        tools,
        config_error: GlobalConfig::load_from_path(config_path)
            .err()
            .map(|e| e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn found(tool: &'static str, required: bool) -> ToolCheck {
        ToolCheck {
            tool,
            required,
            status: ToolStatus::Found {
                path: PathBuf::from("/usr/bin").join(tool),
                version: None,
            },
        }
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("RPM version 4.18.2"), Some("4.18.2".to_string()));
        assert_eq!(parse_version("createrepo_c 0.21.1 (Features: DeltaRPM)"), Some("0.21.1".to_string()));
        assert_eq!(parse_version("no digits"), None);
    }

    #[test]
    fn test_missing_tool_carries_install_hint() {
        let check = probe_tool("rpmbatch-no-such-tool", true);
        assert!(!check.is_found());
        assert!(matches!(check.status, ToolStatus::Missing { .. }));
    }

    #[test]
    fn test_missing_optional_tool_keeps_report_usable() {
        let report = DoctorReport {
            tools: vec![
                found("rpmbuild", true),
                ToolCheck {
                    tool: "createrepo",
                    required: false,
                    status: ToolStatus::Missing {
                        install_hint: install_hint("createrepo"),
                    },
                },
            ],
            config_error: None,
        };

        assert!(report.is_usable());
        assert!(!report.is_complete());
        assert_eq!(report.missing_required().count(), 0);
    }

    #[test]
    fn test_status_serializes_with_tag() {
        let json = serde_json::to_value(found("rpmbuild", true)).unwrap();
        assert_eq!(json["tool"], "rpmbuild");
        assert_eq!(json["status"], "found");
        assert_eq!(json["path"], "/usr/bin/rpmbuild");
    }

    #[test]
    fn test_run_doctor_reports_bad_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[build\n").unwrap();

        let report = run_doctor(&path, false);
        assert!(report.config_error.is_some());
        assert!(!report.is_usable());
        assert_eq!(report.tools.len(), REQUIRED_TOOLS.len() + REPO_TOOLS.len());
        assert!(report.tools.iter().filter(|t| !t.required).count() >= REPO_TOOLS.len());
    }
}
