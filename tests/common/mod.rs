//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Test project context
///
/// Creates a temporary directory holding a batch of spec files and provides
/// utilities for running rpmbatch against it.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create `<name>/SPECS/<name>.spec` and return its path
    pub fn create_spec(&self, name: &str, content: &str) -> PathBuf {
        let relative = format!("{name}/SPECS/{name}.spec");
        self.create_file(&relative, content);
        self.dir.path().join(relative)
    }

    /// Check if a file exists in the test project
    #[allow(dead_code)]
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Read a file from the test project
    #[allow(dead_code)]
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }

    /// Command for the rpmbatch binary, isolated from the user's config and CI
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_rpmbatch"));
        cmd.current_dir(self.path());
        cmd.env("RPMBATCH_CONFIG", self.path().join("no-config.toml"));
        cmd.env_remove("GITHUB_ACTIONS");
        cmd.env_remove("GITHUB_OUTPUT");
        cmd.env_remove("INPUT_YUM-EXTRAS");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Run `rpmbatch <subcommand> --no-expand <args>`
    pub fn run(&self, subcommand: &str, args: &[&str]) -> Output {
        self.command()
            .arg(subcommand)
            .arg("--no-expand")
            .args(args)
            .output()
            .expect("Failed to execute rpmbatch")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a minimal spec file
#[allow(dead_code)]
pub fn spec(name: &str, build_requires: &[&str]) -> String {
    let mut text = format!("Name: {name}\nVersion: 1.0\nRelease: 1\nSummary: {name}\n");
    for dependency in build_requires {
        text.push_str(&format!("BuildRequires: {dependency}\n"));
    }
    text.push_str("\n%description\nTest package.\n");
    text
}

/// Path as a `&str` argument
pub fn arg(path: &Path) -> &str {
    path.to_str().expect("temp paths are UTF-8")
}

/// Parse stdout as JSON
#[allow(dead_code)]
pub fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).unwrap_or_else(|e| panic!("invalid JSON ({e}): {stdout}"))
}

/// Names of the queue entries in a `queue --json` document
#[allow(dead_code)]
pub fn queue_names(doc: &serde_json::Value) -> Vec<String> {
    doc["queue"]
        .as_array()
        .expect("queue array")
        .iter()
        .map(|entry| entry["name"].as_str().expect("name").to_string())
        .collect()
}

/// Sample spec carrying the directives rpmbatch cares about
#[allow(dead_code)]
pub const SAMPLE_SPEC: &str = r"
Name:           libfoo
Version:        2.1
Release:        1%{?dist}
Summary:        Foo library
License:        MIT
BuildRequires:  gcc, make
BuildRequires:  zlib-devel >= 1.2
ExcludeArch:    s390x ppc64le

%description
Foo library.

%package devel
Summary: Development files for libfoo

%description devel
Headers.
";
