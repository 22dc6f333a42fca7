//! GitHub Actions workflow commands
//!
//! Log grouping and step outputs. Everything here is a no-op unless enabled
//! with [`set_enabled`], so the same code paths work outside of CI.

use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::defaults::GITHUB_OUTPUT_ENV;
use crate::error::FilesystemError;

static ENABLED: AtomicBool = AtomicBool::new(false);

/// Turn workflow commands on or off
pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

/// Whether workflow commands are emitted
pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Whether the process runs inside a GitHub Actions job
pub fn detected() -> bool {
    std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

/// Collapsible log group, closed when dropped
#[derive(Debug)]
#[must_use = "the group is closed as soon as the guard is dropped"]
pub struct Group {
    open: bool,
}

impl Group {
    /// Open a group titled `title`
    pub fn start(title: &str) -> Self {
        let open = is_enabled();
        if open {
            println!("::group::{title}");
        }
        Self { open }
    }
}

impl Drop for Group {
    fn drop(&mut self) {
        if self.open {
            println!("::endgroup::");
        }
    }
}

/// Format a `key=value` output line
///
/// Multi-line values use the heredoc form with a delimiter that cannot
/// appear in the value.
pub fn format_output(key: &str, value: &str) -> String {
    if !value.contains('\n') {
        return format!("{key}={value}\n");
    }
    let mut delimiter = String::from("RPMBATCH_EOF");
    while value.contains(&delimiter) {
        delimiter.push('_');
    }
    format!("{key}<<{delimiter}\n{value}\n{delimiter}\n")
}

/// Append a step output to the file named by `GITHUB_OUTPUT`
///
/// Does nothing when the variable is not set.
pub fn set_output(key: &str, value: &str) -> Result<(), FilesystemError> {
    match std::env::var_os(GITHUB_OUTPUT_ENV) {
        Some(path) => append_output(Path::new(&path), key, value),
        None => {
            tracing::debug!("{GITHUB_OUTPUT_ENV} not set, output {key}={value}");
            Ok(())
        }
    }
}

/// Append a step output to `path`
pub fn append_output(path: &Path, key: &str, value: &str) -> Result<(), FilesystemError> {
    let write_err = |e: std::io::Error| FilesystemError::WriteFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    };

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(write_err)?;
    file.write_all(format_output(key, value).as_bytes())
        .map_err(write_err)
}
