//! Global configuration management
//!
//! Reads settings from `config.toml` in the config directory. Command-line
//! flags take precedence over everything configured here.

use crate::config::defaults;
use crate::core::arch::ArchTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Global configuration error types
#[derive(Error, Debug)]
pub enum GlobalConfigError {
    /// Failed to read config file
    #[error("Failed to read config file '{path}': {error}")]
    ReadError { path: String, error: String },

    /// Failed to parse config file
    #[error("Failed to parse config file '{path}': {error}")]
    ParseError { path: String, error: String },
}

/// Global configuration for rpmbatch
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GlobalConfig {
    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Host architecture settings
    #[serde(default)]
    pub arch: ArchConfig,

    /// Local repository settings
    #[serde(default)]
    pub repo: RepoConfig,

    /// Descriptor expansion settings
    #[serde(default)]
    pub expand: ExpandConfig,
}

/// Build settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BuildConfig {
    /// Parallel descriptor expansion workers
    pub jobs: Option<usize>,

    /// Continue with the rest of the queue after a failed package
    pub keep_going: Option<bool>,

    /// Skip `%check` sections
    pub nocheck: Option<bool>,

    /// Packages installed before the batch is built
    #[serde(default)]
    pub extra_packages: Vec<String>,
}

/// Architecture settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArchConfig {
    /// Force the host RPM architecture
    pub host: Option<String>,

    /// Extra host identifier -> RPM architecture mappings
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

/// Local repository settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RepoConfig {
    /// Publish built packages through a local yum repository
    pub enabled: Option<bool>,

    /// Where the repository definition is written
    pub config_path: Option<PathBuf>,
}

/// Descriptor expansion settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExpandConfig {
    /// Command used to expand spec macros
    pub command: Option<String>,
}

impl GlobalConfig {
    /// Load global configuration from `path`
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns `GlobalConfigError::ParseError` if the config file exists but
    /// contains invalid TOML.
    pub fn load_from_path(path: &Path) -> Result<Self, GlobalConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| GlobalConfigError::ReadError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| GlobalConfigError::ParseError {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }

    /// Effective number of expansion workers
    #[must_use]
    pub fn jobs(&self) -> usize {
        self.build.jobs.filter(|j| *j > 0).unwrap_or_else(num_cpus::get)
    }

    /// Whether to continue after a failed package
    #[must_use]
    pub fn keep_going(&self) -> bool {
        self.build.keep_going.unwrap_or(false)
    }

    /// Whether `%check` is skipped
    #[must_use]
    pub fn nocheck(&self) -> bool {
        self.build.nocheck.unwrap_or(true)
    }

    /// Whether the local repository is maintained
    #[must_use]
    pub fn repo_enabled(&self) -> bool {
        self.repo.enabled.unwrap_or(true)
    }

    /// Path of the local repository definition
    #[must_use]
    pub fn repo_config_path(&self) -> PathBuf {
        self.repo
            .config_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(defaults::LOCAL_REPO_CONFIG))
    }

    /// Macro expansion command
    #[must_use]
    pub fn expand_command(&self) -> &str {
        self.expand
            .command
            .as_deref()
            .unwrap_or(defaults::EXPAND_COMMAND)
    }

    /// Architecture translation table with configured aliases applied
    #[must_use]
    pub fn arch_table(&self) -> ArchTable {
        self.arch
            .aliases
            .iter()
            .fold(ArchTable::new(), |table, (host, rpm)| {
                table.with_alias(host.clone(), rpm.clone())
            })
    }

    /// Host RPM architecture: the configured override or the translated machine arch
    #[must_use]
    pub fn host_arch(&self) -> String {
        let table = self.arch_table();
        match &self.arch.host {
            Some(host) => table.translate(host),
            None => table.host(),
        }
    }
}
