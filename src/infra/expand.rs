//! Descriptor text acquisition
//!
//! Text providers for [`PackageDescriptor::load`] and a bounded worker pool
//! that loads a whole list of descriptors in parallel.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::config::defaults::EXPAND_COMMAND;
use crate::core::descriptor::{PackageDescriptor, TextProvider};
use crate::error::{DescriptorError, FilesystemError};
use crate::infra::filesystem;
use crate::infra::runner::{CommandRunner, Invocation, SystemRunner};

/// Expands spec macros by running `rpmspec -P`
#[derive(Debug, Clone)]
pub struct RpmspecProvider<R = SystemRunner> {
    command: String,
    runner: R,
}

impl RpmspecProvider<SystemRunner> {
    /// Provider running `command` on the host
    pub fn new(command: impl Into<String>) -> Self {
        Self::with_runner(command, SystemRunner)
    }
}

impl Default for RpmspecProvider<SystemRunner> {
    fn default() -> Self {
        Self::new(EXPAND_COMMAND)
    }
}

impl<R: CommandRunner> RpmspecProvider<R> {
    /// Provider using a custom runner
    pub fn with_runner(command: impl Into<String>, runner: R) -> Self {
        Self {
            command: command.into(),
            runner,
        }
    }
}

impl<R: CommandRunner> TextProvider for RpmspecProvider<R> {
    fn expand(&self, path: &Path) -> Result<String, DescriptorError> {
        ensure_readable(path)?;

        let invocation = Invocation::new(&self.command)
            .arg("-P")
            .arg(path);

        self.runner
            .output(&invocation)
            .map_err(|e| DescriptorError::ExpansionFailed {
                path: path.to_path_buf(),
                error: e.to_string(),
            })
    }
}

/// Reads descriptors verbatim, without macro expansion
#[derive(Debug, Default, Clone, Copy)]
pub struct RawFileProvider;

impl TextProvider for RawFileProvider {
    fn expand(&self, path: &Path) -> Result<String, DescriptorError> {
        filesystem::read_file(path).map_err(|e| {
            let error = match e {
                FilesystemError::ReadFile { error, .. } => error,
                other => other.to_string(),
            };
            DescriptorError::Unreadable {
                path: path.to_path_buf(),
                error,
            }
        })
    }
}

fn ensure_readable(path: &Path) -> Result<(), DescriptorError> {
    std::fs::File::open(path)
        .map(drop)
        .map_err(|e| DescriptorError::Unreadable {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
}

/// Result of loading one descriptor path
pub type Loaded = (PathBuf, Result<PackageDescriptor, DescriptorError>);

/// Load descriptors with at most `jobs` expansions in flight
///
/// Results come back in the order of `paths`.
pub async fn load_descriptors<P>(
    provider: Arc<P>,
    paths: Vec<PathBuf>,
    cwd: PathBuf,
    jobs: usize,
) -> Vec<Loaded>
where
    P: TextProvider + Send + Sync + 'static,
{
    let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
    let cwd = Arc::new(cwd);
    let mut handles = Vec::with_capacity(paths.len());

    for path in paths {
        let semaphore = Arc::clone(&semaphore);
        let provider = Arc::clone(&provider);
        let cwd = Arc::clone(&cwd);
        let task_path = path.clone();

        let handle = tokio::spawn(async move {
            // The semaphore is never closed, so this always yields a permit
            let _permit = semaphore.acquire_owned().await;
            tokio::task::spawn_blocking(move || {
                PackageDescriptor::load(provider.as_ref(), &task_path, &cwd)
            })
            .await
        });
        handles.push((path, handle));
    }

    let mut results = Vec::with_capacity(handles.len());
    for (path, handle) in handles {
        let loaded = match handle.await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) | Err(e) => Err(DescriptorError::ExpansionFailed {
                path: path.clone(),
                error: format!("worker failed: {e}"),
            }),
        };
        results.push((path, loaded));
    }

    results
}
