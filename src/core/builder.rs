//! Build orchestration logic
//!
//! Walks a [`BuildQueue`] and hands each package to a [`BuildDriver`],
//! applying the failure policy and collecting a [`BuildSummary`].

use std::path::PathBuf;

use crate::core::descriptor::PackageDescriptor;
use crate::core::queue::BuildQueue;
use crate::error::DriverError;

/// Performs the actual work of building one package
pub trait BuildDriver {
    /// Called once before the first package
    fn prepare(&mut self) -> Result<(), DriverError> {
        Ok(())
    }

    /// Install dependencies, fetch sources and build `descriptor`
    fn build(&mut self, descriptor: &PackageDescriptor) -> Result<(), DriverError>;
}

/// What to do after a package fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failure
    #[default]
    FailFast,
    /// Build the rest of the queue and report all failures at the end
    KeepGoing,
}

/// Progress notifications emitted while the queue is processed
#[derive(Debug)]
pub enum BuildEvent<'a> {
    /// A package is about to be built
    Started {
        descriptor: &'a PackageDescriptor,
        index: usize,
        total: usize,
    },
    /// A package built successfully
    Succeeded { descriptor: &'a PackageDescriptor },
    /// A package failed
    Failed {
        descriptor: &'a PackageDescriptor,
        error: &'a DriverError,
    },
}

/// A package whose build failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedBuild {
    /// Package name
    pub name: String,
    /// Spec path
    pub source_path: PathBuf,
    /// Error text
    pub error: String,
}

/// Outcome of processing a build queue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Spec paths of successfully built packages, in build order
    pub succeeded: Vec<PathBuf>,
    /// Failed packages
    pub failed: Vec<FailedBuild>,
    /// Packages never attempted because the run stopped early
    pub not_attempted: Vec<String>,
    /// Set when preparation failed and nothing was built
    pub prepare_error: Option<String>,
}

impl BuildSummary {
    /// Whether every queued package was built
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.not_attempted.is_empty() && self.prepare_error.is_none()
    }
}

/// Build orchestrator state
#[derive(Debug, Default)]
pub struct BuildOrchestrator {
    policy: FailurePolicy,
}

impl BuildOrchestrator {
    /// Create a new build orchestrator
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the failure policy
    #[must_use]
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build every package of `queue` in order
    pub fn run<D, F>(&self, queue: &BuildQueue<'_>, driver: &mut D, mut on_event: F) -> BuildSummary
    where
        D: BuildDriver + ?Sized,
        F: FnMut(BuildEvent<'_>),
    {
        let mut summary = BuildSummary::default();
        let entries = queue.entries();

        if let Err(e) = driver.prepare() {
            tracing::error!("Preparing the build environment failed: {e}");
            summary.prepare_error = Some(e.to_string());
            summary.not_attempted = entries.iter().map(|d| d.name.clone()).collect();
            return summary;
        }

        for (index, descriptor) in entries.iter().copied().enumerate() {
            tracing::debug!(
                "Building package \"{}\" using spec file \"{}\"",
                descriptor.name,
                descriptor.source_path.display()
            );
            on_event(BuildEvent::Started {
                descriptor,
                index,
                total: entries.len(),
            });

            match driver.build(descriptor) {
                Ok(()) => {
                    summary.succeeded.push(descriptor.source_path.clone());
                    on_event(BuildEvent::Succeeded { descriptor });
                }
                Err(error) => {
                    tracing::error!("Package \"{}\" failed: {error}", descriptor.name);
                    on_event(BuildEvent::Failed {
                        descriptor,
                        error: &error,
                    });
                    summary.failed.push(FailedBuild {
                        name: descriptor.name.clone(),
                        source_path: descriptor.source_path.clone(),
                        error: error.to_string(),
                    });

                    if self.policy == FailurePolicy::FailFast {
                        summary.not_attempted = entries[index + 1..]
                            .iter()
                            .map(|d| d.name.clone())
                            .collect();
                        break;
                    }
                }
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::batch::Batch;
    use crate::core::queue::build_queue;
    use crate::test_utils::descriptor;

    #[derive(Default)]
    struct ScriptedDriver {
        fail: Vec<&'static str>,
        fail_prepare: bool,
        built: Vec<String>,
    }

    impl BuildDriver for ScriptedDriver {
        fn prepare(&mut self) -> Result<(), DriverError> {
            if self.fail_prepare {
                return Err(DriverError::ToolNotFound {
                    tool: "createrepo".to_string(),
                });
            }
            Ok(())
        }

        fn build(&mut self, descriptor: &PackageDescriptor) -> Result<(), DriverError> {
            self.built.push(descriptor.name.clone());
            if self.fail.iter().any(|f| *f == descriptor.name) {
                return Err(DriverError::CommandFailed {
                    command: format!("rpmbuild -ba {}.spec", descriptor.name),
                    status: "exit status: 1".to_string(),
                });
            }
            Ok(())
        }
    }

    fn chain() -> Batch {
        [
            descriptor("app", &["lib"]),
            descriptor("lib", &["base"]),
            descriptor("base", &[]),
            descriptor("tool", &[]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_builds_in_queue_order() {
        let batch = chain();
        let queue = build_queue(&batch, &batch.sorted_names());
        let mut driver = ScriptedDriver::default();
        let mut started = Vec::new();

        let summary = BuildOrchestrator::new().run(&queue, &mut driver, |event| {
            if let BuildEvent::Started { descriptor, .. } = event {
                started.push(descriptor.name.clone());
            }
        });

        assert!(summary.is_success());
        assert_eq!(driver.built, vec!["base", "lib", "app", "tool"]);
        assert_eq!(started, driver.built);
        assert_eq!(summary.succeeded[0], PathBuf::from("/work/SPECS/base.spec"));
    }

    #[test]
    fn test_fail_fast_stops() {
        let batch = chain();
        let queue = build_queue(&batch, &batch.sorted_names());
        let mut driver = ScriptedDriver {
            fail: vec!["lib"],
            ..ScriptedDriver::default()
        };

        let summary = BuildOrchestrator::new().run(&queue, &mut driver, |_| {});

        assert!(!summary.is_success());
        assert_eq!(driver.built, vec!["base", "lib"]);
        assert_eq!(summary.failed[0].name, "lib");
        assert_eq!(summary.not_attempted, vec!["app", "tool"]);
    }

    #[test]
    fn test_keep_going_continues() {
        let batch = chain();
        let queue = build_queue(&batch, &batch.sorted_names());
        let mut driver = ScriptedDriver {
            fail: vec!["lib"],
            ..ScriptedDriver::default()
        };

        let summary = BuildOrchestrator::new()
            .with_policy(FailurePolicy::KeepGoing)
            .run(&queue, &mut driver, |_| {});

        assert_eq!(driver.built.len(), 4);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.succeeded.len(), 3);
        assert!(summary.not_attempted.is_empty());
    }

    #[test]
    fn test_prepare_failure_builds_nothing() {
        let batch = chain();
        let queue = build_queue(&batch, &batch.sorted_names());
        let mut driver = ScriptedDriver {
            fail_prepare: true,
            ..ScriptedDriver::default()
        };

        let summary = BuildOrchestrator::new().run(&queue, &mut driver, |_| {});

        assert!(driver.built.is_empty());
        assert!(summary.prepare_error.is_some());
        assert_eq!(summary.not_attempted.len(), 4);
    }
}
