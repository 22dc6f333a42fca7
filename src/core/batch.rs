//! Batch assembly
//!
//! Collects parsed descriptors into a [`Batch`] keyed by package name,
//! dropping anything that failed to parse or cannot be built on the host
//! architecture. Every drop is recorded with its reason.

use std::collections::btree_map::{self, BTreeMap};
use std::path::{Path, PathBuf};

use crate::core::arch;
use crate::core::descriptor::PackageDescriptor;
use crate::error::{ArchError, BatchError, DescriptorError};

/// Package descriptors considered together for one build, keyed by name
#[derive(Debug, Clone, Default)]
pub struct Batch {
    packages: BTreeMap<String, PackageDescriptor>,
}

impl Batch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a descriptor, returning the one it replaced if the name was taken
    pub fn insert(&mut self, descriptor: PackageDescriptor) -> Option<PackageDescriptor> {
        self.packages.insert(descriptor.name.clone(), descriptor)
    }

    /// Look up a descriptor by exact name
    pub fn get(&self, name: &str) -> Option<&PackageDescriptor> {
        self.packages.get(name)
    }

    /// Whether `name` is a package of this batch
    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    /// Package names in lexicographic order
    pub fn sorted_names(&self) -> Vec<String> {
        self.packages.keys().cloned().collect()
    }

    /// Number of packages
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether the batch has no packages
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Iterate over descriptors in name order
    pub fn iter(&self) -> btree_map::Values<'_, String, PackageDescriptor> {
        self.packages.values()
    }
}

impl FromIterator<PackageDescriptor> for Batch {
    fn from_iter<I: IntoIterator<Item = PackageDescriptor>>(iter: I) -> Self {
        let mut batch = Self::new();
        for descriptor in iter {
            batch.insert(descriptor);
        }
        batch
    }
}

/// Why a descriptor was left out of the batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Reading, expanding or parsing failed
    Descriptor(DescriptorError),
    /// Not buildable on the host architecture
    Architecture(ArchError),
}

impl SkipReason {
    /// Short machine-readable category
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Descriptor(_) => "descriptor",
            Self::Architecture(_) => "architecture",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Descriptor(e) => write!(f, "{e}"),
            Self::Architecture(e) => write!(f, "{e}"),
        }
    }
}

/// A descriptor path that did not make it into the batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    /// Descriptor path as supplied
    pub path: PathBuf,
    /// Package name, when parsing got that far
    pub name: Option<String>,
    /// Reason for the skip
    pub reason: SkipReason,
}

/// Outcome of batch assembly
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Eligible packages
    pub batch: Batch,
    /// Everything that was dropped, in input order
    pub skipped: Vec<Skipped>,
}

impl BatchReport {
    /// Fail with [`BatchError::NothingToBuild`] if no package survived
    pub fn ensure_not_empty(&self) -> Result<(), BatchError> {
        if self.batch.is_empty() {
            return Err(BatchError::NothingToBuild {
                skipped: self.skipped.len(),
            });
        }
        Ok(())
    }
}

/// Incrementally assembles a [`BatchReport`]
#[derive(Debug)]
pub struct BatchBuilder {
    host_arch: String,
    report: BatchReport,
}

impl BatchBuilder {
    /// Create a builder filtering for `host_arch` (an RPM arch token)
    pub fn new(host_arch: impl Into<String>) -> Self {
        Self {
            host_arch: host_arch.into(),
            report: BatchReport::default(),
        }
    }

    /// Record the parse outcome for one descriptor path
    pub fn add(&mut self, path: &Path, parsed: Result<PackageDescriptor, DescriptorError>) {
        let descriptor = match parsed {
            Ok(descriptor) => descriptor,
            Err(e) => {
                tracing::warn!("Skipping \"{}\": {e}", path.display());
                self.report.skipped.push(Skipped {
                    path: path.to_path_buf(),
                    name: None,
                    reason: SkipReason::Descriptor(e),
                });
                return;
            }
        };

        if let Err(e) = arch::check_eligible(&descriptor, &self.host_arch) {
            tracing::warn!("Skipping \"{}\": {e}", path.display());
            self.report.skipped.push(Skipped {
                path: path.to_path_buf(),
                name: Some(descriptor.name),
                reason: SkipReason::Architecture(e),
            });
            return;
        }

        if let Some(previous) = self.report.batch.insert(descriptor) {
            tracing::warn!(
                "Package \"{}\" from \"{}\" replaced by \"{}\"",
                previous.name,
                previous.source_path.display(),
                path.display()
            );
        }
    }

    /// Finish assembly
    pub fn finish(self) -> BatchReport {
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(text: &str, path: &str) -> Result<PackageDescriptor, DescriptorError> {
        PackageDescriptor::from_text(text, Path::new(path), PathBuf::from("/w"))
    }

    #[test]
    fn test_builder_keeps_eligible_packages() {
        let mut builder = BatchBuilder::new("x86_64");
        builder.add(Path::new("a.spec"), parsed("Name: a\n", "a.spec"));
        builder.add(Path::new("b.spec"), parsed("Name: b\n", "b.spec"));
        let report = builder.finish();

        assert_eq!(report.batch.sorted_names(), vec!["a", "b"]);
        assert!(report.skipped.is_empty());
        assert!(report.ensure_not_empty().is_ok());
    }

    #[test]
    fn test_builder_records_parse_failures() {
        let mut builder = BatchBuilder::new("x86_64");
        builder.add(Path::new("bad.spec"), parsed("Name: a\nName: b\n", "bad.spec"));
        let report = builder.finish();

        assert!(report.batch.is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].reason.kind(), "descriptor");
        assert!(matches!(
            report.ensure_not_empty(),
            Err(BatchError::NothingToBuild { skipped: 1 })
        ));
    }

    #[test]
    fn test_builder_records_arch_skips() {
        let mut builder = BatchBuilder::new("x86_64");
        builder.add(
            Path::new("x.spec"),
            parsed("Name: x\nExcludeArch: x86_64\n", "x.spec"),
        );
        let report = builder.finish();

        assert!(!report.batch.contains("x"));
        assert_eq!(report.skipped[0].name.as_deref(), Some("x"));
        assert_eq!(report.skipped[0].reason.kind(), "architecture");
    }

    #[test]
    fn test_same_descriptor_on_other_arch_is_kept() {
        let mut builder = BatchBuilder::new("aarch64");
        builder.add(
            Path::new("x.spec"),
            parsed("Name: x\nExcludeArch: x86_64\n", "x.spec"),
        );
        assert!(builder.finish().batch.contains("x"));
    }

    #[test]
    fn test_last_writer_wins() {
        let mut builder = BatchBuilder::new("x86_64");
        builder.add(Path::new("one/a.spec"), parsed("Name: a\n", "one/a.spec"));
        builder.add(Path::new("two/a.spec"), parsed("Name: a\n", "two/a.spec"));
        let report = builder.finish();

        assert_eq!(report.batch.len(), 1);
        assert_eq!(
            report.batch.get("a").unwrap().source_path,
            PathBuf::from("two/a.spec")
        );
    }

    #[test]
    fn test_empty_input_is_nothing_to_build() {
        let report = BatchBuilder::new("x86_64").finish();
        assert!(report.ensure_not_empty().is_err());
    }
}
