//! Package descriptor parsing
//!
//! Turns macro-expanded `.spec` text into a [`PackageDescriptor`]. Obtaining
//! the expanded text is delegated to a [`TextProvider`]; everything here is
//! pure apart from that call.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::core::directive::{self, DirectiveKey};
use crate::core::normalize;
use crate::error::DescriptorError;

/// Source of expanded descriptor text
pub trait TextProvider {
    /// Return the fully expanded text of the descriptor at `path`
    fn expand(&self, path: &Path) -> Result<String, DescriptorError>;
}

/// Facts extracted from one package descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageDescriptor {
    /// Package name, unique within a batch
    pub name: String,

    /// Path the descriptor was read from, handed back to the build tools
    pub source_path: PathBuf,

    /// Absolute `_topdir` for the build
    pub build_root: PathBuf,

    /// Normalized in-order build dependencies
    pub build_dependencies: Vec<String>,

    /// Architectures this package must not be built on
    pub exclude_arch: BTreeSet<String>,

    /// If non-empty, the only architectures this package may be built on
    pub exclusive_arch: BTreeSet<String>,

    /// Expanded descriptor text
    #[serde(skip)]
    pub expanded_text: String,
}

impl std::fmt::Display for PackageDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

impl PackageDescriptor {
    /// Parse expanded descriptor text
    ///
    /// `build_root` is taken as given; use [`derive_build_root`] to compute it
    /// from `source_path`.
    pub fn from_text(
        text: &str,
        source_path: &Path,
        build_root: PathBuf,
    ) -> Result<Self, DescriptorError> {
        let directives = directive::scan(text);

        let names: Vec<&str> = directive::values_of(&directives, DirectiveKey::Name).collect();
        let name = match names.as_slice() {
            [single] if !single.is_empty() => (*single).to_string(),
            _ => {
                return Err(DescriptorError::MissingOrAmbiguousName {
                    path: source_path.to_path_buf(),
                    count: names.len(),
                })
            }
        };

        let build_dependencies = normalize::normalize_dependencies(
            directive::values_of(&directives, DirectiveKey::BuildRequires)
                .flat_map(directive::split_list),
        );

        Ok(Self {
            name,
            source_path: source_path.to_path_buf(),
            build_root,
            build_dependencies,
            exclude_arch: arch_set(&directives, DirectiveKey::ExcludeArch),
            exclusive_arch: arch_set(&directives, DirectiveKey::ExclusiveArch),
            expanded_text: text.to_string(),
        })
    }

    /// Read and parse the descriptor at `path` through `provider`
    ///
    /// `cwd` anchors relative paths when deriving the build root.
    pub fn load<P: TextProvider + ?Sized>(
        provider: &P,
        path: &Path,
        cwd: &Path,
    ) -> Result<Self, DescriptorError> {
        let text = provider.expand(path)?;
        Self::from_text(&text, path, derive_build_root(path, cwd))
    }
}

fn arch_set(directives: &[directive::Directive], key: DirectiveKey) -> BTreeSet<String> {
    directive::values_of(directives, key)
        .flat_map(directive::split_list)
        .map(str::to_string)
        .collect()
}

/// Build root for a descriptor: the parent of its parent directory
///
/// Descriptors are expected to live in `<topdir>/SPECS/`. Relative results
/// are joined onto `cwd`.
pub fn derive_build_root(source_path: &Path, cwd: &Path) -> PathBuf {
    let parent_of = |p: &Path| -> PathBuf {
        match p.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            Some(_) => PathBuf::from("."),
            None if p.has_root() => p.to_path_buf(),
            None => PathBuf::from("."),
        }
    };

    let root = parent_of(&parent_of(source_path));
    let absolute = if root.is_absolute() {
        root
    } else {
        cwd.join(root)
    };
    clean_path(&absolute)
}

/// Lexically normalize a path, dropping `.` and resolving `..` where possible
fn clean_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !result.pop() {
                    result.push("..");
                }
            }
            other => result.push(other.as_os_str()),
        }
    }
    if result.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        result
    }
}
