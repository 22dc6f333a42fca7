//! Architecture eligibility
//!
//! Maps host machine identifiers to RPM architecture tokens and checks
//! descriptors against their `ExcludeArch`/`ExclusiveArch` constraints.

use std::collections::HashMap;

use crate::core::descriptor::PackageDescriptor;
use crate::error::ArchError;

/// Built-in host identifier -> RPM architecture mappings
const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("amd64", "x86_64"),
    ("x86_64", "x86_64"),
    ("arm64", "aarch64"),
    ("aarch64", "aarch64"),
    ("x86", "i686"),
    ("i386", "i686"),
    ("i686", "i686"),
    ("powerpc64le", "ppc64le"),
];

/// Translation table from host machine identifiers to RPM arch tokens
#[derive(Debug, Clone)]
pub struct ArchTable {
    aliases: HashMap<String, String>,
}

impl Default for ArchTable {
    fn default() -> Self {
        Self {
            aliases: DEFAULT_ALIASES
                .iter()
                .map(|(host, rpm)| ((*host).to_string(), (*rpm).to_string()))
                .collect(),
        }
    }
}

impl ArchTable {
    /// Create a table with the built-in mappings
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a mapping
    #[must_use]
    pub fn with_alias(mut self, host: impl Into<String>, rpm: impl Into<String>) -> Self {
        self.aliases.insert(host.into(), rpm.into());
        self
    }

    /// Translate a host identifier; unknown identifiers pass through unchanged
    pub fn translate(&self, host: &str) -> String {
        self.aliases
            .get(host)
            .cloned()
            .unwrap_or_else(|| host.to_string())
    }

    /// RPM architecture of the machine this binary runs on
    pub fn host(&self) -> String {
        self.translate(std::env::consts::ARCH)
    }
}

/// Check whether `descriptor` may be built on `host_arch`
///
/// Exclusion wins over inclusion: an arch listed in both sets is rejected.
pub fn check_eligible(descriptor: &PackageDescriptor, host_arch: &str) -> Result<(), ArchError> {
    if descriptor.exclude_arch.contains(host_arch) {
        return Err(ArchError::Excluded {
            arch: host_arch.to_string(),
            list: descriptor.exclude_arch.iter().cloned().collect(),
        });
    }

    if !descriptor.exclusive_arch.is_empty() && !descriptor.exclusive_arch.contains(host_arch) {
        return Err(ArchError::NotInExclusiveList {
            arch: host_arch.to_string(),
            list: descriptor.exclusive_arch.iter().cloned().collect(),
        });
    }

    Ok(())
}

/// Boolean form of [`check_eligible`]
pub fn is_eligible(descriptor: &PackageDescriptor, host_arch: &str) -> bool {
    check_eligible(descriptor, host_arch).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::generators;
    use proptest::prelude::*;
    use std::path::{Path, PathBuf};

    fn descriptor(text: &str) -> PackageDescriptor {
        PackageDescriptor::from_text(text, Path::new("SPECS/p.spec"), PathBuf::from("/w")).unwrap()
    }

    #[test]
    fn test_translate_known_aliases() {
        let table = ArchTable::new();
        assert_eq!(table.translate("amd64"), "x86_64");
        assert_eq!(table.translate("arm64"), "aarch64");
        assert_eq!(table.translate("x86_64"), "x86_64");
    }

    #[test]
    fn test_translate_unknown_passes_through() {
        assert_eq!(ArchTable::new().translate("riscv64"), "riscv64");
    }

    #[test]
    fn test_custom_alias_overrides_default() {
        let table = ArchTable::new().with_alias("x86", "i586");
        assert_eq!(table.translate("x86"), "i586");
    }

    #[test]
    fn test_exclude_arch() {
        let desc = descriptor("Name: p\nExcludeArch: x86_64\n");
        assert!(matches!(
            check_eligible(&desc, "x86_64"),
            Err(ArchError::Excluded { .. })
        ));
        assert!(is_eligible(&desc, "aarch64"));
    }

    #[test]
    fn test_exclusive_arch() {
        let desc = descriptor("Name: p\nExclusiveArch: aarch64\n");
        assert!(is_eligible(&desc, "aarch64"));
        assert!(matches!(
            check_eligible(&desc, "x86_64"),
            Err(ArchError::NotInExclusiveList { .. })
        ));
    }

    #[test]
    fn test_exclude_takes_precedence() {
        let desc = descriptor("Name: p\nExcludeArch: x86_64\nExclusiveArch: x86_64\n");
        assert!(matches!(
            check_eligible(&desc, "x86_64"),
            Err(ArchError::Excluded { .. })
        ));
    }

    #[test]
    fn test_unconstrained_is_eligible_everywhere() {
        let desc = descriptor("Name: p\n");
        assert!(is_eligible(&desc, "x86_64"));
        assert!(is_eligible(&desc, "s390x"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_excluded_host_is_never_eligible(
            host in generators::arch(),
            other in generators::arch(),
        ) {
            let desc = descriptor(&format!(
                "Name: p\nExcludeArch: {host}\nExclusiveArch: {host} {other}\n"
            ));
            let excluded = matches!(check_eligible(&desc, &host), Err(ArchError::Excluded { .. }));
            prop_assert!(excluded);
        }

        #[test]
        fn test_exclusive_list_decides_eligibility(
            host in generators::arch(),
            only in generators::arch(),
        ) {
            let desc = descriptor(&format!("Name: p\nExclusiveArch: {only}\n"));
            prop_assert_eq!(is_eligible(&desc, &host), host == only);
        }
    }
}
