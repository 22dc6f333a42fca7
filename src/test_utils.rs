//! Test utilities for property-based testing
//!
//! This module provides generators and helpers for proptest.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::core::descriptor::PackageDescriptor;

/// Build a descriptor directly from a name and its (already normalized) dependencies
pub fn descriptor(name: &str, deps: &[&str]) -> PackageDescriptor {
    PackageDescriptor {
        name: name.to_string(),
        source_path: PathBuf::from(format!("/work/SPECS/{name}.spec")),
        build_root: PathBuf::from("/work"),
        build_dependencies: deps.iter().map(|d| (*d).to_string()).collect(),
        exclude_arch: BTreeSet::new(),
        exclusive_arch: BTreeSet::new(),
        expanded_text: format!("Name: {name}\n"),
    }
}

pub mod generators {
    use proptest::prelude::*;
    use proptest::sample::Index;

    /// A package graph as (name, dependency names) pairs
    pub type Graph = Vec<(String, Vec<String>)>;

    /// Generate a valid RPM package name
    pub fn package_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_+-]{0,20}[a-z0-9]?"
    }

    /// Generate an architecture token
    pub fn arch() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("x86_64".to_string()),
            Just("aarch64".to_string()),
            Just("i686".to_string()),
            Just("ppc64le".to_string()),
            Just("s390x".to_string()),
        ]
    }

    /// Generate a graph without cycles, in shuffled order
    ///
    /// Package `pkgN` only depends on packages with a lower index, plus an
    /// occasional dependency that is not part of the graph.
    pub fn acyclic_graph(max: usize) -> impl Strategy<Value = Graph> {
        (1..=max)
            .prop_flat_map(|n| {
                (
                    proptest::collection::vec(proptest::collection::vec(any::<Index>(), 0..4), n),
                    proptest::collection::vec(any::<bool>(), n),
                )
            })
            .prop_map(|(choices, externals)| {
                choices
                    .into_iter()
                    .zip(externals)
                    .enumerate()
                    .map(|(i, (picks, external))| {
                        let mut deps: Vec<String> = if i == 0 {
                            Vec::new()
                        } else {
                            picks.iter().map(|p| format!("pkg{}", p.index(i))).collect()
                        };
                        deps.sort();
                        deps.dedup();
                        if external {
                            deps.push(format!("external{i}"));
                        }
                        (format!("pkg{i}"), deps)
                    })
                    .collect::<Graph>()
            })
            .prop_shuffle()
    }

    /// Generate an arbitrary graph, cycles and self-references included
    pub fn any_graph(max: usize) -> impl Strategy<Value = Graph> {
        (1..=max)
            .prop_flat_map(|n| {
                proptest::collection::vec(proptest::collection::vec(any::<Index>(), 0..4), n)
            })
            .prop_map(|choices| {
                let n = choices.len();
                choices
                    .into_iter()
                    .enumerate()
                    .map(|(i, picks)| {
                        let mut deps: Vec<String> =
                            picks.iter().map(|p| format!("pkg{}", p.index(n))).collect();
                        deps.sort();
                        deps.dedup();
                        (format!("pkg{i}"), deps)
                    })
                    .collect::<Graph>()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_package_name_generator(name in package_name()) {
            prop_assert!(!name.is_empty());
            prop_assert!(name.chars().next().is_some_and(|c| c.is_ascii_lowercase()));
        }

        #[test]
        fn test_acyclic_graph_only_points_down(graph in acyclic_graph(8)) {
            for (name, deps) in &graph {
                let own: usize = name.trim_start_matches("pkg").parse().unwrap();
                for dep in deps.iter().filter(|d| d.starts_with("pkg")) {
                    let idx: usize = dep.trim_start_matches("pkg").parse().unwrap();
                    prop_assert!(idx < own);
                }
            }
        }
    }
}
