//! Build queue resolution
//!
//! Computes the order in which a batch's packages are built so that every
//! in-batch build dependency comes before the packages requiring it.
//! Dependencies outside the batch are assumed to be installed already and
//! are ignored.

use std::collections::HashSet;

use crate::core::batch::Batch;
use crate::core::descriptor::PackageDescriptor;

/// A dependency edge that was dropped because it closes a cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleEdge {
    /// Package declaring the dependency
    pub package: String,
    /// Dependency that was still being expanded
    pub dependency: String,
}

/// Ordered packages ready for the build driver
#[derive(Debug, Clone, Default)]
pub struct BuildQueue<'a> {
    entries: Vec<&'a PackageDescriptor>,
    cycle_edges: Vec<CycleEdge>,
}

impl<'a> BuildQueue<'a> {
    /// Descriptors in build order
    pub fn entries(&self) -> &[&'a PackageDescriptor] {
        &self.entries
    }

    /// Package names in build order
    pub fn names(&self) -> Vec<&'a str> {
        self.entries.iter().map(|d| d.name.as_str()).collect()
    }

    /// Edges ignored because they pointed back into the current expansion
    pub fn cycle_edges(&self) -> &[CycleEdge] {
        &self.cycle_edges
    }

    /// Number of queued packages
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for BuildQueue<'a> {
    type Item = &'a PackageDescriptor;
    type IntoIter = std::vec::IntoIter<&'a PackageDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Compute the build queue for `batch`, visiting roots in `order`
///
/// `order` fixes the position of packages with no dependency relationship;
/// pass [`Batch::sorted_names`] for a reproducible queue. Names absent from
/// the batch are ignored.
pub fn build_queue<'a>(batch: &'a Batch, order: &[String]) -> BuildQueue<'a> {
    let mut ctx = QueueContext::new(batch);
    let entries = ctx.expand(order);

    BuildQueue {
        entries,
        cycle_edges: ctx.cycle_edges,
    }
}

/// Traversal state for a single [`build_queue`] call
struct QueueContext<'a> {
    batch: &'a Batch,
    /// Names already placed in the queue
    processed: HashSet<String>,
    /// Names on the current expansion path
    expanding: HashSet<String>,
    cycle_edges: Vec<CycleEdge>,
}

impl<'a> QueueContext<'a> {
    fn new(batch: &'a Batch) -> Self {
        Self {
            batch,
            processed: HashSet::new(),
            expanding: HashSet::new(),
            cycle_edges: Vec::new(),
        }
    }

    fn expand(&mut self, names: &[String]) -> Vec<&'a PackageDescriptor> {
        let mut result = Vec::new();

        for name in names {
            if self.processed.contains(name) {
                tracing::debug!("Skipping package \"{name}\", already processed");
                continue;
            }

            let Some(descriptor) = self.batch.get(name) else {
                continue;
            };

            tracing::debug!(
                "Package \"{name}\" build dependencies: {}",
                descriptor.build_dependencies.join(", ")
            );

            self.expanding.insert(name.clone());
            let pending = self.pending_dependencies(descriptor);

            for dep in self.expand(&pending) {
                tracing::debug!(
                    "Build dependency \"{}\" will be built before \"{name}\"",
                    dep.name
                );
                self.processed.insert(dep.name.clone());
                result.push(dep);
            }

            tracing::debug!("Adding package \"{name}\" to the queue");
            self.expanding.remove(name);
            self.processed.insert(name.clone());
            result.push(descriptor);
        }

        result
    }

    /// In-batch dependencies of `descriptor` that still need scheduling
    fn pending_dependencies(&mut self, descriptor: &PackageDescriptor) -> Vec<String> {
        let mut pending = Vec::new();

        for dep in &descriptor.build_dependencies {
            if !self.batch.contains(dep) {
                continue;
            }
            if self.processed.contains(dep) {
                tracing::debug!("Skipping build dependency \"{dep}\", already processed");
                continue;
            }
            if self.expanding.contains(dep) {
                if *dep != descriptor.name {
                    tracing::warn!(
                        "Ignoring cyclic build dependency \"{}\" -> \"{dep}\"",
                        descriptor.name
                    );
                    self.cycle_edges.push(CycleEdge {
                        package: descriptor.name.clone(),
                        dependency: dep.clone(),
                    });
                }
                continue;
            }
            pending.push(dep.clone());
        }

        pending
    }
}
