//! Rpmbatch - build a batch of interdependent RPM packages
//!
//! This library reads a set of RPM spec files, decides which of them can be
//! built on the host architecture, orders them so that every package comes
//! after the packages of the batch it build-requires, and drives the RPM
//! tooling over that order.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Business logic (no I/O operations)
//! - [`infra`] - Infrastructure layer (filesystem, processes, CI outputs)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
