//! Core business logic module
//!
//! This module contains the batch planning logic for rpmbatch.
//! It has NO process or filesystem access - those belong in [`crate::infra`].
//!
//! # Submodules
//!
//! - [`directive`] - Spec directive scanning
//! - [`normalize`] - Dependency token normalization
//! - [`descriptor`] - Package descriptors built from expanded spec text
//! - [`arch`] - Architecture translation and eligibility
//! - [`batch`] - Batch assembly and skip reporting
//! - [`queue`] - Dependency-ordered build queue
//! - [`builder`] - Build orchestration logic
//! - [`input`] - Comma and newline separated input lists
//! - [`global_config`] - Global configuration management
//! - [`doctor`] - Tooling checks

pub mod arch;
pub mod batch;
pub mod builder;
pub mod descriptor;
pub mod directive;
pub mod doctor;
pub mod global_config;
pub mod input;
pub mod normalize;
pub mod queue;
