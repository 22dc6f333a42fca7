//! Infrastructure layer
//!
//! Handles all I/O operations: filesystem, external processes and the CI
//! runner protocol. This module is the only place where side effects occur.

pub mod actions;
pub mod dirs;
pub mod driver;
pub mod expand;
pub mod filesystem;
pub mod runner;
