#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`command`]: Local process execution (`CommandCase`)
//! - [`dir_compare`]: Directory tree comparison (`DirCompareCase`, `TreeDiff`)

pub mod command;
pub mod dir_compare;

// --- Public API Re-exports ---

pub use command::CommandCase;
pub use dir_compare::{DirCompareCase, TreeDiff};

use caseflow_core::{CaseflowError, TestCaseRegistry};

/// Registers every built-in scenario kind.
///
/// Fails if one of the kinds is already present in `registry`.
pub fn register_builtin(registry: &mut TestCaseRegistry) -> Result<(), CaseflowError> {
    registry.register(
        command::KIND,
        "Run a local command and check its exit code and output",
        CommandCase::factory,
    )?;
    registry.register(
        dir_compare::KIND,
        "Compare two directory trees by content hash",
        DirCompareCase::factory,
    )?;
    tracing::debug!(count = registry.count(), "built-in scenarios registered");
    Ok(())
}
