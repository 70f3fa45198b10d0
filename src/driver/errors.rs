//! Runtime error types for the driver
//!
//! This module defines [`RuntimeError`], which represents every error that can
//! occur while the walk executes or while its history is replayed.
//!
//! All runtime errors are fatal to a run: execution stops at the failing step.

use crate::memory::heap::HeapError;
use crate::memory::value::Address;
use thiserror::Error;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// A heap operation failed
    #[error("memory error at step {step}: {source}")]
    Memory {
        step: usize,
        #[source]
        source: HeapError,
    },

    /// Read of memory that was never written (strict mode only)
    #[error("read of uninitialized int at 0x{address:x} at step {step}")]
    UninitializedRead { address: Address, step: usize },

    /// A local that should hold a pointer does not
    #[error("'{name}' does not hold a pointer at step {step}")]
    NotAPointer { name: &'static str, step: usize },

    /// Snapshot history limit exceeded
    #[error("snapshot memory limit exceeded: {current} bytes used, limit is {limit}")]
    SnapshotLimitExceeded { current: usize, limit: usize },

    /// History/snapshot operation failed
    #[error("history operation failed: {0}")]
    HistoryOperationFailed(String),
}

impl RuntimeError {
    /// Index of the step that failed, if the error came from executing one
    pub fn step(&self) -> Option<usize> {
        match self {
            RuntimeError::Memory { step, .. } => Some(*step),
            RuntimeError::UninitializedRead { step, .. } => Some(*step),
            RuntimeError::NotAPointer { step, .. } => Some(*step),
            RuntimeError::SnapshotLimitExceeded { .. } => None,
            RuntimeError::HistoryOperationFailed(_) => None,
        }
    }
}
