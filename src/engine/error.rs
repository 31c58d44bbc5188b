//! Errors raised by engine operations
//!
//! Lookup misses are never errors: they come back as `None` or an empty
//! collection.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("Vertex not found: {0}")]
    UnknownVertex(String),

    #[error("Task {task} depends on unknown task {dependency}")]
    UnknownDependency { task: String, dependency: String },

    #[error("Invalid task {task}: {reason}")]
    InvalidTask { task: String, reason: String },

    #[error("Dependency cycle detected at task {0}")]
    Cycle(String),

    #[error("Resource pool is empty")]
    EmptyResourcePool,

    #[error("Selection table of {cells} cells exceeds the limit of {limit}")]
    Capacity { cells: u64, limit: u64 },
}

impl EngineError {
    /// Returns true for the validation family (bad references or fields)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EngineError::UnknownVertex(_)
                | EngineError::UnknownDependency { .. }
                | EngineError::InvalidTask { .. }
                | EngineError::EmptyResourcePool
        )
    }
}
