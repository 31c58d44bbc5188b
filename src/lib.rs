//! planhub - Scheduling, dependency and analytics engine for project data
//!
//! The [`engine`] computes critical paths, resource assignments, budgeted
//! task selections, dependency graph queries and activity trends over
//! read-only snapshots of projects and tasks. [`storage`] loads those
//! snapshots and the configuration; [`cli`] is a thin command-line driver.

pub mod cli;
pub mod domain;
pub mod engine;
pub mod storage;

pub use domain::{Priority, Project, ProjectId, Resource, ResourceId, Task, TaskId, TaskStatus};
pub use engine::EngineError;
pub use storage::Snapshot;
