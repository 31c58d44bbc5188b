//! Task domain model
//!
//! Tasks are the schedulable units of work within a project. They carry a
//! duration and a set of tasks they depend on, which the critical path
//! analyzer and the resource allocator consume.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::id::{ProjectId, TaskId};
use super::Named;

/// Task urgency on a 1-5 scale
///
/// Higher numeric value means more urgent. Every consumer in the crate
/// follows this convention; the task queue inverts it when seeding the
/// min-heap so that urgent tasks come out first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(pub u8);

impl Priority {
    pub const LOWEST: Priority = Priority(1);
    pub const HIGHEST: Priority = Priority(5);

    /// Returns the numeric value
    pub fn value(self) -> u8 {
        self.0
    }

    /// Returns true if the value lies within the conventional 1-5 range
    pub fn is_valid(self) -> bool {
        (Self::LOWEST..=Self::HIGHEST).contains(&self)
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority(3)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    #[serde(alias = "in-progress")]
    InProgress,
    Completed,
}

impl TaskStatus {
    /// Returns true if this status represents completion
    pub fn is_complete(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }

    /// Returns true if this task is currently being worked on
    pub fn is_active(&self) -> bool {
        matches!(self, TaskStatus::InProgress)
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }
}

/// A task snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,

    pub project_id: ProjectId,

    pub title: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default)]
    pub priority: Priority,

    /// Duration in abstract time units (must be positive)
    pub duration: u32,

    /// Tasks that must finish before this one can start
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<TaskId>,

    #[serde(default)]
    pub status: TaskStatus,

    /// Derived by critical path analysis
    #[serde(default)]
    pub is_critical: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a todo task with default priority
    pub fn new(id: TaskId, project_id: ProjectId, title: impl Into<String>, duration: u32) -> Self {
        let now = Utc::now();
        Self {
            id,
            project_id,
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            duration,
            dependencies: Vec::new(),
            status: TaskStatus::Todo,
            is_critical: false,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Sets the priority (builder style)
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = Priority(priority);
        self
    }

    /// Adds a dependency unless it is already present
    pub fn add_dependency(&mut self, task_id: TaskId) -> bool {
        if self.dependencies.contains(&task_id) {
            return false;
        }
        self.dependencies.push(task_id);
        true
    }

    /// Marks the task completed at the given time
    pub fn complete_at(&mut self, at: DateTime<Utc>) {
        self.status = TaskStatus::Completed;
        self.completed_at = Some(at);
        self.updated_at = at;
    }

    /// Checks the numeric fields the engine depends on
    ///
    /// Returns the reason the task is unusable, if any.
    pub fn validate(&self) -> Result<(), String> {
        if self.duration == 0 {
            return Err("duration must be positive".to_string());
        }
        if !self.priority.is_valid() {
            return Err(format!(
                "priority {} outside {}..={}",
                self.priority.value(),
                Priority::LOWEST.value(),
                Priority::HIGHEST.value()
            ));
        }
        Ok(())
    }
}

impl Named for Task {
    fn name(&self) -> &str {
        &self.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_task(id: &str, duration: u32) -> Task {
        Task::new(
            TaskId::new(id).unwrap(),
            ProjectId::new("p-1").unwrap(),
            format!("Task {}", id),
            duration,
        )
    }

    #[test]
    fn new_task_defaults() {
        let task = make_task("t-1", 3);
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, Priority(3));
        assert!(task.dependencies.is_empty());
        assert!(!task.is_critical);
        assert!(task.validate().is_ok());
    }

    #[test]
    fn add_dependency_dedupes() {
        let mut task = make_task("t-2", 1);
        let dep = TaskId::new("t-1").unwrap();
        assert!(task.add_dependency(dep.clone()));
        assert!(!task.add_dependency(dep));
        assert_eq!(task.dependencies.len(), 1);
    }

    #[test]
    fn validate_rejects_zero_duration() {
        let task = make_task("t-1", 0);
        assert!(task.validate().unwrap_err().contains("duration"));
    }

    #[test]
    fn validate_rejects_out_of_range_priority() {
        let task = make_task("t-1", 2).with_priority(9);
        assert!(task.validate().unwrap_err().contains("priority 9"));

        let task = make_task("t-1", 2).with_priority(0);
        assert!(task.validate().is_err());
    }

    #[test]
    fn status_accepts_hyphenated_in_progress() {
        let status: TaskStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(status, TaskStatus::InProgress);

        let status: TaskStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status, TaskStatus::InProgress);
        assert_eq!(status.label(), "in-progress");
    }

    #[test]
    fn deserialize_minimal_task() {
        let json = r#"{
            "id": "t-1",
            "project_id": "p-1",
            "title": "Write docs",
            "duration": 4,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.duration, 4);
        assert_eq!(task.priority, Priority::default());
        assert_eq!(task.status, TaskStatus::Todo);
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn complete_at_sets_timestamp() {
        let mut task = make_task("t-1", 1);
        let at = Utc::now();
        task.complete_at(at);
        assert!(task.status.is_complete());
        assert_eq!(task.completed_at, Some(at));
    }
}
