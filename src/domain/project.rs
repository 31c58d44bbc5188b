//! Project domain model
//!
//! Projects group tasks and may depend on other projects. Dependency ids
//! are not required to resolve; graph operations treat unknown ids as
//! opaque vertices.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::ProjectId;
use super::Named;

/// Status of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Initial state - still being drafted
    #[default]
    Draft,

    /// Ready to start
    Ready,

    /// Blocked on another project
    Waiting,

    /// Actively being worked on
    Active,

    Completed,
}

impl ProjectStatus {
    /// Returns true if this status represents completion
    pub fn is_complete(&self) -> bool {
        matches!(self, ProjectStatus::Completed)
    }

    /// Returns true if this project is actively being worked on
    pub fn is_active(&self) -> bool {
        matches!(self, ProjectStatus::Active)
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectStatus::Draft => write!(f, "draft"),
            ProjectStatus::Ready => write!(f, "ready"),
            ProjectStatus::Waiting => write!(f, "waiting"),
            ProjectStatus::Active => write!(f, "active"),
            ProjectStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(ProjectStatus::Draft),
            "ready" => Ok(ProjectStatus::Ready),
            "waiting" | "blocked" => Ok(ProjectStatus::Waiting),
            "active" | "in_progress" | "in-progress" => Ok(ProjectStatus::Active),
            "completed" | "complete" | "done" => Ok(ProjectStatus::Completed),
            _ => Err(format!("Unknown project status: {}", s)),
        }
    }
}

/// A project snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,

    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Projects this one depends on
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<ProjectId>,

    #[serde(default)]
    pub status: ProjectStatus,

    /// Member user ids
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a draft project with no dependencies
    pub fn new(id: ProjectId, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            description: String::new(),
            dependencies: Vec::new(),
            status: ProjectStatus::Draft,
            members: Vec::new(),
            deadline: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Adds a dependency on another project (builder style)
    pub fn depends_on(mut self, id: ProjectId) -> Self {
        if !self.dependencies.contains(&id) {
            self.dependencies.push(id);
        }
        self
    }
}

impl Named for Project {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_from_str_accepts_aliases() {
        assert_eq!("Active".parse::<ProjectStatus>().unwrap(), ProjectStatus::Active);
        assert_eq!("done".parse::<ProjectStatus>().unwrap(), ProjectStatus::Completed);
        assert_eq!("blocked".parse::<ProjectStatus>().unwrap(), ProjectStatus::Waiting);
        assert!("bogus".parse::<ProjectStatus>().is_err());
    }

    #[test]
    fn status_display_matches_wire_format() {
        for status in [
            ProjectStatus::Draft,
            ProjectStatus::Ready,
            ProjectStatus::Waiting,
            ProjectStatus::Active,
            ProjectStatus::Completed,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
        }
    }

    #[test]
    fn depends_on_skips_duplicates() {
        let dep = ProjectId::new("p-0").unwrap();
        let project = Project::new(ProjectId::new("p-1").unwrap(), "Apollo")
            .depends_on(dep.clone())
            .depends_on(dep);
        assert_eq!(project.dependencies.len(), 1);
        assert_eq!(project.name(), "Apollo");
    }

    #[test]
    fn deserialize_with_defaults() {
        let json = r#"{
            "id": "p-1",
            "name": "Apollo",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-02T00:00:00Z"
        }"#;

        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.status, ProjectStatus::Draft);
        assert!(project.description.is_empty());
        assert!(project.dependencies.is_empty());
        assert!(project.deadline.is_none());
    }
}
