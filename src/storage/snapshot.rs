//! Read-only snapshot loading
//!
//! A snapshot holds the projects, tasks and resources the engine works on.
//! Supported layouts, chosen by file extension:
//! - `.json` / `.yaml` / `.yml`: one document `{projects, tasks, resources}`
//! - `.jsonl`: one record per line, tagged with `"kind"`
//!
//! Files are read under a shared lock so a writer holding an exclusive lock
//! is never observed half-way.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Project, ProjectId, Resource, Task};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot not found: {0}")]
    NotFound(PathBuf),

    #[error("Unsupported snapshot format: {0} (expected .json, .jsonl, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),
}

/// One line of a `.jsonl` snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Project(Project),
    Task(Task),
    Resource(Resource),
}

/// Immutable view of the store handed to the engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
    pub resources: Vec<Resource>,
}

impl Snapshot {
    /// Loads a snapshot, picking the parser from the file extension
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SnapshotError::NotFound(path.to_path_buf()).into());
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let file = File::open(path)
            .with_context(|| format!("Failed to open snapshot: {}", path.display()))?;

        // Acquire shared lock for reading
        file.lock_shared()
            .context("Failed to acquire read lock on snapshot")?;

        // Lock is released when file is dropped
        match extension.as_deref() {
            Some("jsonl") => Self::from_jsonl(BufReader::new(&file)),
            Some("json") => {
                serde_json::from_reader(BufReader::new(&file))
                    .with_context(|| format!("Failed to parse snapshot: {}", path.display()))
            }
            Some("yaml") | Some("yml") => {
                let mut content = String::new();
                BufReader::new(&file)
                    .read_to_string(&mut content)
                    .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
                Self::from_yaml_str(&content)
                    .with_context(|| format!("Failed to parse snapshot: {}", path.display()))
            }
            _ => Err(SnapshotError::UnsupportedFormat(path.to_path_buf()).into()),
        }
    }

    /// Parses a single JSON document
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse JSON snapshot")
    }

    /// Parses a single YAML document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse YAML snapshot")
    }

    /// Parses tagged records, one per line; blank lines are skipped
    pub fn from_jsonl(reader: impl BufRead) -> Result<Self> {
        let mut snapshot = Self::default();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

            if line.trim().is_empty() {
                continue;
            }

            let record: Record = serde_json::from_str(&line)
                .with_context(|| format!("Failed to parse record at line {}", line_num + 1))?;

            match record {
                Record::Project(project) => snapshot.projects.push(project),
                Record::Task(task) => snapshot.tasks.push(task),
                Record::Resource(resource) => snapshot.resources.push(resource),
            }
        }

        Ok(snapshot)
    }

    /// Looks a project up by id
    pub fn project(&self, id: &ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| &p.id == id)
    }

    /// Returns the tasks belonging to one project
    pub fn tasks_for_project(&self, id: &ProjectId) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|t| &t.project_id == id)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    const JSON: &str = r#"{
        "projects": [
            {"id": "p-1", "name": "Apollo", "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z"}
        ],
        "tasks": [
            {"id": "t-1", "project_id": "p-1", "title": "Design", "duration": 3,
             "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z"},
            {"id": "t-2", "project_id": "p-2", "title": "Build", "duration": 2, "dependencies": ["t-1"],
             "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z"}
        ],
        "resources": [{"id": "alice", "label": "Alice"}]
    }"#;

    #[test]
    fn parse_json_document() {
        let snapshot = Snapshot::from_json_str(JSON).unwrap();
        assert_eq!(snapshot.projects.len(), 1);
        assert_eq!(snapshot.tasks.len(), 2);
        assert_eq!(snapshot.resources[0].load, 0);
        assert_eq!(snapshot.tasks[1].dependencies.len(), 1);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let snapshot = Snapshot::from_json_str("{}").unwrap();
        assert!(snapshot.projects.is_empty());
        assert!(snapshot.tasks.is_empty());
        assert!(snapshot.resources.is_empty());
    }

    #[test]
    fn parse_jsonl_records() {
        let content = concat!(
            r#"{"kind":"project","id":"p-1","name":"Apollo","created_at":"2024-01-01T00:00:00Z","updated_at":"2024-01-01T00:00:00Z"}"#,
            "\n\n",
            r#"{"kind":"resource","id":"bob"}"#,
            "\n",
        );

        let snapshot = Snapshot::from_jsonl(Cursor::new(content)).unwrap();
        assert_eq!(snapshot.projects.len(), 1);
        assert_eq!(snapshot.resources.len(), 1);
        assert!(snapshot.tasks.is_empty());
    }

    #[test]
    fn jsonl_error_names_the_line() {
        let content = "{\"kind\":\"resource\",\"id\":\"bob\"}\nnot json\n";
        let err = Snapshot::from_jsonl(Cursor::new(content)).unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }

    #[test]
    fn parse_yaml_document() {
        let yaml = r#"
resources:
  - id: alice
    label: Alice
  - id: bob
"#;
        let snapshot = Snapshot::from_yaml_str(yaml).unwrap();
        assert_eq!(snapshot.resources.len(), 2);
        assert_eq!(snapshot.resources[1].label, "");
    }

    #[test]
    fn load_by_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapshot.json");
        fs::write(&path, JSON).unwrap();

        let snapshot = Snapshot::load(&path).unwrap();
        assert_eq!(snapshot.tasks.len(), 2);

        let p1 = ProjectId::new("p-1").unwrap();
        assert_eq!(snapshot.project(&p1).unwrap().name, "Apollo");
        assert_eq!(snapshot.tasks_for_project(&p1).len(), 1);
    }

    #[test]
    fn load_rejects_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapshot.csv");
        fs::write(&path, "").unwrap();

        let err = Snapshot::load(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported snapshot format"));
    }

    #[test]
    fn load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Snapshot::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SnapshotError>(),
            Some(SnapshotError::NotFound(_))
        ));
    }
}
