//! Configuration handling for planhub
//!
//! Two TOML layers: the global file in the user config directory
//! (`~/.config/planhub/config.toml` on Linux) and the project file
//! `.planhub/config.toml`. Project keys win. An explicit `--config` path
//! stands in for the project file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::DEFAULT_BUCKETS;

/// Largest accepted `analytics.window_days` (about a century)
pub const MAX_WINDOW_DAYS: u32 = 36_500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Settings for trend and priority views
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Days of activity retained by the time-series analyzer
    pub window_days: u32,

    /// Tasks at or above this priority count as high priority
    pub high_priority_threshold: u8,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            window_days: 7,
            high_priority_threshold: 4,
        }
    }
}

/// Settings for the lookup cache
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    /// Number of hash buckets
    pub buckets: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            buckets: DEFAULT_BUCKETS,
        }
    }
}

/// Settings for budget-bounded selection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Duration budget used when `select` is run without `--budget`
    pub default_budget: u32,

    /// Largest selection table (tasks x budget) that will be built
    pub max_knapsack_cells: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            default_budget: 40,
            max_knapsack_cells: 10_000_000,
        }
    }
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ProjectConfig {
    pub analytics: AnalyticsConfig,
    pub cache: CacheConfig,
    pub scheduler: SchedulerConfig,
}

impl ProjectConfig {
    /// Rejects values the engine cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.analytics.window_days == 0 {
            return Err(ConfigError::Invalid(
                "analytics.window_days must be at least 1".to_string(),
            ));
        }
        if self.analytics.window_days > MAX_WINDOW_DAYS {
            return Err(ConfigError::Invalid(format!(
                "analytics.window_days must be at most {}",
                MAX_WINDOW_DAYS
            )));
        }
        if self.cache.buckets == 0 {
            return Err(ConfigError::Invalid(
                "cache.buckets must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Effective configuration after layering
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,

    /// Directory holding `.planhub/`, if one was found
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Loads the global file, then layers the project file over it
    ///
    /// The project file is `explicit` when given, otherwise
    /// `.planhub/config.toml` under the nearest ancestor that has one.
    /// Keys missing from both files take their defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut layered = match Self::global_config_dir() {
            Some(dir) => read_layer(&dir.join("config.toml"), "global")?.unwrap_or_default(),
            None => toml::Table::new(),
        };

        let project_root = match explicit {
            Some(path) => {
                if !path.is_file() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                if let Some(layer) = read_layer(path, "project")? {
                    merge_tables(&mut layered, layer);
                }
                None
            }
            None => {
                let cwd = std::env::current_dir().context("Failed to read current directory")?;
                let root = Self::find_project_root(&cwd);
                if let Some(root) = &root {
                    let path = root.join(".planhub").join("config.toml");
                    if let Some(layer) = read_layer(&path, "project")? {
                        merge_tables(&mut layered, layer);
                    }
                }
                root
            }
        };

        let mut config = Self::from_table(layered)?;
        config.project_root = project_root;
        Ok(config)
    }

    /// Builds a configuration from an already layered table
    pub fn from_table(table: toml::Table) -> Result<Self> {
        let value = toml::Value::Table(table);

        let project: ProjectConfig = value
            .clone()
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::Parse(e.to_string()))?;
        let global: GlobalConfig = value
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::Parse(e.to_string()))?;

        project.validate()?;

        Ok(Self {
            project,
            global,
            project_root: None,
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "planhub", "planhub").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Walks up from `start` to the first directory containing `.planhub/`
    pub fn find_project_root(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|dir| dir.join(".planhub").is_dir())
            .map(Path::to_path_buf)
    }

    /// Returns true if a project directory was found
    pub fn is_in_project(&self) -> bool {
        self.project_root.is_some()
    }
}

/// Reads one TOML layer; a missing file is an empty layer
fn read_layer(path: &Path, which: &str) -> Result<Option<toml::Table>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} config: {}", which, path.display()))?;

    let table = content
        .parse::<toml::Table>()
        .map_err(|e| ConfigError::Parse(e.to_string()))
        .with_context(|| format!("Failed to parse {} config: {}", which, path.display()))?;

    Ok(Some(table))
}

/// Overlays `overlay` onto `base`; nested tables merge key by key
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = Config::default();

        assert_eq!(config.project.analytics.window_days, 7);
        assert_eq!(config.project.analytics.high_priority_threshold, 4);
        assert_eq!(config.project.cache.buckets, 100);
        assert_eq!(config.global.default_format, OutputFormat::Text);
        assert!(!config.is_in_project());
    }

    #[test]
    fn parse_project_config() {
        let toml = r#"
[analytics]
window_days = 14

[scheduler]
default_budget = 12
"#;

        let config: ProjectConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.analytics.window_days, 14);
        assert_eq!(config.analytics.high_priority_threshold, 4);
        assert_eq!(config.scheduler.default_budget, 12);
        assert_eq!(config.scheduler.max_knapsack_cells, 10_000_000);
        assert_eq!(config.cache, CacheConfig::default());
    }

    #[test]
    fn parse_global_config() {
        let config: GlobalConfig = toml::from_str("default_format = \"json\"").unwrap();
        assert_eq!(config.default_format, OutputFormat::Json);
    }

    #[test]
    fn validate_rejects_zero_window() {
        let mut config = ProjectConfig::default();
        config.analytics.window_days = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = ProjectConfig::default();
        config.cache.buckets = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_oversized_window() {
        let mut config = ProjectConfig::default();
        config.analytics.window_days = MAX_WINDOW_DAYS;
        assert!(config.validate().is_ok());

        config.analytics.window_days = 4_000_000_000;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let table: toml::Table = "[analytics]\nwindow_days = 4000000000\n".parse().unwrap();
        let err = Config::from_table(table).unwrap_err();
        assert!(err.to_string().contains("window_days must be at most"));
    }

    #[test]
    fn find_project_root_walks_up() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".planhub")).unwrap();

        let sub_dir = dir.path().join("sub").join("dir");
        fs::create_dir_all(&sub_dir).unwrap();

        let root = Config::find_project_root(&sub_dir);
        assert_eq!(root.as_deref(), Some(dir.path()));
    }

    #[test]
    fn project_layer_overrides_global_keys() {
        let mut base: toml::Table = "default_format = \"json\"\n[scheduler]\ndefault_budget = 10\nmax_knapsack_cells = 500\n"
            .parse()
            .unwrap();
        let overlay: toml::Table = "[scheduler]\ndefault_budget = 25\n".parse().unwrap();
        merge_tables(&mut base, overlay);

        let config = Config::from_table(base).unwrap();
        assert_eq!(config.global.default_format, OutputFormat::Json);
        assert_eq!(config.project.scheduler.default_budget, 25);
        assert_eq!(config.project.scheduler.max_knapsack_cells, 500);
    }

    #[test]
    fn from_table_rejects_wrong_types() {
        let table: toml::Table = "[cache]\nbuckets = \"many\"\n".parse().unwrap();
        assert!(Config::from_table(table).is_err());
    }

    #[test]
    fn explicit_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[cache]\nbuckets = 16\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.project.cache.buckets, 16);
        assert!(config.project_root.is_none());
    }

    #[test]
    fn explicit_config_must_parse() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[cache\n").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse project config"));
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }
}
