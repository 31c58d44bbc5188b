//! # Storage Layer
//!
//! Read-only access to the data the engine analyses, plus configuration.
//!
//! ## Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Snapshot | JSON / YAML document | any path passed via `--snapshot` |
//! | Snapshot | JSONL, one tagged record per line | any path passed via `--snapshot` |
//! | Config | TOML | `.planhub/config.toml`, `~/.config/planhub/config.toml` |
//!
//! Nothing in this crate writes snapshots. [`Snapshot::load`] takes a shared
//! `fs2` lock so readers never observe a writer mid-update.
//!
//! ## Key Types
//!
//! - [`Snapshot`] - Projects, tasks and resources loaded from disk
//! - [`Config`] - Project and global configuration

mod config;
mod snapshot;

pub use config::{
    AnalyticsConfig, CacheConfig, Config, ConfigError, GlobalConfig, OutputFormat, ProjectConfig,
    SchedulerConfig, MAX_WINDOW_DAYS,
};
pub use snapshot::{Record, Snapshot, SnapshotError};
