//! # Command-Line Interface
//!
//! Read-only views over a snapshot file. Every command loads the snapshot,
//! runs one engine computation and prints the result.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Scheduling | Ordering and assigning tasks | `critical-path`, `allocate`, `select`, `queue` |
//! | Graph | Project relationships | `graph cycles`, `graph path`, `graph chain` |
//! | Lookup | Finding projects | `search`, `find`, `projects`, `show` |
//! | Analytics | Priorities and activity | `priorities`, `trend` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! The default can be changed with `default_format` in the global config.
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output on stderr:
//! ```bash
//! planhub --verbose --snapshot data.json critical-path
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod analytics;
mod app;
mod graph;
mod output;
mod schedule;

pub use analytics::ProjectSort;
pub use app::{run, Cli, Commands, Session};
pub use graph::GraphCommands;
pub use output::{Output, OutputFormat};
