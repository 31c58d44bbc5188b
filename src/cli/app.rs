//! Main CLI application structure

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{analytics, graph, schedule};
use crate::storage::{Config, Snapshot};

#[derive(Parser)]
#[command(name = "planhub")]
#[command(author, version, about = "Scheduling, dependency and analytics views over project snapshots")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured format)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project configuration file (replaces .planhub/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Snapshot file (.json, .jsonl, .yaml)
    #[arg(long, short = 's', global = true, env = "PLANHUB_SNAPSHOT")]
    pub snapshot: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show earliest/latest bounds, slack and the critical path
    CriticalPath {
        /// Only schedule tasks of this project
        #[arg(long)]
        project: Option<String>,
    },

    /// Assign open tasks to resources, least loaded first
    Allocate,

    /// Pick the most valuable open tasks that fit a duration budget
    Select {
        /// Duration budget (defaults to scheduler.default_budget)
        #[arg(long)]
        budget: Option<u32>,
    },

    /// List open tasks in priority queue order
    Queue,

    /// Project dependency graph queries
    #[command(subcommand)]
    Graph(graph::GraphCommands),

    /// Autocomplete project names by prefix
    Search {
        /// Name prefix (case-insensitive)
        prefix: String,
    },

    /// Look a project up by exact name
    Find {
        /// Project name
        name: String,
    },

    /// List projects, optionally filtered and sorted
    Projects {
        /// Sort key
        #[arg(long, value_enum, default_value = "name")]
        sort: analytics::ProjectSort,

        /// Keep projects whose name or description contains this text
        #[arg(long)]
        filter: Option<String>,
    },

    /// Show tasks grouped by priority
    Priorities {
        /// Lowest priority shown (defaults to analytics.high_priority_threshold)
        #[arg(long)]
        min: Option<u8>,
    },

    /// Show daily completions and the activity trend
    Trend,

    /// Show one project
    Show {
        /// Project ID
        project_id: String,
    },
}

/// Everything a command handler needs besides its own arguments
pub struct Session {
    pub output: Output,
    pub config: Config,
    snapshot: Option<PathBuf>,
}

impl Session {
    /// Loads the snapshot named by `--snapshot` or `PLANHUB_SNAPSHOT`
    pub fn snapshot(&self) -> Result<Snapshot> {
        let path = self
            .snapshot
            .as_deref()
            .context("No snapshot given (use --snapshot PATH or set PLANHUB_SNAPSHOT)")?;

        self.output
            .verbose_ctx("snapshot", &format!("Loading {}", path.display()));
        let snapshot = Snapshot::load(path)?;
        self.output.verbose_ctx(
            "snapshot",
            &format!(
                "Loaded {} projects, {} tasks, {} resources",
                snapshot.projects.len(),
                snapshot.tasks.len(),
                snapshot.resources.len()
            ),
        );

        Ok(snapshot)
    }
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let format = cli
        .format
        .unwrap_or_else(|| config.global.default_format.into());
    let output = Output::new(format, cli.verbose);

    output.verbose("planhub starting");
    match &config.project_root {
        Some(root) => output.verbose_ctx("config", &format!("Project root: {}", root.display())),
        None => output.verbose_ctx("config", "No project config found, using defaults"),
    }

    let session = Session {
        output,
        config,
        snapshot: cli.snapshot,
    };

    match cli.command {
        Commands::CriticalPath { project } => {
            session
                .output
                .verbose_ctx("critical-path", &format!("Project filter: {:?}", project));
            schedule::critical_path(&session, project.as_deref())?
        }
        Commands::Allocate => schedule::allocate(&session)?,
        Commands::Select { budget } => schedule::select(&session, budget)?,
        Commands::Queue => schedule::queue(&session)?,

        Commands::Graph(cmd) => graph::run(cmd, &session)?,

        Commands::Search { prefix } => analytics::search(&session, &prefix)?,
        Commands::Find { name } => analytics::find(&session, &name)?,
        Commands::Projects { sort, filter } => {
            analytics::projects(&session, sort, filter.as_deref())?
        }
        Commands::Priorities { min } => analytics::priorities(&session, min)?,
        Commands::Trend => analytics::trend(&session)?,
        Commands::Show { project_id } => analytics::show(&session, &project_id)?,
    }

    session.output.verbose("Command completed successfully");
    Ok(())
}
