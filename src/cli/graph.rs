//! Project dependency graph commands

use anyhow::{Context, Result};
use clap::Subcommand;

use super::app::Session;
use crate::domain::ProjectId;
use crate::engine::{unresolved_dependencies, DependencyGraph};

#[derive(Subcommand)]
pub enum GraphCommands {
    /// Check whether a cycle is reachable from a project
    Cycle {
        /// Project ID
        id: String,
    },

    /// Check the whole graph for cycles and dangling dependencies
    Cycles,

    /// Show the shortest chain of relationships between two projects
    Path {
        /// Starting project ID
        from: String,

        /// Target project ID
        to: String,
    },

    /// Show every project connected to one project
    Chain {
        /// Project ID
        id: String,
    },
}

pub fn run(cmd: GraphCommands, session: &Session) -> Result<()> {
    let output = &session.output;
    let snapshot = session.snapshot()?;

    let graph = DependencyGraph::from_projects(&snapshot.projects);
    output.verbose_ctx(
        "graph",
        &format!("{} vertices, {} edges", graph.len(), graph.edge_count()),
    );

    match cmd {
        GraphCommands::Cycle { id } => {
            let id = parse_id(&id)?;
            if !graph.contains(&id) {
                output.verbose_ctx("graph", &format!("{} is not in the graph", id));
            }
            let cyclic = graph.has_cycle(&id);

            if output.is_json() {
                output.data(&serde_json::json!({ "id": id, "has_cycle": cyclic }));
            } else if cyclic {
                println!("Cycle reachable from {}.", id);
            } else {
                println!("No cycle reachable from {}.", id);
            }
        }

        GraphCommands::Cycles => {
            let cyclic = graph.has_any_cycle();
            let components = graph.components();
            let unresolved = unresolved_dependencies(&snapshot.projects);

            if output.is_json() {
                output.data(&serde_json::json!({
                    "has_cycle": cyclic,
                    "components": components.len(),
                    "unresolved": unresolved,
                }));
            } else {
                println!(
                    "{} projects in {} connected groups.",
                    graph.len(),
                    components.len()
                );
                if cyclic {
                    println!("The dependency graph contains a cycle.");
                } else {
                    println!("No cycles.");
                }
                if !unresolved.is_empty() {
                    let ids: Vec<String> = unresolved.iter().map(|id| id.to_string()).collect();
                    println!("Unresolved dependencies: {}", ids.join(", "));
                }
            }
        }

        GraphCommands::Path { from, to } => {
            let from = parse_id(&from)?;
            let to = parse_id(&to)?;
            let path = graph.shortest_path(&from, &to);

            if output.is_json() {
                output.data(&serde_json::json!({ "from": from, "to": to, "path": path }));
            } else {
                match path {
                    Some(path) => {
                        let ids: Vec<String> = path.iter().map(|id| id.to_string()).collect();
                        println!("{} ({} hops)", ids.join(" -> "), path.len() - 1);
                    }
                    None => println!("No path from {} to {}.", from, to),
                }
            }
        }

        GraphCommands::Chain { id } => {
            let id = parse_id(&id)?;
            let chain = graph.reachable(&id);

            if output.is_json() {
                output.data(&serde_json::json!({ "id": id, "chain": chain }));
            } else if chain.is_empty() {
                println!("Project not in graph: {}", id);
            } else {
                println!("Connected to {} ({}):", id, chain.len() - 1);
                for (n, member) in chain.iter().enumerate().skip(1) {
                    let name = snapshot
                        .project(member)
                        .map(|p| p.name.as_str())
                        .unwrap_or("(unknown)");
                    println!("  {:>3}. {:<14} {}", n, member, name);
                }
            }
        }
    }

    Ok(())
}

fn parse_id(raw: &str) -> Result<ProjectId> {
    raw.parse()
        .with_context(|| format!("Invalid project ID: '{}'", raw))
}
