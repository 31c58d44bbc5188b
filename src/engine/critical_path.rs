//! Critical path analysis for dependent tasks
//!
//! Tasks form a directed graph (edge `dependency -> task`). The graph is
//! topologically sorted with petgraph before any pass runs, so input order
//! never matters and cyclic input is rejected up front.
//!
//! Forward pass: `ES = max(EF of dependencies)`, `EF = ES + duration`.
//! Backward pass: `LF = min(LS of dependents)` (or the project end for
//! sinks), `LS = LF - duration`, `slack = LS - ES`.

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::Serialize;
use std::collections::HashMap;

use super::error::EngineError;
use crate::domain::{Task, TaskId};

/// Schedule bounds for a single task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSchedule {
    pub task_id: TaskId,
    pub duration: u64,
    pub earliest_start: u64,
    pub earliest_finish: u64,
    pub latest_start: u64,
    pub latest_finish: u64,
    pub slack: u64,
    pub is_critical: bool,
}

/// Result of a critical path analysis
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schedule {
    /// Per-task bounds in topological order
    pub entries: Vec<TaskSchedule>,

    /// Latest earliest-finish over all tasks
    pub project_end: u64,
}

impl Schedule {
    /// Returns the zero-slack tasks in topological order
    pub fn critical_path(&self) -> Vec<&TaskId> {
        self.entries
            .iter()
            .filter(|e| e.is_critical)
            .map(|e| &e.task_id)
            .collect()
    }

    /// Looks up the bounds computed for a task
    pub fn get(&self, task_id: &TaskId) -> Option<&TaskSchedule> {
        self.entries.iter().find(|e| &e.task_id == task_id)
    }

    /// Writes the derived `is_critical` flag onto matching tasks
    pub fn mark_critical(&self, tasks: &mut [Task]) {
        let critical: HashMap<&TaskId, bool> = self
            .entries
            .iter()
            .map(|e| (&e.task_id, e.is_critical))
            .collect();

        for task in tasks {
            task.is_critical = critical.get(&task.id).copied().unwrap_or(false);
        }
    }
}

/// Validated task graph ready for analysis
#[derive(Debug)]
pub struct CriticalPathAnalyzer<'a> {
    tasks: &'a [Task],

    /// Edge `dependency -> dependent`; node weight is the task's slice index
    graph: DiGraph<usize, ()>,

    /// Node indices in topological order
    order: Vec<NodeIndex>,
}

impl<'a> CriticalPathAnalyzer<'a> {
    /// Validates the task set and sorts it topologically
    ///
    /// Fails with a validation error for malformed tasks, duplicate ids or
    /// unknown dependency ids, and with `EngineError::Cycle` if the
    /// dependencies are not acyclic.
    pub fn new(tasks: &'a [Task]) -> Result<Self, EngineError> {
        let mut graph = DiGraph::with_capacity(tasks.len(), tasks.len());
        let mut node_map: HashMap<&TaskId, NodeIndex> = HashMap::with_capacity(tasks.len());

        for (slot, task) in tasks.iter().enumerate() {
            task.validate().map_err(|reason| EngineError::InvalidTask {
                task: task.id.to_string(),
                reason,
            })?;

            let idx = graph.add_node(slot);
            if node_map.insert(&task.id, idx).is_some() {
                return Err(EngineError::InvalidTask {
                    task: task.id.to_string(),
                    reason: "duplicate task id".to_string(),
                });
            }
        }

        for task in tasks {
            let task_idx = node_map[&task.id];
            for dep in &task.dependencies {
                if dep == &task.id {
                    return Err(EngineError::Cycle(task.id.to_string()));
                }
                let dep_idx = node_map
                    .get(dep)
                    .ok_or_else(|| EngineError::UnknownDependency {
                        task: task.id.to_string(),
                        dependency: dep.to_string(),
                    })?;
                graph.add_edge(*dep_idx, task_idx, ());
            }
        }

        let order = toposort(&graph, None)
            .map_err(|cycle| EngineError::Cycle(tasks[graph[cycle.node_id()]].id.to_string()))?;

        Ok(Self {
            tasks,
            graph,
            order,
        })
    }

    /// Returns task ids in dependency order
    pub fn topological_order(&self) -> Vec<&TaskId> {
        self.order
            .iter()
            .map(|&idx| &self.tasks[self.graph[idx]].id)
            .collect()
    }

    /// Runs the forward and backward passes
    pub fn analyze(&self) -> Schedule {
        let n = self.graph.node_count();
        let duration = |idx: NodeIndex| u64::from(self.tasks[self.graph[idx]].duration);

        let mut earliest_start = vec![0u64; n];
        let mut earliest_finish = vec![0u64; n];

        for &idx in &self.order {
            let es = self
                .graph
                .neighbors_directed(idx, Direction::Incoming)
                .map(|dep| earliest_finish[dep.index()])
                .max()
                .unwrap_or(0);
            earliest_start[idx.index()] = es;
            earliest_finish[idx.index()] = es + duration(idx);
        }

        let project_end = earliest_finish.iter().copied().max().unwrap_or(0);

        let mut latest_start = vec![0u64; n];
        let mut latest_finish = vec![0u64; n];

        for &idx in self.order.iter().rev() {
            let lf = self
                .graph
                .neighbors_directed(idx, Direction::Outgoing)
                .map(|dependent| latest_start[dependent.index()])
                .min()
                .unwrap_or(project_end);
            latest_finish[idx.index()] = lf;
            latest_start[idx.index()] = lf - duration(idx);
        }

        let entries = self
            .order
            .iter()
            .map(|&idx| {
                let i = idx.index();
                let slack = latest_start[i] - earliest_start[i];
                TaskSchedule {
                    task_id: self.tasks[self.graph[idx]].id.clone(),
                    duration: duration(idx),
                    earliest_start: earliest_start[i],
                    earliest_finish: earliest_finish[i],
                    latest_start: latest_start[i],
                    latest_finish: latest_finish[i],
                    slack,
                    is_critical: slack == 0,
                }
            })
            .collect();

        Schedule {
            entries,
            project_end,
        }
    }
}

/// Validates and analyzes a task set in one call
pub fn critical_path(tasks: &[Task]) -> Result<Schedule, EngineError> {
    Ok(CriticalPathAnalyzer::new(tasks)?.analyze())
}
