//! Greedy resource allocation
//!
//! Tasks are taken most urgent first (shorter duration breaks ties) and each
//! goes to whichever resource currently carries the least load, earlier
//! resources winning ties. This is a load-balancing heuristic, not an
//! optimal scheduler: the resulting makespan can be arbitrarily worse than
//! the best possible assignment.

use serde::Serialize;
use std::cmp::Reverse;
use std::collections::HashMap;

use super::error::EngineError;
use crate::domain::{Resource, ResourceId, Task, TaskId};

/// Task to resource assignment produced by one allocation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Allocation {
    /// Assignments in the order they were made
    pub assignments: Vec<(TaskId, ResourceId)>,

    /// Final load per resource, in pool order
    pub loads: Vec<(ResourceId, u64)>,
}

impl Allocation {
    /// Returns the resource a task was assigned to
    pub fn resource_for(&self, task_id: &TaskId) -> Option<&ResourceId> {
        self.assignments
            .iter()
            .find(|(task, _)| task == task_id)
            .map(|(_, resource)| resource)
    }

    /// Returns the assignments as a lookup map
    pub fn as_map(&self) -> HashMap<&TaskId, &ResourceId> {
        self.assignments.iter().map(|(t, r)| (t, r)).collect()
    }

    /// Returns the highest resource load
    pub fn makespan(&self) -> u64 {
        self.loads.iter().map(|(_, load)| *load).max().unwrap_or(0)
    }
}

/// Assigns every task to a resource
///
/// Resource loads are reset to zero first and hold the accumulated task
/// durations afterwards.
pub fn allocate(tasks: &[Task], resources: &mut [Resource]) -> Result<Allocation, EngineError> {
    if resources.is_empty() {
        return Err(EngineError::EmptyResourcePool);
    }

    for task in tasks {
        task.validate().map_err(|reason| EngineError::InvalidTask {
            task: task.id.to_string(),
            reason,
        })?;
    }

    for resource in resources.iter_mut() {
        resource.load = 0;
    }

    let mut ordered: Vec<&Task> = tasks.iter().collect();
    ordered.sort_by_key(|task| (Reverse(task.priority), task.duration));

    let mut assignments = Vec::with_capacity(ordered.len());
    for task in ordered {
        // min_by_key keeps the first minimum, so pool order breaks ties
        let target = resources
            .iter_mut()
            .min_by_key(|resource| resource.load)
            .ok_or(EngineError::EmptyResourcePool)?;

        target.load += u64::from(task.duration);
        assignments.push((task.id.clone(), target.id.clone()));
    }

    let loads = resources.iter().map(|r| (r.id.clone(), r.load)).collect();

    Ok(Allocation { assignments, loads })
}
