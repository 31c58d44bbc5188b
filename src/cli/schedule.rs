//! Scheduling commands (critical-path, allocate, select, queue)

use std::collections::HashMap;

use anyhow::{Context, Result};

use super::app::Session;
use super::output::heading;
use crate::domain::{ProjectId, Task, TaskId};
use crate::engine::{self, task_queue};

/// Tasks that still need doing
fn open_tasks(tasks: &[Task]) -> Vec<Task> {
    tasks
        .iter()
        .filter(|t| !t.status.is_complete())
        .cloned()
        .collect()
}

fn titles(tasks: &[Task]) -> HashMap<&TaskId, &str> {
    tasks.iter().map(|t| (&t.id, t.title.as_str())).collect()
}

/// Show the schedule bounds and critical path
pub fn critical_path(session: &Session, project: Option<&str>) -> Result<()> {
    let output = &session.output;
    let snapshot = session.snapshot()?;

    let mut tasks = match project {
        Some(id) => {
            let id: ProjectId = id.parse().context("Invalid project ID")?;
            snapshot.tasks_for_project(&id)
        }
        None => snapshot.tasks.clone(),
    };

    let schedule = engine::critical_path(&tasks).context("Critical path analysis failed")?;
    schedule.mark_critical(&mut tasks);

    let critical: Vec<&TaskId> = schedule.critical_path();
    output.verbose_ctx(
        "critical-path",
        &format!(
            "{} tasks scheduled, {} critical",
            schedule.entries.len(),
            tasks.iter().filter(|t| t.is_critical).count()
        ),
    );

    if output.is_json() {
        output.data(&serde_json::json!({
            "project_end": schedule.project_end,
            "critical_path": critical,
            "entries": schedule.entries,
        }));
        return Ok(());
    }

    if schedule.entries.is_empty() {
        println!("No tasks to schedule.");
        return Ok(());
    }

    let titles = titles(&tasks);
    println!(
        "Schedule ({} tasks, project end: {}):",
        schedule.entries.len(),
        schedule.project_end
    );
    heading(
        &format!(
            "{:<14} {:<24} {:>4} {:>4} {:>4} {:>4} {:>4} {:>5}",
            "ID", "TITLE", "DUR", "ES", "EF", "LS", "LF", "SLACK"
        ),
        72,
    );
    for entry in &schedule.entries {
        let marker = if entry.is_critical { " *" } else { "" };
        println!(
            "{:<14} {:<24} {:>4} {:>4} {:>4} {:>4} {:>4} {:>5}{}",
            entry.task_id,
            titles.get(&entry.task_id).copied().unwrap_or(""),
            entry.duration,
            entry.earliest_start,
            entry.earliest_finish,
            entry.latest_start,
            entry.latest_finish,
            entry.slack,
            marker
        );
    }

    println!();
    let path: Vec<String> = critical.iter().map(|id| id.to_string()).collect();
    println!("Critical tasks: {}", path.join(", "));

    Ok(())
}

/// Assign open tasks to resources
pub fn allocate(session: &Session) -> Result<()> {
    let output = &session.output;
    let snapshot = session.snapshot()?;

    let tasks = open_tasks(&snapshot.tasks);
    let mut resources = snapshot.resources.clone();
    output.verbose_ctx(
        "allocate",
        &format!("{} open tasks over {} resources", tasks.len(), resources.len()),
    );

    let allocation = engine::allocate(&tasks, &mut resources).context("Allocation failed")?;

    if output.is_json() {
        let assignments: Vec<_> = allocation
            .assignments
            .iter()
            .map(|(task, resource)| serde_json::json!({ "task": task, "resource": resource }))
            .collect();
        let loads: Vec<_> = allocation
            .loads
            .iter()
            .map(|(resource, load)| serde_json::json!({ "resource": resource, "load": load }))
            .collect();
        output.data(&serde_json::json!({
            "assignments": assignments,
            "loads": loads,
            "makespan": allocation.makespan(),
        }));
        return Ok(());
    }

    if allocation.assignments.is_empty() {
        println!("No open tasks to allocate.");
    } else {
        let titles = titles(&tasks);
        println!("Assignments ({}):", allocation.assignments.len());
        heading(&format!("{:<14} {:<30} RESOURCE", "TASK", "TITLE"), 60);
        for (task, resource) in &allocation.assignments {
            println!(
                "{:<14} {:<30} {}",
                task,
                titles.get(task).copied().unwrap_or(""),
                resource
            );
        }
        println!();
    }

    heading(&format!("{:<14} LOAD", "RESOURCE"), 24);
    for (resource, load) in &allocation.loads {
        println!("{:<14} {}", resource, load);
    }
    println!();
    println!("Makespan: {}", allocation.makespan());

    Ok(())
}

/// Pick open tasks under a duration budget
pub fn select(session: &Session, budget: Option<u32>) -> Result<()> {
    let output = &session.output;
    let scheduler = &session.config.project.scheduler;
    let budget = budget.unwrap_or(scheduler.default_budget);

    let snapshot = session.snapshot()?;
    let tasks = open_tasks(&snapshot.tasks);
    output.verbose_ctx(
        "select",
        &format!("Selecting from {} open tasks with budget {}", tasks.len(), budget),
    );

    let selection = engine::select_optimal(&tasks, budget, scheduler.max_knapsack_cells)
        .context("Selection failed")?;

    if output.is_json() {
        let ids: Vec<&TaskId> = selection.tasks.iter().map(|t| &t.id).collect();
        output.data(&serde_json::json!({
            "budget": budget,
            "tasks": ids,
            "total_value": selection.total_value,
            "total_duration": selection.total_duration,
        }));
        return Ok(());
    }

    if selection.tasks.is_empty() {
        println!("No tasks fit in a budget of {}.", budget);
        return Ok(());
    }

    println!(
        "Selected {} tasks (value {}, duration {} of {}):",
        selection.tasks.len(),
        selection.total_value,
        selection.total_duration,
        budget
    );
    heading(&format!("{:<14} {:<4} {:>4} TITLE", "ID", "PRI", "DUR"), 60);
    for task in &selection.tasks {
        println!(
            "{:<14} {:<4} {:>4} {}",
            task.id,
            task.priority.to_string(),
            task.duration,
            task.title
        );
    }

    Ok(())
}

/// List open tasks in the order the priority queue releases them
pub fn queue(session: &Session) -> Result<()> {
    let output = &session.output;
    let snapshot = session.snapshot()?;
    let tasks = open_tasks(&snapshot.tasks);

    let ordered: Vec<&Task> = task_queue(&tasks).map(|(_, task)| task).collect();
    output.verbose_ctx("queue", &format!("{} tasks queued", ordered.len()));

    if output.is_json() {
        let items: Vec<_> = ordered
            .iter()
            .map(|t| {
                serde_json::json!({
                    "id": t.id,
                    "title": t.title,
                    "priority": t.priority,
                    "status": t.status,
                })
            })
            .collect();
        output.data(&items);
    } else if ordered.is_empty() {
        println!("Queue is empty.");
    } else {
        println!("Queue ({}):", ordered.len());
        heading(&format!("{:<14} {:<4} {:<12} TITLE", "ID", "PRI", "STATUS"), 60);
        for task in ordered {
            println!(
                "{:<14} {:<4} {:<12} {}",
                task.id,
                task.priority.to_string(),
                task.status.label(),
                task.title
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskStatus;

    #[test]
    fn open_tasks_skips_completed() {
        let project = ProjectId::new("p-1").unwrap();
        let mut done = Task::new(TaskId::new("t-1").unwrap(), project.clone(), "Done", 1);
        done.status = TaskStatus::Completed;
        let open = Task::new(TaskId::new("t-2").unwrap(), project, "Open", 1);

        let tasks = open_tasks(&[done, open]);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id.as_str(), "t-2");
    }
}
