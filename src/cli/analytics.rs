//! Lookup and analytics commands (search, find, projects, priorities, trend, show)

use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};

use super::app::Session;
use super::output::heading;
use crate::domain::{Priority, Project, ProjectId, Task};
use crate::engine::sort_search::{filter_by_text, find_by_name, merge_sort_by_key, quick_sort_by_key};
use crate::engine::{completion_rate, Cache, OrderedIndex, SearchIndex, TimeSeriesAnalyzer, DAYS};

/// Sort key for the project listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ProjectSort {
    Name,
    Created,
    Updated,
    Deadline,
}

/// Orders projects by the chosen key
///
/// Name order uses quick sort on the lower-cased name; the timestamp orders
/// use the stable merge sort so ties keep snapshot order. Projects without a
/// deadline sort last.
pub fn sort_projects<'a>(projects: &[&'a Project], sort: ProjectSort) -> Vec<&'a Project> {
    match sort {
        ProjectSort::Name => quick_sort_by_key(projects, |p| p.name.to_lowercase()),
        ProjectSort::Created => merge_sort_by_key(projects, |p| p.created_at),
        ProjectSort::Updated => merge_sort_by_key(projects, |p| p.updated_at),
        ProjectSort::Deadline => merge_sort_by_key(projects, |p| (p.deadline.is_none(), p.deadline)),
    }
}

/// Groups tasks by priority in an ordered index
pub fn priority_index<'a>(tasks: &'a [Task]) -> OrderedIndex<Priority, Vec<&'a Task>> {
    let mut groups: HashMap<Priority, Vec<&Task>> = HashMap::new();
    for task in tasks {
        groups.entry(task.priority).or_default().push(task);
    }

    let mut index = OrderedIndex::new();
    for (priority, group) in groups {
        index.insert(priority, group);
    }
    index
}

/// Autocomplete project names
pub fn search(session: &Session, prefix: &str) -> Result<()> {
    let output = &session.output;
    let snapshot = session.snapshot()?;

    let mut index = SearchIndex::new();
    for project in &snapshot.projects {
        index.insert(&project.name, &project.id);
    }
    output.verbose_ctx("search", &format!("Indexed {} names", index.len()));

    let matches = index.prefix_search(prefix);
    output.verbose_ctx("search", &format!("Found {} matches", matches.len()));

    if output.is_json() {
        let items: Vec<_> = matches
            .iter()
            .map(|m| serde_json::json!({ "name": m.word, "id": m.payload }))
            .collect();
        output.data(&items);
    } else if matches.is_empty() {
        println!("No projects match '{}'", prefix);
    } else {
        heading(&format!("{:<30} ID", "NAME"), 50);
        for m in &matches {
            println!("{:<30} {}", m.word, m.payload);
        }
    }

    Ok(())
}

/// Look a project up by exact name
pub fn find(session: &Session, name: &str) -> Result<()> {
    let output = &session.output;
    let snapshot = session.snapshot()?;

    let found = find_by_name(&snapshot.projects, name);

    if output.is_json() {
        output.data(&serde_json::json!({ "name": name, "project": found }));
    } else {
        match found {
            Some(project) => println!("{} {}", project.id, project.name),
            None => println!("No project named '{}'", name),
        }
    }

    Ok(())
}

/// List projects
pub fn projects(session: &Session, sort: ProjectSort, filter: Option<&str>) -> Result<()> {
    let output = &session.output;
    let snapshot = session.snapshot()?;

    let filtered = filter_by_text(&snapshot.projects, filter.unwrap_or(""));
    output.verbose_ctx(
        "projects",
        &format!("{} of {} projects match", filtered.len(), snapshot.projects.len()),
    );
    let sorted = sort_projects(&filtered, sort);

    if output.is_json() {
        output.data(&sorted);
    } else if sorted.is_empty() {
        println!("No projects found.");
    } else {
        println!("Projects ({}):", sorted.len());
        heading(
            &format!("{:<14} {:<30} {:<10} DEADLINE", "ID", "NAME", "STATUS"),
            70,
        );
        for project in sorted {
            let deadline = project
                .deadline
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:<14} {:<30} {:<10} {}",
                project.id,
                project.name,
                project.status.to_string(),
                deadline
            );
        }
    }

    Ok(())
}

/// Show tasks at or above a priority, most urgent first
pub fn priorities(session: &Session, min: Option<u8>) -> Result<()> {
    let output = &session.output;
    let min = Priority(min.unwrap_or(session.config.project.analytics.high_priority_threshold));

    let snapshot = session.snapshot()?;
    let index = priority_index(&snapshot.tasks);
    output.verbose_ctx(
        "priorities",
        &format!("{} priority levels, tree height {}", index.len(), index.height()),
    );

    let mut groups = index.range_from(&min);
    groups.reverse();

    if output.is_json() {
        let items: Vec<_> = groups
            .iter()
            .map(|(priority, tasks)| {
                let ids: Vec<_> = tasks.iter().map(|t| &t.id).collect();
                serde_json::json!({ "priority": priority, "tasks": ids })
            })
            .collect();
        output.data(&items);
    } else if groups.is_empty() {
        println!("No tasks at {} or above.", min);
    } else {
        for (priority, tasks) in groups {
            println!("{} ({}):", priority, tasks.len());
            for task in tasks {
                println!("  {:<14} {:<12} {}", task.id, task.status.label(), task.title);
            }
        }
    }

    Ok(())
}

/// Show daily completions over the last week
pub fn trend(session: &Session) -> Result<()> {
    let output = &session.output;
    let window_days = session.config.project.analytics.window_days;
    let snapshot = session.snapshot()?;

    let now = Utc::now();
    let analyzer = TimeSeriesAnalyzer::from_completed_tasks(
        &snapshot.tasks,
        Duration::days(i64::from(window_days)),
        now,
    );
    output.verbose_ctx(
        "trend",
        &format!("{} completions within {} days", analyzer.len(), window_days),
    );

    let daily = analyzer.daily_data_at(now);
    let average = analyzer.moving_average_at(now);
    let max = analyzer.max_value_at(now);
    let trend = analyzer.find_trend_at(now);
    let rate = completion_rate(&snapshot.tasks);

    if output.is_json() {
        output.data(&serde_json::json!({
            "daily": daily,
            "moving_average": average,
            "max": max,
            "trend": trend,
            "completion_rate": rate,
        }));
        return Ok(());
    }

    heading("Completions (last 7 days)", 40);
    for (i, value) in daily.iter().enumerate() {
        let day = now - Duration::days((DAYS - 1 - i) as i64);
        let bar = "#".repeat((value / max * 20.0).round() as usize);
        println!("{} {:>4} {}", day.format("%a %m-%d"), value, bar);
    }
    println!();
    println!("Moving average:  {:.2}", average);
    println!("Trend:           {}", trend);
    println!("Completion rate: {:.1}%", rate);

    Ok(())
}

/// Show one project, looked up through the bucketed cache
pub fn show(session: &Session, project_id: &str) -> Result<()> {
    let output = &session.output;
    let id: ProjectId = project_id
        .parse()
        .with_context(|| format!("Invalid project ID: '{}'", project_id))?;

    let snapshot = session.snapshot()?;

    let mut cache = Cache::new(session.config.project.cache.buckets);
    for project in &snapshot.projects {
        cache.set(project.id.as_str(), project);
    }
    output.verbose_ctx(
        "show",
        &format!(
            "Cached {} projects in {} buckets, '{}' hashes to bucket {}",
            cache.len(),
            cache.bucket_count(),
            id,
            cache.bucket_index(id.as_str())
        ),
    );

    let project = cache
        .get(id.as_str())
        .copied()
        .with_context(|| format!("Project not found: {}", id))?;

    let tasks = snapshot.tasks_for_project(&id);
    let rate = completion_rate(&tasks);

    if output.is_json() {
        output.data(&serde_json::json!({
            "project": project,
            "tasks": tasks.len(),
            "completion_rate": rate,
        }));
        return Ok(());
    }

    println!("{} {}", project.id, project.name);
    println!("Status: {}", project.status);
    if !project.description.is_empty() {
        println!("{}", project.description);
    }
    if let Some(deadline) = project.deadline {
        println!("Deadline: {}", deadline.format("%Y-%m-%d"));
    }
    if !project.members.is_empty() {
        println!("Members: {}", project.members.join(", "));
    }
    if !project.dependencies.is_empty() {
        let deps: Vec<String> = project.dependencies.iter().map(|d| d.to_string()).collect();
        println!("Depends on: {}", deps.join(", "));
    }
    println!("Tasks: {} ({:.1}% complete)", tasks.len(), rate);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskId;
    use chrono::TimeZone;

    fn project(id: &str, name: &str) -> Project {
        Project::new(ProjectId::new(id).unwrap(), name)
    }

    fn task(id: &str, priority: u8) -> Task {
        Task::new(TaskId::new(id).unwrap(), ProjectId::new("p-1").unwrap(), id, 1)
            .with_priority(priority)
    }

    #[test]
    fn sort_by_name_ignores_case() {
        let projects = vec![project("p-1", "beta"), project("p-2", "Alpha"), project("p-3", "gamma")];
        let refs: Vec<&Project> = projects.iter().collect();

        let sorted = sort_projects(&refs, ProjectSort::Name);
        let names: Vec<_> = sorted.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "beta", "gamma"]);
    }

    #[test]
    fn sort_by_deadline_puts_missing_last() {
        let mut a = project("p-1", "a");
        let mut b = project("p-2", "b");
        let c = project("p-3", "c");
        a.deadline = Some(Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap());
        b.deadline = Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());

        let projects = vec![c, a, b];
        let refs: Vec<&Project> = projects.iter().collect();

        let sorted = sort_projects(&refs, ProjectSort::Deadline);
        let ids: Vec<_> = sorted.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p-2", "p-1", "p-3"]);
    }

    #[test]
    fn priority_index_groups_tasks() {
        let tasks = vec![task("a", 5), task("b", 2), task("c", 5), task("d", 4)];
        let index = priority_index(&tasks);

        assert_eq!(index.len(), 3);
        assert!(index.is_balanced());

        let high: Vec<_> = index
            .range_from(&Priority(4))
            .into_iter()
            .map(|(p, group)| (p.value(), group.len()))
            .collect();
        assert_eq!(high, vec![(4, 1), (5, 2)]);

        let top = index.get(&Priority(5)).unwrap();
        let ids: Vec<_> = top.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }
}
