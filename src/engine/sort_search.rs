//! Sorting and lookup helpers over snapshot records

use std::cmp::Ordering;

use crate::domain::{Named, Project, Task};

/// Sorts by a key with a middle-element pivot and a three-way partition
///
/// Deterministic for distinct keys; items with equal keys keep their
/// relative order only because each partition pass preserves it.
pub fn quick_sort_by_key<T, K, F>(items: &[T], key: F) -> Vec<T>
where
    T: Clone,
    K: Ord,
    F: Fn(&T) -> K + Copy,
{
    if items.len() <= 1 {
        return items.to_vec();
    }

    let pivot = key(&items[items.len() / 2]);
    let mut less = Vec::new();
    let mut equal = Vec::new();
    let mut greater = Vec::new();

    for item in items {
        match key(item).cmp(&pivot) {
            Ordering::Less => less.push(item.clone()),
            Ordering::Equal => equal.push(item.clone()),
            Ordering::Greater => greater.push(item.clone()),
        }
    }

    let mut sorted = quick_sort_by_key(&less, key);
    sorted.extend(equal);
    sorted.extend(quick_sort_by_key(&greater, key));
    sorted
}

/// Stable merge sort by a key
pub fn merge_sort_by_key<T, K, F>(items: &[T], key: F) -> Vec<T>
where
    T: Clone,
    K: Ord,
    F: Fn(&T) -> K + Copy,
{
    if items.len() <= 1 {
        return items.to_vec();
    }

    let (left, right) = items.split_at(items.len() / 2);
    let left = merge_sort_by_key(left, key);
    let right = merge_sort_by_key(right, key);

    let mut merged = Vec::with_capacity(items.len());
    let (mut l, mut r) = (0, 0);
    while l < left.len() && r < right.len() {
        // `<=` keeps equal keys in their original order
        if key(&left[l]) <= key(&right[r]) {
            merged.push(left[l].clone());
            l += 1;
        } else {
            merged.push(right[r].clone());
            r += 1;
        }
    }
    merged.extend_from_slice(&left[l..]);
    merged.extend_from_slice(&right[r..]);
    merged
}

/// Sorts tasks by ascending priority, keeping input order among equals
pub fn merge_sort_by_priority(tasks: &[Task]) -> Vec<Task> {
    merge_sort_by_key(tasks, |task| task.priority)
}

/// Finds the record whose name equals `target` exactly
///
/// `sorted` must already be ordered by name.
pub fn binary_search_by_name<'a, T: Named>(sorted: &'a [T], target: &str) -> Option<&'a T> {
    sorted
        .binary_search_by(|item| item.name().cmp(target))
        .ok()
        .map(|index| &sorted[index])
}

/// Looks a project up by exact name (sort by name, then binary search)
pub fn find_by_name<'a>(projects: &'a [Project], name: &str) -> Option<&'a Project> {
    let refs: Vec<&Project> = projects.iter().collect();
    let sorted = quick_sort_by_key(&refs, |p| p.name.clone());
    binary_search_by_name(&sorted, name).copied()
}

/// Keeps projects whose name or description contains `term`, ignoring case
pub fn filter_by_text<'a>(projects: &'a [Project], term: &str) -> Vec<&'a Project> {
    let term = term.to_lowercase();
    projects
        .iter()
        .filter(|p| {
            term.is_empty()
                || p.name.to_lowercase().contains(&term)
                || p.description.to_lowercase().contains(&term)
        })
        .collect()
}
