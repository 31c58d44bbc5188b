//! Priority queue and budget-bounded task selection
//!
//! Two independent tools over the task shape:
//! - [`MinHeap`], an array-backed binary heap that yields the smallest key
//!   first. [`task_queue`] seeds it with inverted priorities so the most
//!   urgent task comes out first.
//! - [`select_optimal`], a 0/1 knapsack over (value = priority,
//!   weight = duration) under a total duration budget.

use serde::Serialize;
use std::cmp::Reverse;

use super::error::EngineError;
use crate::domain::{Priority, Task};

/// Binary min-heap keyed by `K`
#[derive(Debug, Clone)]
pub struct MinHeap<K, V> {
    items: Vec<(K, V)>,
}

impl<K: Ord, V> Default for MinHeap<K, V> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<K: Ord, V> MinHeap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item and sifts it up past any larger parent
    pub fn insert(&mut self, key: K, value: V) {
        self.items.push((key, value));
        let mut index = self.items.len() - 1;

        while index > 0 {
            let parent = (index - 1) / 2;
            if self.items[parent].0 <= self.items[index].0 {
                break;
            }
            self.items.swap(index, parent);
            index = parent;
        }
    }

    /// Removes and returns the item with the smallest key
    pub fn extract_min(&mut self) -> Option<(K, V)> {
        if self.items.is_empty() {
            return None;
        }

        let last = self.items.len() - 1;
        self.items.swap(0, last);
        let min = self.items.pop();
        self.sift_down(0);
        min
    }

    /// Returns the item with the smallest key without removing it
    pub fn peek(&self) -> Option<(&K, &V)> {
        self.items.first().map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;

            if left < len && self.items[left].0 < self.items[smallest].0 {
                smallest = left;
            }
            if right < len && self.items[right].0 < self.items[smallest].0 {
                smallest = right;
            }
            if smallest == index {
                return;
            }

            self.items.swap(index, smallest);
            index = smallest;
        }
    }
}

impl<K: Ord, V> Iterator for MinHeap<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.extract_min()
    }
}

/// Seeds a heap so that higher-priority tasks are extracted first
pub fn task_queue<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> MinHeap<Reverse<Priority>, &'a Task> {
    let mut heap = MinHeap::new();
    for task in tasks {
        heap.insert(Reverse(task.priority), task);
    }
    heap
}

/// Tasks chosen under a duration budget
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection<'a> {
    /// Chosen tasks, in reverse input order (the order reconstruction visits them)
    pub tasks: Vec<&'a Task>,

    /// Summed priority of the chosen tasks
    pub total_value: u64,

    /// Summed duration of the chosen tasks
    pub total_duration: u64,
}

/// Picks the subset of tasks with the greatest summed priority whose summed
/// duration fits in `budget`
///
/// Classic 0/1 knapsack: `best[i][w]` holds the best value using the first
/// `i` tasks within duration `w`, with a parallel inclusion table walked
/// back from `(n, budget)` to recover the subset. Time and space are
/// `O(n * budget)`; tables above `max_cells` entries are refused.
pub fn select_optimal<'a>(
    tasks: &'a [Task],
    budget: u32,
    max_cells: u64,
) -> Result<Selection<'a>, EngineError> {
    for task in tasks {
        task.validate().map_err(|reason| EngineError::InvalidTask {
            task: task.id.to_string(),
            reason,
        })?;
    }

    let n = tasks.len();
    let width = budget as usize + 1;
    let cells = (n as u64 + 1) * width as u64;
    if cells > max_cells {
        return Err(EngineError::Capacity {
            cells,
            limit: max_cells,
        });
    }

    let mut best = vec![vec![0u64; width]; n + 1];
    let mut included = vec![vec![false; width]; n + 1];

    for i in 1..=n {
        let weight = tasks[i - 1].duration as usize;
        let value = u64::from(tasks[i - 1].priority.value());

        for w in 0..width {
            let without = best[i - 1][w];
            if weight <= w {
                let with = value + best[i - 1][w - weight];
                if with > without {
                    best[i][w] = with;
                    included[i][w] = true;
                    continue;
                }
            }
            best[i][w] = without;
        }
    }

    let mut chosen = Vec::new();
    let mut w = budget as usize;
    for i in (1..=n).rev() {
        if included[i][w] {
            chosen.push(&tasks[i - 1]);
            w -= tasks[i - 1].duration as usize;
        }
    }

    let total_duration = chosen.iter().map(|t| u64::from(t.duration)).sum();
    Ok(Selection {
        tasks: chosen,
        total_value: best[n][budget as usize],
        total_duration,
    })
}
