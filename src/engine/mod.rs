//! # Scheduling, Dependency & Analytics Engine
//!
//! Pure in-memory computations over snapshot records. Nothing here performs
//! I/O, logs, or keeps global state: callers construct each structure for a
//! session or view and drop it when done.
//!
//! ## Components
//!
//! | Component | Purpose |
//! |-----------|---------|
//! | [`DependencyGraph`] | Undirected project graph: cycle check, shortest path |
//! | [`CriticalPathAnalyzer`] | Earliest/latest bounds and slack for dependent tasks |
//! | [`allocate`] | Greedy least-load task to resource assignment |
//! | [`MinHeap`], [`select_optimal`] | Priority queue and budget-bounded selection |
//! | [`SearchIndex`] | Prefix trie for autocomplete |
//! | [`OrderedIndex`] | AVL tree for ordered traversal |
//! | [`Cache`] | Bucketed lookup cache |
//! | [`TimeSeriesAnalyzer`] | Daily activity buckets and trend |
//! | [`sort_search`] | Quick sort, merge sort, binary search |
//!
//! ## Thread Safety
//!
//! None of the structures synchronize internally. Share an instance across
//! threads only behind an external lock.

mod allocator;
mod cache;
mod critical_path;
mod error;
mod graph;
mod ordered_index;
mod scheduler;
mod search_index;
pub mod sort_search;
mod time_series;

pub use allocator::{allocate, Allocation};
pub use cache::{Cache, CacheEntry, DEFAULT_BUCKETS};
pub use critical_path::{critical_path, CriticalPathAnalyzer, Schedule, TaskSchedule};
pub use error::EngineError;
pub use graph::{unresolved_dependencies, DependencyGraph};
pub use ordered_index::OrderedIndex;
pub use scheduler::{select_optimal, task_queue, MinHeap, Selection};
pub use search_index::{SearchIndex, SearchMatch};
pub use time_series::{completion_rate, TimeSeriesAnalyzer, Trend, DAYS};
