//! Domain models for planhub
//!
//! Read-only snapshots of the records owned by the external store. No I/O.

mod id;
mod project;
mod resource;
mod task;

pub use id::{IdError, ProjectId, ResourceId, TaskId};
pub use project::{Project, ProjectStatus};
pub use resource::Resource;
pub use task::{Priority, Task, TaskStatus};

/// Records that can be looked up by a display name
pub trait Named {
    fn name(&self) -> &str;
}

impl<T: Named + ?Sized> Named for &T {
    fn name(&self) -> &str {
        (**self).name()
    }
}
