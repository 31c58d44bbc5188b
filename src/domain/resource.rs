//! Resources that tasks are allocated to

use serde::{Deserialize, Serialize};

use super::id::ResourceId;

/// A person or team with a running load counter
///
/// `load` is owned by the allocator: it is reset to zero at the start of
/// every allocation run and accumulates assigned task durations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,

    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub load: u64,
}

impl Resource {
    pub fn new(id: ResourceId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            load: 0,
        }
    }
}
