//! Registry Events
//!
//! Events emitted by the target registry so other components can react to
//! changes without polling snapshots.

use serde::{Deserialize, Serialize};

/// Events emitted by the target registry
///
/// Only effective mutations are announced: an insert where every candidate was
/// already present, or a removal that matched nothing, emits no event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    /// Groups were appended by an insert
    TargetsAdded { count: usize, total: usize },

    /// Groups were removed by a targeted removal
    TargetsRemoved { count: usize, total: usize },

    /// The registry was cleared
    TargetsCleared { count: usize },
}

impl RegistryEvent {
    /// Number of groups affected by the mutation
    pub fn count(&self) -> usize {
        match self {
            RegistryEvent::TargetsAdded { count, .. } => *count,
            RegistryEvent::TargetsRemoved { count, .. } => *count,
            RegistryEvent::TargetsCleared { count } => *count,
        }
    }

    /// Registry size right after the mutation
    pub fn total(&self) -> usize {
        match self {
            RegistryEvent::TargetsAdded { total, .. } => *total,
            RegistryEvent::TargetsRemoved { total, .. } => *total,
            RegistryEvent::TargetsCleared { .. } => 0,
        }
    }
}

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::TargetsAdded { .. } => write!(f, "targets_added"),
            RegistryEvent::TargetsRemoved { .. } => write!(f, "targets_removed"),
            RegistryEvent::TargetsCleared { .. } => write!(f, "targets_cleared"),
        }
    }
}
