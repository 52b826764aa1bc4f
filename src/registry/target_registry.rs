//! Target Registry
//!
//! The authoritative set of target groups served to Prometheus. Groups are kept
//! in insertion order and no two stored groups are ever equal.
//!
//! Every operation runs under one exclusive lock held for its whole duration.
//! Insert and remove are scan-then-mutate sequences, so they must not
//! interleave with any other operation, and snapshots take the same lock so
//! they never observe a half-applied batch.

use crate::registry::RegistryEvent;
use crate::targets::TargetGroup;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

// =============================================================================
// Constants
// =============================================================================

/// Capacity of the event broadcast channel
pub const EVENT_CHANNEL_CAPACITY: usize = 1024;

// =============================================================================
// Target Registry
// =============================================================================

/// Deduplicated, insertion-ordered collection of target groups
pub struct TargetRegistry {
    /// Stored groups, guarded as a whole
    groups: Mutex<Vec<TargetGroup>>,
    /// Event broadcaster
    event_sender: broadcast::Sender<RegistryEvent>,
}

impl std::fmt::Debug for TargetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetRegistry")
            .field("groups", &self.groups.lock().len())
            .finish()
    }
}

impl TargetRegistry {
    /// Create a new, empty registry
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Get an event receiver
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.event_sender.subscribe()
    }

    /// Point-in-time copy of every stored group, in insertion order
    pub fn snapshot(&self) -> Vec<TargetGroup> {
        self.groups.lock().clone()
    }

    /// Append every candidate not already present
    ///
    /// Each candidate is checked against the registry as it stands at that
    /// moment, so duplicates within one batch collapse to a single entry.
    /// Returns the number of groups actually appended.
    pub fn insert<I>(&self, candidates: I) -> usize
    where
        I: IntoIterator<Item = TargetGroup>,
    {
        let mut groups = self.groups.lock();
        let mut added = 0;

        for candidate in candidates {
            if groups.contains(&candidate) {
                debug!(group = %candidate, "Target group already registered");
                continue;
            }
            groups.push(candidate);
            added += 1;
        }

        if added > 0 {
            let _ = self.event_sender.send(RegistryEvent::TargetsAdded {
                count: added,
                total: groups.len(),
            });
        }

        added
    }

    /// Remove the first stored match of each candidate
    ///
    /// Candidates that match nothing are skipped. At most one group is removed
    /// per candidate. Returns the number of groups actually removed.
    pub fn remove<'a, I>(&self, candidates: I) -> usize
    where
        I: IntoIterator<Item = &'a TargetGroup>,
    {
        let mut groups = self.groups.lock();
        let mut removed = 0;

        for candidate in candidates {
            match groups.iter().position(|g| g == candidate) {
                Some(idx) => {
                    groups.remove(idx);
                    removed += 1;
                }
                None => debug!(group = %candidate, "Target group not registered"),
            }
        }

        if removed > 0 {
            let _ = self.event_sender.send(RegistryEvent::TargetsRemoved {
                count: removed,
                total: groups.len(),
            });
        }

        removed
    }

    /// Clear the registry, returning its prior size
    pub fn remove_all(&self) -> usize {
        let mut groups = self.groups.lock();
        let removed = groups.len();
        groups.clear();

        if removed > 0 {
            let _ = self
                .event_sender
                .send(RegistryEvent::TargetsCleared { count: removed });
        }

        removed
    }

    /// Number of stored groups
    pub fn len(&self) -> usize {
        self.groups.lock().len()
    }

    /// Check if the registry holds no groups
    pub fn is_empty(&self) -> bool {
        self.groups.lock().is_empty()
    }
}

impl Default for TargetRegistry {
    fn default() -> Self {
        let (event_sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            groups: Mutex::new(Vec::new()),
            event_sender,
        }
    }
}
