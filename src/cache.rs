//! cache.rs — the snapshot cache shared between the background pipeline and
//! request handlers. One `Arc<Snapshot>` behind a lock, swapped whole on
//! publish; readers clone the `Arc` and never observe a half-built snapshot.

use std::sync::{Arc, RwLock};

use crate::model::Snapshot;

#[derive(Debug)]
pub struct SnapshotCache {
    current: RwLock<Arc<Snapshot>>,
}

impl SnapshotCache {
    /// A cache starts non-empty: the initial snapshot is the bootstrap
    /// sample, so `current()` has something to serve before the first cycle.
    pub fn new(initial: Snapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    /// Most recent successfully published snapshot. Never blocks beyond the
    /// read-lock clone.
    pub fn current(&self) -> Arc<Snapshot> {
        self.current.read().expect("snapshot cache lock poisoned").clone()
    }

    /// Atomic replace. Old snapshots drop once the last reader releases its
    /// `Arc`; no history is kept.
    pub fn publish(&self, snapshot: Snapshot) {
        let mut guard = self.current.write().expect("snapshot cache lock poisoned");
        *guard = Arc::new(snapshot);
    }
}
