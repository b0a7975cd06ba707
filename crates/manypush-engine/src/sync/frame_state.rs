use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::input::PointerSnapshot;

#[derive(Debug, Default)]
struct Shared {
    latest: RwLock<Option<Arc<PointerSnapshot>>>,
    published: AtomicU64,
}

/// Latest-wins handoff of pointer snapshots from the input context to the render loop.
///
/// Publishing replaces the whole snapshot reference; readers clone that reference.
/// A reader therefore sees one complete published snapshot or nothing, never a
/// table assembled from two publishes. Both critical sections are a single pointer
/// store or refcount increment, so neither side waits on the other's work.
///
/// Cloning the handle is cheap and shares the same slot.
#[derive(Debug, Clone, Default)]
pub struct FrameStateChannel {
    shared: Arc<Shared>,
}

impl FrameStateChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `snapshot` as the latest, discarding any unread predecessor.
    pub fn publish(&self, snapshot: PointerSnapshot) {
        let next = Arc::new(snapshot);
        let previous = {
            let mut latest = self.shared.latest.write();
            latest.replace(next)
        };
        // Dropped outside the lock.
        drop(previous);
        self.shared.published.fetch_add(1, Ordering::Release);
    }

    /// Most recently published snapshot, or `None` before the first publish.
    #[inline]
    pub fn latest(&self) -> Option<Arc<PointerSnapshot>> {
        self.shared.latest.read().clone()
    }

    /// Total number of publishes so far.
    pub fn publish_count(&self) -> u64 {
        self.shared.published.load(Ordering::Acquire)
    }
}
