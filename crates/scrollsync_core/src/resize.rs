//! Polling resize watcher
//!
//! Fallback for hosts that cannot report element resizes. The watcher
//! remembers each surface's outer size; when polled (typically on window
//! resize) it writes the size delta of every changed surface as that
//! surface's resize marker. Containers observe the marker and run their
//! resize pass from the resulting mutation notification.

use indexmap::IndexMap;
use scrollsync_platform::{GeometryProvider, NodeId, Platform, Point, Size};
use smallvec::SmallVec;

#[derive(Debug, Default)]
pub struct ResizeWatcher {
    /// Last seen outer size per node, in registration order
    entries: IndexMap<NodeId, Size>,
}

impl ResizeWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `node` from its current outer size
    pub fn watch<P: GeometryProvider + ?Sized>(&mut self, platform: &P, node: NodeId) {
        self.entries.insert(node, platform.outer_size(node));
    }

    pub fn unwatch(&mut self, node: NodeId) -> bool {
        self.entries.shift_remove(&node).is_some()
    }

    pub fn is_watching(&self, node: NodeId) -> bool {
        self.entries.contains_key(&node)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compare outer sizes and mark every node that changed.
    ///
    /// Returns the changed nodes.
    pub fn poll<P: Platform + ?Sized>(&mut self, platform: &mut P) -> SmallVec<[NodeId; 4]> {
        let mut changed = SmallVec::new();
        for (&node, last) in self.entries.iter_mut() {
            let now = platform.outer_size(node);
            if now == *last {
                continue;
            }
            let delta = Point::new(now.width - last.width, now.height - last.height);
            tracing::debug!(?node, dw = delta.x, dh = delta.y, "surface resized");
            platform.set_resize_marker(node, delta);
            *last = now;
            changed.push(node);
        }
        changed
    }
}
