//! Size high-water mark and rebuild counters

use super::{RebuildEvent, RebuildKind, RebuildStats};
use crate::Key;

/// Tracks `max_size` and rebuild work for one tree
///
/// `max_size` only moves at two points: it is raised after an insert and
/// reset after a full rebuild.
#[derive(Debug, Clone)]
pub struct SizeTracker {
    /// Largest size seen since the last full rebuild
    max_size: usize,

    partial_rebuilds: usize,
    full_rebuilds: usize,
    nodes_rebuilt: usize,

    /// Event log (if profiling enabled)
    events: Option<Vec<RebuildEvent>>,
}

impl SizeTracker {
    /// Create new tracker starting at `initial_size`
    pub fn new(initial_size: usize, profile_enabled: bool) -> Self {
        Self {
            max_size: initial_size,
            partial_rebuilds: 0,
            full_rebuilds: 0,
            nodes_rebuilt: 0,
            events: if profile_enabled { Some(Vec::new()) } else { None },
        }
    }

    /// Raise the high-water mark after an insert
    pub fn observe_insert(&mut self, tree_size: usize) {
        self.max_size = self.max_size.max(tree_size);
    }

    /// Reset the high-water mark, e.g. when the tree empties
    pub fn reset(&mut self, tree_size: usize) {
        self.max_size = tree_size;
    }

    /// Whether a tree of `tree_size` has shrunk below α·max_size
    pub fn below_fraction(&self, tree_size: usize, alpha: f64) -> bool {
        (tree_size as f64) < alpha * self.max_size as f64
    }

    /// Record a scapegoat rebuild
    pub fn record_partial(&mut self, root_key: Key, subtree_size: usize, tree_size: usize) {
        self.partial_rebuilds += 1;
        self.record(RebuildKind::Partial, root_key, subtree_size, tree_size);
    }

    /// Record a whole-tree rebuild and reset the high-water mark
    pub fn record_full(&mut self, root_key: Key, tree_size: usize) {
        self.full_rebuilds += 1;
        self.max_size = tree_size;
        self.record(RebuildKind::Full, root_key, tree_size, tree_size);
    }

    fn record(&mut self, kind: RebuildKind, root_key: Key, subtree_size: usize, tree_size: usize) {
        self.nodes_rebuilt += subtree_size;

        if let Some(ref mut events) = self.events {
            events.push(RebuildEvent {
                kind,
                root_key,
                subtree_size,
                tree_size,
            });
        }
    }

    /// Largest size since the last full rebuild
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Snapshot counters
    pub fn stats(&self) -> RebuildStats {
        RebuildStats {
            max_size: self.max_size,
            partial_rebuilds: self.partial_rebuilds,
            full_rebuilds: self.full_rebuilds,
            nodes_rebuilt: self.nodes_rebuilt,
            events: self.events.clone(),
        }
    }
}
