//! Rebuild accounting
//!
//! Tracks the size high-water mark that drives full rebuilds, plus
//! counters describing how much reconstruction work the tree has done.

use crate::Key;

mod tracker;

pub use tracker::SizeTracker;

/// Which rebuild ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum RebuildKind {
    /// Scapegoat subtree after an insert
    Partial,

    /// Whole tree after a delete (or on request)
    Full,
}

/// One recorded rebuild (only kept when profiling is enabled)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct RebuildEvent {
    /// Partial or full
    pub kind: RebuildKind,

    /// Key at the root of the rebuilt subtree
    pub root_key: Key,

    /// Nodes reconstructed
    pub subtree_size: usize,

    /// Tree size after the rebuild
    pub tree_size: usize,
}

/// Snapshot of rebuild activity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct RebuildStats {
    /// Largest size since the last full rebuild
    pub max_size: usize,

    /// Scapegoat rebuilds performed
    pub partial_rebuilds: usize,

    /// Whole-tree rebuilds performed
    pub full_rebuilds: usize,

    /// Total nodes reconstructed across all rebuilds
    pub nodes_rebuilt: usize,

    /// Event log, `None` unless profiling is enabled
    pub events: Option<Vec<RebuildEvent>>,
}

impl RebuildStats {
    /// Total rebuilds of either kind
    pub fn total_rebuilds(&self) -> usize {
        self.partial_rebuilds + self.full_rebuilds
    }

    /// Generate report
    pub fn report(&self) -> String {
        format!(
            "Max size: {}\nRebuilds:\n  Partial: {}\n  Full: {}\n  Nodes rebuilt: {}",
            self.max_size, self.partial_rebuilds, self.full_rebuilds, self.nodes_rebuilt
        )
    }
}
