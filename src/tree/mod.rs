//! Scapegoat tree
//!
//! Ordered set of unique keys kept α-height-balanced by occasional
//! rebuilds instead of rotations:
//! - Insert too deep → rebuild only the scapegoat subtree
//! - Delete shrinks tree below α·max_size → rebuild everything
//!
//! Node mechanics live in [`NodeArena`]; this module owns the policy.

mod node;
mod rebuild;
mod traversal;

pub use node::{Node, NodeArena, NodeId, NodeRef};
pub use rebuild::{build_height_balanced, find_scapegoat, rebuild_subtree, Rebuilt};
pub use traversal::{Ancestors, Side, Step};

use tracing::{debug, trace, warn};

use crate::config::{Alpha, TreeConfig};
use crate::stats::{RebuildStats, SizeTracker};
use crate::{Key, ScapegoatError};

/// Self-balancing binary search tree over unique integer keys
///
/// Not synchronized: wrap in a lock that serializes all mutation if shared.
#[derive(Debug, Clone)]
pub struct ScapegoatTree {
    /// Node storage
    arena: NodeArena,

    /// Root node, `None` once every key has been deleted
    root: Option<NodeId>,

    /// Balance parameter
    alpha: Alpha,

    /// `max_size` plus rebuild counters
    tracker: SizeTracker,
}

impl ScapegoatTree {
    /// Create a tree holding `key`
    ///
    /// Fails with [`ScapegoatError::InvalidAlpha`] unless 0.5 ≤ α < 1.
    pub fn new(alpha: f64, key: Key) -> Result<Self, ScapegoatError> {
        Self::with_config(&TreeConfig::new().with_alpha(alpha), key)
    }

    /// Create a tree holding `key` from an explicit configuration
    pub fn with_config(config: &TreeConfig, key: Key) -> Result<Self, ScapegoatError> {
        let alpha = config.validate()?;
        let mut arena = NodeArena::new();
        let root = arena.alloc(key, None);

        Ok(Self {
            arena,
            root: Some(root),
            alpha,
            tracker: SizeTracker::new(1, config.profile_rebuilds),
        })
    }

    /// Build a height-balanced tree from strictly ascending `keys`
    ///
    /// An empty slice yields an empty tree.
    pub fn from_sorted(config: &TreeConfig, keys: &[Key]) -> Result<Self, ScapegoatError> {
        let alpha = config.validate()?;
        if let Some(pos) = keys.windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(ScapegoatError::UnsortedKeys {
                index: pos + 1,
                previous: keys[pos],
                next: keys[pos + 1],
            });
        }

        let mut arena = NodeArena::new();
        let root = build_height_balanced(&mut arena, keys, None);

        Ok(Self {
            arena,
            root,
            alpha,
            tracker: SizeTracker::new(keys.len(), config.profile_rebuilds),
        })
    }

    /// Insert `key`; duplicates are ignored
    ///
    /// If the new node lands deeper than the α-height of the tree allows,
    /// the scapegoat subtree above it is rebuilt.
    pub fn insert(&mut self, key: Key) {
        let Some(root) = self.root else {
            self.root = Some(self.arena.alloc(key, None));
            self.tracker.observe_insert(1);
            return;
        };

        let Some(inserted) = self.arena.insert(root, key) else {
            trace!(key, "duplicate key ignored");
            return;
        };

        // Depth in edges, α-height in nodes
        let depth = self.arena.ancestors(inserted).count();
        if depth + 1 > self.arena.alpha_height(root, self.alpha) {
            self.rebuild_scapegoat(inserted);
        }

        let size = self.size();
        self.tracker.observe_insert(size);
    }

    fn rebuild_scapegoat(&mut self, inserted: NodeId) {
        let Some(scapegoat) = find_scapegoat(&self.arena, self.alpha, inserted) else {
            warn!(
                key = self.arena.key(inserted),
                "no scapegoat below root, rebuilding whole tree"
            );
            self.rebuild();
            return;
        };

        let scapegoat_key = self.arena.key(scapegoat);
        let was_root = self.root == Some(scapegoat);
        let rebuilt = rebuild_subtree(&mut self.arena, scapegoat);
        if was_root {
            self.root = Some(rebuilt.root);
        }

        let tree_size = self.size();
        debug!(
            scapegoat = scapegoat_key,
            subtree_size = rebuilt.size,
            tree_size,
            "partial rebuild"
        );
        self.tracker
            .record_partial(self.arena.key(rebuilt.root), rebuilt.size, tree_size);
    }

    /// Delete `key`
    ///
    /// Returns `false` only if the tree was already empty. Deleting an
    /// absent key changes nothing and still returns `true`.
    pub fn delete(&mut self, key: Key) -> bool {
        let Some(root) = self.root else {
            return false;
        };

        let live_before = self.arena.live();
        self.root = self.arena.delete(root, key);
        if self.arena.live() == live_before {
            trace!(key, "delete of absent key");
        }

        let Some(root) = self.root else {
            self.tracker.reset(0);
            return true;
        };
        self.arena.detach(root);

        let size = self.size();
        if self.tracker.below_fraction(size, self.alpha.value()) {
            debug!(
                size,
                max_size = self.tracker.max_size(),
                "tree shrank below alpha * max_size"
            );
            self.rebuild();
        } else if !self.arena.alpha_height_balanced(root, self.alpha) {
            debug!(
                size,
                height = self.height(),
                "height bound exceeded after delete"
            );
            self.rebuild();
        }

        true
    }

    /// Rebuild the whole tree height-balanced and reset `max_size`
    pub fn rebuild(&mut self) {
        let Some(root) = self.root else {
            self.tracker.reset(0);
            return;
        };

        let rebuilt = rebuild_subtree(&mut self.arena, root);
        self.root = Some(rebuilt.root);

        debug!(tree_size = rebuilt.size, "full rebuild");
        self.tracker
            .record_full(self.arena.key(rebuilt.root), rebuilt.size);
    }

    /// Node holding `key`
    pub fn search(&self, key: Key) -> Option<NodeRef<'_>> {
        let id = self.arena.search(self.root?, key)?;
        Some(NodeRef::new(&self.arena, id))
    }

    /// Whether `key` is present
    pub fn contains(&self, key: Key) -> bool {
        self.search(key).is_some()
    }

    /// Height in nodes (0 if empty)
    pub fn height(&self) -> usize {
        self.arena.height(self.root)
    }

    /// Number of keys (0 if empty)
    pub fn size(&self) -> usize {
        self.arena.size(self.root)
    }

    /// Whether the tree holds no keys
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Edges from the root to `key`
    ///
    /// `Ok(None)` for an empty tree, [`ScapegoatError::KeyNotFound`] if the
    /// tree is non-empty but lacks `key`.
    pub fn depth(&self, key: Key) -> Result<Option<usize>, ScapegoatError> {
        match self.root {
            None => Ok(None),
            Some(root) => self.arena.depth(root, key).map(Some),
        }
    }

    /// Sorted keys
    pub fn flatten(&self) -> Vec<Key> {
        let mut keys = Vec::with_capacity(self.arena.live());
        self.flatten_into(&mut keys);
        keys
    }

    /// Append sorted keys to `out`
    pub fn flatten_into(&self, out: &mut Vec<Key>) {
        self.arena.flatten(self.root, out);
    }

    /// Root node
    pub fn root(&self) -> Option<NodeRef<'_>> {
        self.root.map(|id| NodeRef::new(&self.arena, id))
    }

    /// Balance parameter
    pub fn alpha(&self) -> Alpha {
        self.alpha
    }

    /// Largest size since the last full rebuild
    pub fn max_size(&self) -> usize {
        self.tracker.max_size()
    }

    /// Rebuild counters
    pub fn stats(&self) -> RebuildStats {
        self.tracker.stats()
    }
}

impl Extend<Key> for ScapegoatTree {
    fn extend<I: IntoIterator<Item = Key>>(&mut self, keys: I) {
        for key in keys {
            self.insert(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tree_from(alpha: f64, keys: &[Key]) -> ScapegoatTree {
        let mut tree = ScapegoatTree::new(alpha, keys[0]).unwrap();
        tree.extend(keys[1..].iter().copied());
        tree
    }

    #[test]
    fn test_construction_rejects_bad_alpha() {
        assert_eq!(
            ScapegoatTree::new(0.4, 1).unwrap_err(),
            ScapegoatError::InvalidAlpha(0.4)
        );
        assert!(ScapegoatTree::new(1.0, 1).is_err());
        let tree = ScapegoatTree::new(0.5, 1).unwrap();
        assert_eq!(tree.size(), 1);
        assert_eq!(tree.max_size(), 1);
    }

    #[test]
    fn test_ascending_inserts_trigger_partial_rebuild() {
        let keys: Vec<Key> = (1..=15).collect();
        let tree = tree_from(0.6, &keys);
        assert!(tree.stats().partial_rebuilds > 0);
        assert!(tree.height() <= tree.alpha().height_bound(15));
        assert_eq!(tree.flatten(), keys);
        assert_eq!(tree.root().unwrap().parent().map(|p| p.key()), None);
    }

    #[test]
    fn test_max_size_is_high_water_mark() {
        let mut tree = tree_from(0.6, &[50, 30, 70, 20, 40]);
        assert_eq!(tree.max_size(), 5);
        assert!(tree.delete(20));
        assert_eq!(tree.max_size(), 5);
        assert_eq!(tree.size(), 4);
    }

    #[test]
    fn test_delete_below_fraction_triggers_full_rebuild() {
        let mut tree = tree_from(0.6, &[50, 30, 70, 20, 40]);
        tree.delete(20);
        tree.delete(40);
        // 3 is not below 0.6 × 5
        assert_eq!(tree.stats().full_rebuilds, 0);
        tree.delete(70);
        assert_eq!(tree.stats().full_rebuilds, 1);
        assert_eq!(tree.max_size(), 2);
        assert_eq!(tree.flatten(), vec![30, 50]);
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn test_delete_everything_then_reinsert() {
        let mut tree = tree_from(0.75, &[2, 1, 3]);
        assert!(tree.delete(1));
        assert!(tree.delete(2));
        assert!(tree.delete(3));
        assert!(tree.is_empty());
        assert_eq!(tree.max_size(), 0);
        assert!(!tree.delete(3));
        assert_eq!(tree.depth(3), Ok(None));
        assert!(tree.search(3).is_none());

        tree.insert(9);
        assert_eq!(tree.flatten(), vec![9]);
        assert_eq!(tree.max_size(), 1);
    }

    #[test]
    fn test_depth_on_missing_key_is_error() {
        let tree = tree_from(0.6, &[50, 30, 70]);
        assert_eq!(tree.depth(30), Ok(Some(1)));
        assert_eq!(tree.depth(31), Err(ScapegoatError::KeyNotFound(31)));
    }

    #[test]
    fn test_from_sorted() {
        let config = TreeConfig::new();
        let tree = ScapegoatTree::from_sorted(&config, &[1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(tree.height(), 3);
        assert_eq!(tree.max_size(), 6);

        let empty = ScapegoatTree::from_sorted(&config, &[]).unwrap();
        assert!(empty.is_empty());

        assert_eq!(
            ScapegoatTree::from_sorted(&config, &[1, 3, 3]).unwrap_err(),
            ScapegoatError::UnsortedKeys {
                index: 2,
                previous: 3,
                next: 3
            }
        );
    }

    #[test]
    fn test_profiling_records_events() {
        let config = TreeConfig::new().with_rebuild_profiling(true);
        let mut tree = ScapegoatTree::with_config(&config, 1).unwrap();
        tree.extend(2..=10);
        let stats = tree.stats();
        let events = stats.events.unwrap();
        assert_eq!(events.len(), stats.partial_rebuilds);
        assert!(!events.is_empty());
    }

    proptest! {
        #[test]
        fn scapegoat_is_lowest_violating_ancestor(
            keys in proptest::collection::vec(-200i64..200, 1..80),
            extra in -200i64..200,
        ) {
            let tree = tree_from(0.6, &keys);
            let alpha = tree.alpha();
            let mut arena = tree.arena.clone();
            let root = tree.root.unwrap();

            if let Some(inserted) = arena.insert(root, extra) {
                let depth = arena.ancestors(inserted).count();
                let triggered = depth + 1 > arena.alpha_height(root, alpha);
                let goat = find_scapegoat(&arena, alpha, inserted);

                if triggered {
                    let goat = goat.expect("trigger implies a scapegoat");
                    // Every ancestor strictly below the scapegoat passes the test
                    for (climbed, step) in arena.ancestors(inserted).enumerate() {
                        let subtree = arena.size(Some(step.parent));
                        let violates = climbed + 1 > alpha.depth_bound(subtree);
                        prop_assert_eq!(violates, step.parent == goat);
                        if step.parent == goat {
                            break;
                        }
                    }
                }
            }
        }
    }
}
