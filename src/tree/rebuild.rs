//! Scapegoat search and height-balanced reconstruction
//!
//! Partial rebuild:
//! 1. Climb from the new leaf until the climbed height is no longer
//!    justified by the subtree size (the scapegoat)
//! 2. Flatten the scapegoat's subtree into sorted keys
//! 3. Rebuild by midpoint recursion: root = keys[⌊n/2⌋]
//! 4. Swap the rebuilt subtree into the scapegoat's slot
//!
//! Midpoint recursion gives height ⌊log2(n)⌋ + 1, which is within the
//! α-height bound for every α ≥ 0.5.

use super::node::{NodeArena, NodeId};
use super::traversal::Side;
use crate::config::Alpha;
use crate::Key;

/// Outcome of rebuilding one subtree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rebuilt {
    /// Root of the new subtree
    pub root: NodeId,

    /// Nodes in the subtree
    pub size: usize,
}

/// Lowest ancestor of `inserted` whose subtree violates the α-height bound
///
/// Carries the size of the subtree already accounted for (starting with the
/// inserted node's own) and the number of edges climbed. At each parent the
/// subtree size is `1 + carried + size(sibling)`; the parent is the scapegoat
/// as soon as the climbed height exceeds ⌊log_{1/α}(size)⌋.
///
/// Returns `None` if the walk reaches the root without a violation.
pub fn find_scapegoat(arena: &NodeArena, alpha: Alpha, inserted: NodeId) -> Option<NodeId> {
    let mut size = arena.size(Some(inserted));
    let mut height = 0;

    for step in arena.ancestors(inserted) {
        height += 1;
        let total = 1 + size + arena.size(step.sibling);
        if height > alpha.depth_bound(total) {
            return Some(step.parent);
        }
        size = total;
    }

    None
}

/// Build a minimum-height subtree from strictly ascending `keys`
///
/// The new root's parent link is set to `parent`; the caller is responsible
/// for placing the root in the parent's child slot.
pub fn build_height_balanced(
    arena: &mut NodeArena,
    keys: &[Key],
    parent: Option<NodeId>,
) -> Option<NodeId> {
    if keys.is_empty() {
        return None;
    }

    let center = keys.len() / 2;
    let root = arena.alloc(keys[center], parent);

    let left = build_height_balanced(arena, &keys[..center], Some(root));
    arena.attach(root, Side::Left, left);
    let right = build_height_balanced(arena, &keys[center + 1..], Some(root));
    arena.attach(root, Side::Right, right);

    Some(root)
}

/// Replace the subtree rooted at `at` with a height-balanced copy
///
/// The new subtree is spliced into `at`'s former slot before the old nodes
/// are released.
pub fn rebuild_subtree(arena: &mut NodeArena, at: NodeId) -> Rebuilt {
    let parent = arena.parent(at);

    let mut keys = Vec::new();
    arena.flatten(Some(at), &mut keys);

    let built = build_height_balanced(arena, &keys, parent);
    arena.replace_child(parent, at, built);
    arena.release_subtree(at);

    Rebuilt {
        // `keys` holds at least `at`'s own key
        root: built.unwrap_or(at),
        size: keys.len(),
    }
}
