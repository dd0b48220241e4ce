//! Arena-backed tree nodes
//!
//! Node = key + owning child slots + non-owning parent id.
//! All links are `NodeId` indices into a [`NodeArena`], so subtrees can be
//! transplanted during rebuilds without fighting borrow lifetimes.
//!
//! Every primitive here works on the subtree rooted at a given id and knows
//! nothing about rebalancing policy.

use std::cmp::Ordering;
use std::fmt;

use super::traversal::{Ancestors, Side};
use crate::config::Alpha;
use crate::{Key, ScapegoatError};

/// Index of a node slot in the arena
pub type NodeId = usize;

/// One key and its structural links
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Key, unique within the tree
    pub key: Key,

    /// Left child (all keys smaller)
    pub left: Option<NodeId>,

    /// Right child (all keys larger)
    pub right: Option<NodeId>,

    /// Structural parent, `None` at the root
    pub parent: Option<NodeId>,
}

impl Node {
    fn leaf(key: Key, parent: Option<NodeId>) -> Self {
        Self {
            key,
            left: None,
            right: None,
            parent,
        }
    }

    /// Child slot on `side`
    #[inline]
    pub fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn child_mut(&mut self, side: Side) -> &mut Option<NodeId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// Slot storage for nodes, with a free list for discarded slots
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    slots: Vec<Option<Node>>,
    free: Vec<NodeId>,
}

impl NodeArena {
    /// Create empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes
    pub fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Allocate a detached leaf
    pub fn alloc(&mut self, key: Key, parent: Option<NodeId>) -> NodeId {
        let node = Node::leaf(key, parent);
        match self.free.pop() {
            Some(id) => {
                self.slots[id] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        if self.slots[id].take().is_some() {
            self.free.push(id);
        }
    }

    /// Discard every node of the subtree rooted at `id`
    pub fn release_subtree(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            let node = self.node(current);
            pending.extend(node.left);
            pending.extend(node.right);
            self.release(current);
        }
    }

    /// Borrow a live node
    ///
    /// Ids handed out by this arena stay valid until released; touching a
    /// released id is a linkage defect.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        match &self.slots[id] {
            Some(node) => node,
            None => panic!("node {} was released", id),
        }
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        match &mut self.slots[id] {
            Some(node) => node,
            None => panic!("node {} was released", id),
        }
    }

    /// Key stored at `id`
    #[inline]
    pub fn key(&self, id: NodeId) -> Key {
        self.node(id).key
    }

    /// Parent of `id`
    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Which slot of its parent `id` occupies (`None` for a root)
    pub fn side_of(&self, id: NodeId) -> Option<Side> {
        let parent = self.parent(id)?;
        if self.node(parent).left == Some(id) {
            Some(Side::Left)
        } else {
            Some(Side::Right)
        }
    }

    /// The other child of `id`'s parent
    pub fn sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let side = self.side_of(id)?;
        self.node(parent).child(side.opposite())
    }

    /// Walk from `id` up to the root (excluding `id`)
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors::new(self, id)
    }

    /// Point `parent`'s `side` slot at `child` and `child` back at `parent`
    pub fn attach(&mut self, parent: NodeId, side: Side, child: Option<NodeId>) {
        *self.node_mut(parent).child_mut(side) = child;
        if let Some(child) = child {
            self.node_mut(child).parent = Some(parent);
        }
    }

    /// Clear `id`'s parent link, making it a root
    pub fn detach(&mut self, id: NodeId) {
        self.node_mut(id).parent = None;
    }

    /// Swap `new` into the slot `old` occupies under `parent`
    ///
    /// Updates the parent's slot and the new subtree root's parent link in one
    /// step. With `parent == None` only the new root is detached; the caller
    /// owns the root handle.
    pub fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            Some(p) => {
                let side = if self.node(p).left == Some(old) {
                    Side::Left
                } else {
                    Side::Right
                };
                self.attach(p, side, new);
            }
            None => {
                if let Some(new) = new {
                    self.node_mut(new).parent = None;
                }
            }
        }
    }

    /// Insert `key` below `at`
    ///
    /// Returns the new leaf, or `None` if `key` is already present.
    pub fn insert(&mut self, at: NodeId, key: Key) -> Option<NodeId> {
        let mut current = at;
        loop {
            let side = match key.cmp(&self.key(current)) {
                Ordering::Equal => return None,
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
            };
            match self.node(current).child(side) {
                Some(next) => current = next,
                None => {
                    let leaf = self.alloc(key, Some(current));
                    *self.node_mut(current).child_mut(side) = Some(leaf);
                    return Some(leaf);
                }
            }
        }
    }

    /// Delete `key` from the subtree rooted at `at`
    ///
    /// Returns the subtree's (possibly new) root for the caller to relink.
    /// A node with one child is spliced out and that child inherits its
    /// parent link; a node with two children takes its in-order successor's
    /// key and the successor is deleted from the right subtree instead.
    /// An absent key leaves the subtree unchanged.
    pub fn delete(&mut self, at: NodeId, key: Key) -> Option<NodeId> {
        match key.cmp(&self.key(at)) {
            Ordering::Less => {
                if let Some(left) = self.node(at).left {
                    let new_left = self.delete(left, key);
                    self.attach(at, Side::Left, new_left);
                }
                Some(at)
            }
            Ordering::Greater => {
                if let Some(right) = self.node(at).right {
                    let new_right = self.delete(right, key);
                    self.attach(at, Side::Right, new_right);
                }
                Some(at)
            }
            Ordering::Equal => {
                let node = self.node(at);
                let parent = node.parent;
                match (node.left, node.right) {
                    (None, child) | (child, None) => {
                        if let Some(child) = child {
                            self.node_mut(child).parent = parent;
                        }
                        self.release(at);
                        child
                    }
                    (Some(_), Some(right)) => {
                        let successor = self.min_key(right);
                        self.node_mut(at).key = successor;
                        let new_right = self.delete(right, successor);
                        self.attach(at, Side::Right, new_right);
                        Some(at)
                    }
                }
            }
        }
    }

    /// Smallest key in the subtree rooted at `at`
    pub fn min_key(&self, at: NodeId) -> Key {
        let mut current = at;
        while let Some(left) = self.node(current).left {
            current = left;
        }
        self.key(current)
    }

    /// Node holding `key`, if any
    pub fn search(&self, at: NodeId, key: Key) -> Option<NodeId> {
        let mut current = Some(at);
        while let Some(id) = current {
            let node = self.node(id);
            current = match key.cmp(&node.key) {
                Ordering::Equal => return Some(id),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        None
    }

    /// Height in nodes; an empty subtree has height 0
    pub fn height(&self, at: Option<NodeId>) -> usize {
        match at {
            None => 0,
            Some(id) => {
                let node = self.node(id);
                1 + self.height(node.left).max(self.height(node.right))
            }
        }
    }

    /// Node count, recomputed by full traversal
    pub fn size(&self, at: Option<NodeId>) -> usize {
        match at {
            None => 0,
            Some(id) => {
                let node = self.node(id);
                1 + self.size(node.left) + self.size(node.right)
            }
        }
    }

    /// Edges from `at` down to the node holding `key`
    pub fn depth(&self, at: NodeId, key: Key) -> Result<usize, ScapegoatError> {
        let mut current = Some(at);
        let mut depth = 0;
        while let Some(id) = current {
            let node = self.node(id);
            current = match key.cmp(&node.key) {
                Ordering::Equal => return Ok(depth),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
            depth += 1;
        }
        Err(ScapegoatError::KeyNotFound(key))
    }

    /// Append the subtree's keys in order (left, self, right)
    pub fn flatten(&self, at: Option<NodeId>, out: &mut Vec<Key>) {
        if let Some(id) = at {
            let node = self.node(id);
            self.flatten(node.left, out);
            out.push(node.key);
            self.flatten(node.right, out);
        }
    }

    /// Maximum height a subtree of this size may have under α
    pub fn alpha_height(&self, at: NodeId, alpha: Alpha) -> usize {
        alpha.height_bound(self.size(Some(at)))
    }

    /// Both children hold at most α of this subtree's nodes
    pub fn alpha_weight_balanced(&self, at: NodeId, alpha: Alpha) -> bool {
        let node = self.node(at);
        let limit = alpha.weight_limit(self.size(Some(at)));
        self.size(node.left) as f64 <= limit && self.size(node.right) as f64 <= limit
    }

    /// Height is within the α-height of this subtree
    pub fn alpha_height_balanced(&self, at: NodeId, alpha: Alpha) -> bool {
        self.height(Some(at)) <= self.alpha_height(at, alpha)
    }
}

/// Read-only handle to a node inside a tree
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    arena: &'a NodeArena,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(arena: &'a NodeArena, id: NodeId) -> Self {
        Self { arena, id }
    }

    fn related(&self, id: Option<NodeId>) -> Option<NodeRef<'a>> {
        id.map(|id| NodeRef::new(self.arena, id))
    }

    /// Arena slot of this node
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Key held by this node
    pub fn key(&self) -> Key {
        self.arena.key(self.id)
    }

    /// Left child
    pub fn left(&self) -> Option<NodeRef<'a>> {
        self.related(self.arena.node(self.id).left)
    }

    /// Right child
    pub fn right(&self) -> Option<NodeRef<'a>> {
        self.related(self.arena.node(self.id).right)
    }

    /// Structural parent
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.related(self.arena.parent(self.id))
    }

    /// Height of the subtree rooted here
    pub fn height(&self) -> usize {
        self.arena.height(Some(self.id))
    }

    /// Node count of the subtree rooted here
    pub fn size(&self) -> usize {
        self.arena.size(Some(self.id))
    }

    /// Edges from this node down to `key`
    pub fn depth(&self, key: Key) -> Result<usize, ScapegoatError> {
        self.arena.depth(self.id, key)
    }

    /// Sorted keys of the subtree rooted here
    pub fn flatten(&self) -> Vec<Key> {
        let mut keys = Vec::new();
        self.arena.flatten(Some(self.id), &mut keys);
        keys
    }

    /// See [`NodeArena::alpha_height`]
    pub fn alpha_height(&self, alpha: Alpha) -> usize {
        self.arena.alpha_height(self.id, alpha)
    }

    /// See [`NodeArena::alpha_weight_balanced`]
    pub fn alpha_weight_balanced(&self, alpha: Alpha) -> bool {
        self.arena.alpha_weight_balanced(self.id, alpha)
    }

    /// See [`NodeArena::alpha_height_balanced`]
    pub fn alpha_height_balanced(&self, alpha: Alpha) -> bool {
        self.arena.alpha_height_balanced(self.id, alpha)
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("node", self.arena.node(self.id))
            .finish()
    }
}

impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.key())
    }
}
