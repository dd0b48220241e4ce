//! Upward traversal along parent links
//!
//! The scapegoat search climbs from a freshly inserted leaf toward the
//! root; parent ids make each step O(1).

use super::node::{NodeArena, NodeId};

/// Child slot of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Smaller keys
    Left,

    /// Larger keys
    Right,
}

impl Side {
    /// The other slot
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// One step of an upward walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Node we came from
    pub child: NodeId,

    /// Its parent, the node reached by this step
    pub parent: NodeId,

    /// Other child of `parent`
    pub sibling: Option<NodeId>,
}

/// Iterator over the steps from a node up to the root
#[derive(Debug)]
pub struct Ancestors<'a> {
    arena: &'a NodeArena,
    current: NodeId,
}

impl<'a> Ancestors<'a> {
    /// Start walking from `start`
    pub fn new(arena: &'a NodeArena, start: NodeId) -> Self {
        Self {
            arena,
            current: start,
        }
    }
}

impl Iterator for Ancestors<'_> {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        let parent = self.arena.parent(self.current)?;
        let step = Step {
            child: self.current,
            parent,
            sibling: self.arena.sibling(self.current),
        };
        self.current = parent;
        Some(step)
    }
}
