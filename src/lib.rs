//! # Scapegoat Tree
//!
//! A binary search tree that stays α-height-balanced without rotations.
//! Instead of fixing balance on every update, it occasionally rebuilds a
//! subtree from scratch.
//!
//! ## Core Algorithm
//!
//! 1. **Insert**: ordinary BST insert; if the new node lands deeper than
//!    ⌊log_{1/α}(n)⌋, climb to the *scapegoat* (the lowest ancestor whose
//!    subtree is too tall for its size) and rebuild just that subtree
//! 2. **Delete**: ordinary BST delete; if n drops below α·max_size, rebuild
//!    the whole tree
//! 3. **Rebuild**: flatten in order, then midpoint recursion gives height
//!    ⌊log2(n)⌋ + 1
//!
//! Result: height ≤ ⌊log_{1/α}(n)⌋ + 1, amortized O(log n) updates
//!
//! ## Usage Example
//!
//! ```
//! use scapegoat::ScapegoatTree;
//!
//! let mut tree = ScapegoatTree::new(0.6, 50)?;
//! tree.extend([30, 70, 20, 40, 60, 80]);
//! assert_eq!(tree.flatten(), vec![20, 30, 40, 50, 60, 70, 80]);
//! assert!(tree.delete(30));
//! assert!(tree.search(30).is_none());
//! # Ok::<(), scapegoat::ScapegoatError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod config; // α validation and tree configuration
pub mod stats; // max_size high-water mark and rebuild counters
pub mod tree; // nodes, scapegoat search, reconstruction

// Re-exports for convenience
pub use config::{Alpha, TreeConfig, DEFAULT_ALPHA};
pub use stats::{RebuildEvent, RebuildKind, RebuildStats};
pub use tree::{NodeId, NodeRef, ScapegoatTree};

use thiserror::Error;

/// Key type stored in the tree
pub type Key = i64;

/// Errors reported by tree construction and lookups
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScapegoatError {
    /// α outside [0.5, 1)
    #[error("invalid alpha value {0}: expected 0.5 <= alpha < 1")]
    InvalidAlpha(f64),

    /// Depth requested for a key the tree does not hold
    #[error("key {0} does not exist within the tree")]
    KeyNotFound(Key),

    /// Bulk construction input was not strictly ascending
    #[error("keys must be strictly ascending: {previous} followed by {next} at index {index}")]
    UnsortedKeys {
        /// Position of the offending key
        index: usize,
        /// Key before it
        previous: Key,
        /// The offending key
        next: Key,
    },
}
