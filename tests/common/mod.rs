//! Shared helpers for integration tests

#![allow(dead_code)]

use std::sync::Once;

use scapegoat::{Key, NodeRef, ScapegoatTree};
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Install a test subscriber once; honours `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Build a tree from `keys`, the first becoming the initial root
pub fn tree_from(alpha: f64, keys: &[Key]) -> ScapegoatTree {
    let mut tree = ScapegoatTree::new(alpha, keys[0]).expect("valid alpha");
    tree.extend(keys[1..].iter().copied());
    tree
}

/// Walk every node and check order, parent links and the height bound
pub fn assert_invariants(tree: &ScapegoatTree) {
    let keys = tree.flatten();
    assert!(
        keys.windows(2).all(|pair| pair[0] < pair[1]),
        "in-order keys not strictly ascending: {:?}",
        keys
    );
    assert_eq!(keys.len(), tree.size());

    if let Some(root) = tree.root() {
        assert!(root.parent().is_none(), "root {} has a parent", root);
        check_links(root);
    }

    let bound = tree.alpha().height_bound(tree.size());
    assert!(
        tree.height() <= bound,
        "height {} exceeds alpha bound {} for size {}",
        tree.height(),
        bound,
        tree.size()
    );
}

fn check_links(node: NodeRef<'_>) {
    for child in [node.left(), node.right()].into_iter().flatten() {
        let parent = child.parent().expect("child has parent");
        assert_eq!(parent.id(), node.id(), "child {} points at wrong parent", child);
        check_links(child);
    }
}
