//! Property tests over random insert/delete sequences

mod common;

use std::collections::BTreeSet;

use common::assert_invariants;
use proptest::prelude::*;
use scapegoat::{ScapegoatTree, TreeConfig};

#[derive(Debug, Clone)]
enum Op {
    Insert(i64),
    Delete(i64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (-500i64..500).prop_map(Op::Insert),
        2 => (-500i64..500).prop_map(Op::Delete),
    ]
}

fn alpha() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.5), Just(0.6), Just(0.75), 0.5f64..0.99]
}

proptest! {
    #[test]
    fn tree_matches_btreeset_and_stays_balanced(
        alpha in alpha(),
        first in -500i64..500,
        ops in proptest::collection::vec(op(), 0..200),
    ) {
        let mut tree = ScapegoatTree::new(alpha, first).expect("alpha in range");
        let mut model = BTreeSet::from([first]);

        for op in ops {
            match op {
                Op::Insert(key) => {
                    tree.insert(key);
                    model.insert(key);
                }
                Op::Delete(key) => {
                    let was_empty = model.is_empty();
                    prop_assert_eq!(tree.delete(key), !was_empty);
                    model.remove(&key);
                    prop_assert!(tree.search(key).is_none());
                }
            }
            assert_invariants(&tree);
            prop_assert_eq!(tree.flatten(), model.iter().copied().collect::<Vec<_>>());
        }
    }

    #[test]
    fn duplicate_insert_leaves_tree_unchanged(
        keys in proptest::collection::vec(-100i64..100, 1..60),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut tree = common::tree_from(0.6, &keys);
        let before = tree.flatten();
        let duplicate = keys[pick.index(keys.len())];

        tree.insert(duplicate);
        prop_assert_eq!(tree.size(), before.len());
        prop_assert_eq!(tree.flatten(), before);
    }

    #[test]
    fn delete_shrinks_size_by_one_when_present(
        keys in proptest::collection::vec(-100i64..100, 1..60),
        target in -100i64..100,
    ) {
        let mut tree = common::tree_from(0.7, &keys);
        let present = tree.contains(target);
        let size_before = tree.size();

        prop_assert!(tree.delete(target));
        prop_assert!(tree.search(target).is_none());
        let expected = if present { size_before - 1 } else { size_before };
        prop_assert_eq!(tree.size(), expected);
    }

    #[test]
    fn flatten_and_rebuild_round_trip(
        keys in proptest::collection::btree_set(-1000i64..1000, 0..300),
    ) {
        let sorted: Vec<i64> = keys.into_iter().collect();
        let tree = ScapegoatTree::from_sorted(&TreeConfig::new(), &sorted).expect("sorted input");
        let flattened = tree.flatten();
        prop_assert_eq!(&flattened, &sorted);

        let again = ScapegoatTree::from_sorted(&TreeConfig::new(), &flattened).expect("sorted input");
        prop_assert_eq!(again.flatten(), sorted.clone());
        let n = sorted.len();
        let log2_bound = if n == 0 { 0 } else { n.ilog2() as usize + 1 };
        prop_assert!(again.height() <= log2_bound);
    }
}
