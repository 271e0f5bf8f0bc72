//! Property-based invariant tests for checkbox tree synchronization.
//!
//! For arbitrary sequences of toggles and clears over a fixed tree:
//!
//! 1. A materialized node is `Selected` exactly when its id is selected.
//! 2. The selected set never holds duplicates.
//! 3. Checking a node checks every descendant; unchecking unchecks them.
//! 4. `clear_values` twice equals `clear_values` once.
//! 5. A subtree load never changes the selected set.

use std::collections::HashSet;

use proptest::prelude::*;
use vtree_widgets::{CheckState, CheckboxTreeSync, NodeDescriptor, ToggleOutcome};

// ── Helpers ─────────────────────────────────────────────────────────────

const IDS: [&str; 10] = ["a", "a1", "a1x", "a1y", "a2", "b", "b1", "b2", "b2x", "c"];

fn d(id: &str) -> NodeDescriptor {
    NodeDescriptor::new(id, id)
}

fn descriptors() -> Vec<NodeDescriptor> {
    vec![
        d("a")
            .child(d("a1").child(d("a1x")).child(d("a1y").with_class("complete")))
            .child(d("a2").with_class("complete")),
        d("b").child(d("b1")).child(d("b2").child(d("b2x"))),
        d("c"),
    ]
}

fn loaded(seed: &[&str]) -> CheckboxTreeSync {
    let mut tree = CheckboxTreeSync::new("/json").with_selection(seed.iter().copied());
    tree.on_subtree_loaded("root", descriptors())
        .expect("fixture tree loads");
    tree
}

#[derive(Debug, Clone)]
enum Op {
    Toggle(usize, bool),
    Clear,
}

fn ops() -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(
        prop_oneof![
            8 => (0..IDS.len(), any::<bool>()).prop_map(|(i, checked)| Op::Toggle(i, checked)),
            1 => Just(Op::Clear),
        ],
        0..40,
    )
}

fn apply(tree: &mut CheckboxTreeSync, op: &Op) {
    match *op {
        Op::Toggle(i, checked) => {
            tree.on_toggle(IDS[i], checked).expect("fixture node exists");
        }
        Op::Clear => {
            tree.clear_values();
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1 + 2. Consistency and uniqueness after every operation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn selected_state_matches_set(ops in ops()) {
        let mut tree = loaded(&[]);
        for op in &ops {
            apply(&mut tree, op);
            prop_assert!(tree.is_consistent(), "inconsistent after {:?}", op);

            let unique: HashSet<&str> =
                tree.selected_values().iter().map(|id| id.as_str()).collect();
            prop_assert_eq!(unique.len(), tree.selected_values().len());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Cascade reaches every descendant
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn cascade_reaches_descendants(ops in ops(), target in 0..IDS.len(), checked in any::<bool>()) {
        let mut tree = loaded(&[]);
        for op in &ops {
            apply(&mut tree, op);
        }
        let id = IDS[target];
        if tree.on_toggle(id, checked).expect("fixture node exists") == ToggleOutcome::Ignored {
            return Ok(());
        }
        prop_assert_eq!(tree.node(id).expect("node").is_checked(), checked);
        for descendant in tree.descendants(id) {
            let node = tree.node(descendant.as_str()).expect("descendant");
            prop_assert_eq!(node.is_checked(), checked, "descendant {}", descendant);
            if !checked {
                prop_assert!(!node.is_disabled());
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Clear is idempotent
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn clear_is_idempotent(ops in ops()) {
        let mut tree = loaded(&[]);
        for op in &ops {
            apply(&mut tree, op);
        }
        tree.clear_values();
        let once: Vec<(CheckState, bool)> = IDS
            .iter()
            .map(|id| tree.node(id).map(|n| (n.state(), n.is_disabled())).expect("node"))
            .collect();
        prop_assert!(!tree.clear_values());
        let twice: Vec<(CheckState, bool)> = IDS
            .iter()
            .map(|id| tree.node(id).map(|n| (n.state(), n.is_disabled())).expect("node"))
            .collect();
        prop_assert_eq!(once, twice);
        prop_assert!(tree.selected_values().is_empty());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Loads only read the selection
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn load_does_not_mutate_selection(
        seed in proptest::sample::subsequence(IDS.to_vec(), 0..IDS.len()),
        extra in proptest::collection::vec("[p-z]{1,3}", 0..4),
    ) {
        let mut seeded: Vec<&str> = seed.clone();
        seeded.extend(extra.iter().map(String::as_str));
        let tree = loaded(&seeded);

        let expected: Vec<&str> = {
            let mut seen = HashSet::new();
            seeded.iter().copied().filter(|id| seen.insert(*id)).collect()
        };
        let actual: Vec<&str> = tree.selected_values().iter().map(|id| id.as_str()).collect();
        prop_assert_eq!(actual, expected);

        for id in IDS {
            let node = tree.node(id).expect("node");
            prop_assert_eq!(node.is_checked(), seed.contains(&id));
        }
        prop_assert!(tree.is_consistent());
    }
}

// ── Reachability rule ───────────────────────────────────────────────────

#[test]
fn check_below_unchecked_parent_is_not_recorded() {
    let mut tree = loaded(&[]);
    let outcome = tree.on_toggle("b2", true).expect("b2 exists");
    assert!(!outcome.changed());
    assert!(tree.node("b2").expect("b2").is_checked());
    assert!(tree.node("b2x").expect("b2x").is_checked());
    assert!(tree.selected_values().is_empty());
}
