//! Property-based checks for the invariants listed under "Invariants
//! (property-based)": monotone tightening, definitiveness implies
//! completeness, identity, the total-size bound, leaf sanity against a
//! reference Levenshtein computation, list alignment order preservation,
//! and the key-edit toggle.

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

use treediff::edit::compute_edit;
use treediff::tree::{KeyValuePairNode, ListNode, MappingNode, StringNode, TreeNode};
use treediff::{diff, Bounded, DiffSettings, Range};

use std::rc::Rc;

/// A small wrapper so quickcheck can generate arbitrary scalar trees
/// without us needing `Arbitrary` on `TreeNode` itself (whose `Rc`-based
/// containers don't have an obvious shrink strategy).
#[derive(Debug, Clone)]
struct ScalarTree(TreeNode);

impl Arbitrary for ScalarTree {
    fn arbitrary(g: &mut Gen) -> Self {
        let choice = u8::arbitrary(g) % 4;
        let node = match choice {
            0 => TreeNode::Integer(i64::arbitrary(g) % 1000),
            1 => TreeNode::Bool(bool::arbitrary(g)),
            2 => TreeNode::Null,
            _ => {
                let len = usize::arbitrary(g) % 8;
                let value: String = (0..len).map(|_| *g.choose(&['a', 'b', 'c', 'd']).unwrap()).collect();
                TreeNode::String(StringNode { value, quoted: false })
            }
        };
        Self(node)
    }
}

fn reference_levenshtein(a: &str, b: &str) -> i64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (m, n) = (a.len(), b.len());
    let mut dp = vec![vec![0i64; n + 1]; m + 1];
    for (j, row) in dp[0].iter_mut().enumerate() {
        *row = j as i64;
    }
    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i as i64;
    }
    for i in 1..=m {
        for j in 1..=n {
            dp[i][j] = if a[i - 1] == b[j - 1] {
                dp[i - 1][j - 1]
            } else {
                1 + dp[i - 1][j - 1].min(dp[i - 1][j]).min(dp[i][j - 1])
            };
        }
    }
    dp[m][n]
}

#[quickcheck]
fn monotone_tightening_is_a_descending_chain_of_intervals(a: ScalarTree, b: ScalarTree) -> bool {
    let mut edit = compute_edit(&Rc::new(a.0), &Rc::new(b.0), &DiffSettings::default());
    let mut prev = edit.bounds();
    loop {
        if !edit.tighten_bounds() {
            break;
        }
        let next = edit.bounds();
        if !prev.subsumes(&next) {
            return false;
        }
        prev = next;
    }
    true
}

#[quickcheck]
fn definitive_bounds_never_tighten_again(a: ScalarTree, b: ScalarTree) -> bool {
    let mut edit = compute_edit(&Rc::new(a.0), &Rc::new(b.0), &DiffSettings::default());
    while edit.tighten_bounds() {}
    if !edit.bounds().definitive() {
        return true; // not reached for scalar leaves, but don't fail spuriously
    }
    !edit.tighten_bounds() && !edit.tighten_bounds()
}

#[quickcheck]
fn identity_diff_costs_nothing(a: ScalarTree) -> bool {
    let node = Rc::new(a.0);
    diff(node.clone(), node, &DiffSettings::default()).unwrap().bounds() == Range::exact(0)
}

#[quickcheck]
fn cost_never_exceeds_total_size(a: ScalarTree, b: ScalarTree) -> bool {
    let from = Rc::new(a.0);
    let to = Rc::new(b.0);
    let bound = from.total_size() + to.total_size();
    let edit = diff(from, to, &DiffSettings::default()).unwrap();
    edit.bounds().upper_bound() <= bound
}

#[quickcheck]
fn string_leaf_cost_matches_reference_levenshtein(a: String, b: String) -> bool {
    // Keep inputs small so the reference computation and the incremental
    // one both terminate quickly under quickcheck's default iteration count.
    let a: String = a.chars().take(12).collect();
    let b: String = b.chars().take(12).collect();
    let from = Rc::new(TreeNode::String(StringNode { value: a.clone(), quoted: false }));
    let to = Rc::new(TreeNode::String(StringNode { value: b.clone(), quoted: false }));
    let edit = diff(from, to, &DiffSettings::default()).unwrap();
    edit.bounds() == Range::exact(reference_levenshtein(&a, &b))
}

#[test]
fn list_alignment_preserves_relative_order_of_matches() {
    let from = ListNode::new(vec![
        leaf_int(0),
        leaf_str("a"),
        leaf_int(1),
        leaf_str("b"),
        leaf_int(2),
    ]);
    let to = ListNode::new(vec![leaf_str("a"), leaf_str("x"), leaf_str("b")]);
    let edit = diff(
        Rc::new(TreeNode::List(from)),
        Rc::new(TreeNode::List(to)),
        &DiffSettings::default(),
    )
    .unwrap();

    let mut last_i = None;
    let mut last_j = None;
    let mut i = 0usize;
    let mut j = 0usize;
    for sub in edit.sub_edits() {
        if sub.is_match() {
            if let Some(li) = last_i {
                assert!(i > li, "match indices on the left must increase");
            }
            if let Some(lj) = last_j {
                assert!(j > lj, "match indices on the right must increase");
            }
            last_i = Some(i);
            last_j = Some(j);
            i += 1;
            j += 1;
        } else if sub.is_remove() {
            i += 1;
        } else if sub.is_insert() {
            j += 1;
        }
    }
}

#[test]
fn forbidding_key_edits_pays_full_remove_and_insert_instead() {
    let from = vec![kv("a", 1), kv("b", 2)];
    let to = vec![kv("a", 1), kv("c", 2)];
    let mapping_from = Rc::new(TreeNode::FixedKeyMapping(MappingNode::new(from).unwrap()));
    let mapping_to = Rc::new(TreeNode::FixedKeyMapping(MappingNode::new(to).unwrap()));
    let edit = diff(mapping_from, mapping_to, &DiffSettings::default()).unwrap();

    // "a" matches for free; "b" is removed and "c" is inserted wholesale
    // (key + value, 1 + 1 each), since a fixed-key mapping never pairs
    // differing keys regardless of `allow_key_edits`.
    assert_eq!(edit.bounds(), Range::exact(4));
}

fn leaf_int(v: i64) -> Rc<TreeNode> {
    Rc::new(TreeNode::Integer(v))
}

fn leaf_str(v: &str) -> Rc<TreeNode> {
    Rc::new(TreeNode::String(StringNode {
        value: v.to_string(),
        quoted: false,
    }))
}

fn kv(key: &str, value: i64) -> KeyValuePairNode {
    KeyValuePairNode::new(
        Rc::new(TreeNode::String(StringNode {
            value: key.to_string(),
            quoted: true,
        })),
        Rc::new(TreeNode::Integer(value)),
    )
}
