//! Shared best-first bipartite matcher (§4.5), used by both
//! [`super::MultiSetEdit`] and [`super::MappingEdit`]: unordered
//! collections where every left element may pair with any *compatible*
//! right element (compatibility is the one thing that differs between
//! the two: a `MultiSet` allows anything to pair with anything, a
//! `FixedKeyMapping` only allows pairing entries with structurally equal
//! keys).
//!
//! The frontier is a priority queue of partial assignments, ordered by
//! summed lower bound, exactly as §4.5 describes: "the frontier stores
//! partial assignments ordered by summed lower bound; when the front is
//! non-definitive, tighten its weakest sub-edit and reinsert." Every
//! partial assignment decides the fate of `left` elements in a fixed
//! order (index 0, 1, 2, ...); each step either pairs the next left
//! element with an unused right element or leaves it unmatched
//! (`Remove`). Once an assignment has decided every left element, the
//! unused right elements are implicitly `Insert`s, and their (exact)
//! cost is folded in by [`BipartiteMatcher::total_for`] rather than
//! tracked per-state.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;

use rustc_hash::FxHashSet;

use crate::bounded::Bounded;
use crate::range::Range;
use crate::settings::DiffSettings;
use crate::tree::TreeNode;

use super::Edit;

/// How a left element was resolved in a particular partial assignment.
#[derive(Debug, Clone, Copy)]
pub enum Pairing {
    Matched(usize),
    Removed,
}

/// A partial (or, once `decided.len() == left.len()`, complete)
/// assignment. `lower`/`upper` cover only the decided steps so far; the
/// cost of inserting whatever is left unused on the right is added
/// separately by [`BipartiteMatcher::total_for`], since it depends only
/// on `used_right` and never needs its own sub-edit.
#[derive(Debug, Clone)]
struct State {
    decided: Vec<Pairing>,
    used_right: FxHashSet<usize>,
    lower: i64,
    upper: i64,
    seq: u64,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.lower == other.lower && self.seq == other.seq
    }
}
impl Eq for State {}

impl Ord for State {
    /// Reversed so `BinaryHeap` (a max-heap) pops the *lowest* lower
    /// bound first, with insertion order breaking ties deterministically.
    fn cmp(&self, other: &Self) -> Ordering {
        other.lower.cmp(&self.lower).then_with(|| other.seq.cmp(&self.seq))
    }
}
impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub struct BipartiteMatcher {
    left: Vec<Rc<TreeNode>>,
    right: Vec<Rc<TreeNode>>,
    left_cost: Vec<i64>,
    right_cost: Vec<i64>,
    /// `compatible[i][j]`: may `left[i]` pair with `right[j]` at all?
    /// (`FixedKeyMapping` uses this to forbid key edits.)
    compatible: Vec<Vec<bool>>,
    settings: DiffSettings,
    pair_cache: rustc_hash::FxHashMap<(usize, usize), Edit>,
    pair_bound: rustc_hash::FxHashMap<(usize, usize), Range>,
    heap: BinaryHeap<State>,
    best: Option<State>,
    best_upper: i64,
    next_seq: u64,
    done: bool,
}

impl BipartiteMatcher {
    pub fn new(
        left: Vec<Rc<TreeNode>>,
        right: Vec<Rc<TreeNode>>,
        settings: DiffSettings,
        compatible: impl Fn(&TreeNode, &TreeNode) -> bool,
    ) -> Self {
        let left_cost: Vec<i64> = left.iter().map(TreeNode::total_size).collect();
        let right_cost: Vec<i64> = right.iter().map(TreeNode::total_size).collect();
        let compatible_table: Vec<Vec<bool>> = left
            .iter()
            .map(|l| right.iter().map(|r| compatible(l, r)).collect())
            .collect();
        let worst_case_upper = left_cost.iter().sum::<i64>() + right_cost.iter().sum::<i64>();

        let mut matcher = Self {
            left,
            right,
            left_cost,
            right_cost,
            compatible: compatible_table,
            settings,
            pair_cache: rustc_hash::FxHashMap::default(),
            pair_bound: rustc_hash::FxHashMap::default(),
            heap: BinaryHeap::new(),
            best: None,
            best_upper: worst_case_upper,
            next_seq: 0,
            done: false,
        };
        let root = State {
            decided: Vec::new(),
            used_right: FxHashSet::default(),
            lower: 0,
            upper: worst_case_upper,
            seq: matcher.take_seq(),
        };
        matcher.heap.push(root);
        if matcher.left.is_empty() {
            matcher.finish_with_root();
        }
        matcher
    }

    fn finish_with_root(&mut self) {
        let top = self.heap.pop().expect("root always pushed");
        self.best = Some(top);
        self.done = true;
    }

    fn take_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn cheap_pair_bound(&self, i: usize, j: usize) -> Range {
        *self
            .pair_bound
            .get(&(i, j))
            .unwrap_or(&Range::new(0, self.left_cost[i] + self.right_cost[j]))
    }

    /// The exact cost of inserting whatever right elements `used_right`
    /// leaves untouched.
    fn leftover_insert_cost(&self, used_right: &FxHashSet<usize>) -> i64 {
        self.right_cost
            .iter()
            .enumerate()
            .filter(|(j, _)| !used_right.contains(j))
            .map(|(_, c)| *c)
            .sum()
    }

    /// The true `[lower, upper]` for a state, decided steps plus the
    /// exact leftover-insert cost. Valid at any point in the search, not
    /// just once a state is complete.
    fn total_for(&self, state: &State) -> Range {
        let leftover = self.leftover_insert_cost(&state.used_right);
        Range::new(state.lower + leftover, state.upper + leftover)
    }

    fn expand(&mut self, state: &State) {
        let next = state.decided.len();

        for j in 0..self.right.len() {
            if state.used_right.contains(&j) || !self.compatible[next][j] {
                continue;
            }
            let bound = self.cheap_pair_bound(next, j);
            let mut used_right = state.used_right.clone();
            used_right.insert(j);
            let mut decided = state.decided.clone();
            decided.push(Pairing::Matched(j));
            let seq = self.take_seq();
            self.heap.push(State {
                decided,
                used_right,
                lower: state.lower + bound.lower_bound(),
                upper: state.upper.min(state.lower + bound.upper_bound()),
                seq,
            });
        }

        // "Remove" option: left[next] stays unmatched.
        let mut decided = state.decided.clone();
        decided.push(Pairing::Removed);
        let added = self.left_cost[next];
        let seq = self.take_seq();
        self.heap.push(State {
            decided,
            used_right: state.used_right.clone(),
            lower: state.lower + added,
            upper: state.upper.min(state.lower + added),
            seq,
        });
    }

    /// Recomputes `state.lower`/`state.upper` from scratch against the
    /// current `pair_bound` cache. Needed after [`Self::refine_weakest`]
    /// narrows a pairing that was decided earlier than the state's last
    /// step: the incremental bookkeeping done at push time can otherwise
    /// go stale.
    fn recompute_state_bounds(&self, state: &mut State) {
        let mut lower = 0i64;
        let mut upper = 0i64;
        for (i, pairing) in state.decided.iter().enumerate() {
            match pairing {
                Pairing::Matched(j) => {
                    let bound = self.cheap_pair_bound(i, *j);
                    lower += bound.lower_bound();
                    upper += bound.upper_bound();
                }
                Pairing::Removed => {
                    lower += self.left_cost[i];
                    upper += self.left_cost[i];
                }
            }
        }
        state.lower = lower;
        state.upper = upper;
    }

    /// Tightens the least-precise matched pairing in `state`. Returns
    /// whether its bound actually changed (not whether the underlying
    /// edit's own `tighten_bounds` reported progress: an edit that was
    /// definitive the moment it was materialized still narrows the cheap
    /// placeholder bound from its first tighten).
    fn refine_weakest(&mut self, state: &State) -> bool {
        let mut worst: Option<(usize, usize, i64)> = None;
        for (i, pairing) in state.decided.iter().enumerate() {
            if let Pairing::Matched(j) = pairing {
                let bound = self.cheap_pair_bound(i, *j);
                if !bound.definitive() {
                    let width = bound.upper_bound() - bound.lower_bound();
                    if worst.is_none_or(|(_, _, w)| width > w) {
                        worst = Some((i, *j, width));
                    }
                }
            }
        }
        let Some((i, j, _)) = worst else { return false };
        let before = self.cheap_pair_bound(i, j);
        let settings = self.settings;
        let edit = self
            .pair_cache
            .entry((i, j))
            .or_insert_with(|| super::compute_edit(&self.left[i], &self.right[j], &settings));
        edit.tighten_bounds();
        let after = edit.bounds();
        self.pair_bound.insert((i, j), after);
        before != after
    }

    pub fn materialized_edit(&self, i: usize, j: usize) -> Option<&Edit> {
        self.pair_cache.get(&(i, j))
    }

    pub fn best_assignment(&self) -> Option<&[Pairing]> {
        self.best.as_ref().map(|s| s.decided.as_slice())
    }

    pub fn left(&self) -> &[Rc<TreeNode>] {
        &self.left
    }

    pub fn right(&self) -> &[Rc<TreeNode>] {
        &self.right
    }
}

impl Bounded for BipartiteMatcher {
    fn bounds(&self) -> Range {
        if let Some(best) = &self.best {
            return self.total_for(best);
        }
        let peek_lower = self.heap.peek().map_or(0, |s| self.total_for(s).lower_bound());
        Range::new(peek_lower, self.best_upper)
    }

    fn tighten_bounds(&mut self) -> bool {
        if self.done {
            return false;
        }
        loop {
            let prev = self.bounds();
            let Some(mut top) = self.heap.pop() else {
                self.done = true;
                return prev != self.bounds();
            };
            if self.total_for(&top).lower_bound() > self.best_upper {
                log::trace!("bipartite matcher: dropping dominated partial assignment ({} decided)", top.decided.len());
                continue; // dominated: drop without expanding or refining further
            }
            if top.decided.len() == self.left.len() {
                let total = self.total_for(&top);
                self.best_upper = self.best_upper.min(total.upper_bound());
                if total.definitive() {
                    self.best = Some(top);
                    self.done = true;
                } else {
                    let changed = self.refine_weakest(&top);
                    self.recompute_state_bounds(&mut top);
                    if changed {
                        self.heap.push(top);
                    } else {
                        // No sub-edit left to refine but not definitive: the
                        // remaining width is purely from un-materialized
                        // cheap bounds already at their tightest; accept.
                        self.best = Some(top);
                        self.done = true;
                    }
                }
            } else {
                self.expand(&top);
            }
            if self.bounds() != prev {
                return true;
            }
            if self.done {
                return false;
            }
        }
    }

    fn is_complete(&self) -> bool {
        self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::StringNode;

    fn s(v: &str) -> Rc<TreeNode> {
        Rc::new(TreeNode::String(StringNode {
            value: v.to_string(),
            quoted: false,
        }))
    }

    fn run(matcher: &mut BipartiteMatcher) {
        while matcher.tighten_bounds() {}
    }

    #[test]
    fn identical_sets_match_for_free() {
        let left = vec![s("a"), s("b")];
        let right = vec![s("b"), s("a")];
        let mut m = BipartiteMatcher::new(left, right, DiffSettings::default(), |_, _| true);
        run(&mut m);
        assert_eq!(m.bounds(), Range::exact(0));
    }

    #[test]
    fn extra_right_element_is_inserted() {
        let left = vec![s("a")];
        let right = vec![s("a"), s("extra")];
        let mut m = BipartiteMatcher::new(left, right, DiffSettings::default(), |_, _| true);
        run(&mut m);
        assert_eq!(m.bounds(), Range::exact(5)); // "extra" has 5 chars
    }

    #[test]
    fn incompatible_pairs_are_never_matched() {
        let left = vec![s("k1")];
        let right = vec![s("k2")];
        let mut m = BipartiteMatcher::new(left, right, DiffSettings::default(), |_, _| false);
        run(&mut m);
        // forced to remove k1 (cost 2) and insert k2 (cost 2)
        assert_eq!(m.bounds(), Range::exact(4));
    }
}
