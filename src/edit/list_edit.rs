//! Ordered-sequence alignment (§4.4): a branch-and-bound dynamic program
//! over the two lists' elements, generalising the classic Levenshtein
//! recurrence from characters to arbitrary, themselves-bounded,
//! sub-edits.
//!
//! Each cell's "match" option is not computed eagerly: it starts out as
//! a cheap `[0, total_size(a) + total_size(b)]` estimate (true without
//! inspecting either node at all) and is only promoted to a real,
//! recursively-bounded `Edit` when the cell is actually competitive for
//! the optimal alignment. Cells whose optimistic lower bound already
//! exceeds the best known upper bound for the whole alignment are left
//! at the cheap estimate forever -- the pruning the branch-and-bound
//! framing promises.

use std::rc::Rc;

use crate::bounded::Bounded;
use crate::range::Range;
use crate::settings::DiffSettings;
use crate::tree::TreeNode;

use super::{compute_edit, full_replace, Edit};

fn match_cost_edit(a: &Rc<TreeNode>, b: &Rc<TreeNode>, settings: &DiffSettings) -> Edit {
    if settings.allow_list_edit_distance {
        compute_edit(a, b, settings)
    } else if a == b {
        Edit::match_nodes(a.clone(), b.clone(), 0)
    } else {
        full_replace(a.clone(), b.clone())
    }
}

#[derive(Debug, Clone)]
pub struct ListEdit {
    from: Vec<Rc<TreeNode>>,
    to: Vec<Rc<TreeNode>>,
    settings: DiffSettings,
    /// `cells[i][j]` is the match edit between `from[i]` and `to[j]`,
    /// materialised on demand.
    cells: Vec<Vec<Option<Edit>>>,
    /// Cheap (possibly un-materialised) bound per cell, always a valid
    /// superset of the real edit's bound once one exists.
    cell_bounds: Vec<Vec<Range>>,
    remove_cost: Vec<i64>,
    insert_cost: Vec<i64>,
    dp: Vec<Vec<Range>>,
    done: bool,
    /// When `settings.allow_list_edits` is false, the aligner only ever
    /// considers the diagonal (index `i` of `from` against index `i` of
    /// `to`), degenerating into a cheap positional zip (§6).
    positional_only: bool,
}

impl ListEdit {
    pub fn new(from: Vec<Rc<TreeNode>>, to: Vec<Rc<TreeNode>>, settings: DiffSettings) -> Self {
        let m = from.len();
        let n = to.len();
        let remove_cost: Vec<i64> = from.iter().map(|x| x.total_size()).collect();
        let insert_cost: Vec<i64> = to.iter().map(|y| y.total_size()).collect();
        let cell_bounds = (0..m)
            .map(|i| (0..n).map(|j| Range::new(0, remove_cost[i] + insert_cost[j])).collect())
            .collect();
        let cells = (0..m).map(|_| (0..n).map(|_| None).collect()).collect();

        let mut edit = Self {
            positional_only: !settings.allow_list_edits,
            from,
            to,
            settings,
            cells,
            cell_bounds,
            remove_cost,
            insert_cost,
            dp: Vec::new(),
            done: false,
        };
        edit.recompute_dp();
        edit.refresh_done();
        edit
    }

    fn recompute_dp(&mut self) {
        let m = self.from.len();
        let n = self.to.len();
        let mut dp = vec![vec![Range::exact(0); n + 1]; m + 1];
        for j in 1..=n {
            dp[0][j] = Range::exact(dp[0][j - 1].lower_bound() + self.insert_cost[j - 1]);
        }
        for i in 1..=m {
            dp[i][0] = Range::exact(dp[i - 1][0].lower_bound() + self.remove_cost[i - 1]);
            for j in 1..=n {
                if self.positional_only && i != j {
                    // Positional mode only ever considers the diagonal;
                    // everything off it is reached purely through
                    // remove/insert, matching a simple zip.
                    let via_remove = dp[i - 1][j] + Range::exact(self.remove_cost[i - 1]);
                    let via_insert = dp[i][j - 1] + Range::exact(self.insert_cost[j - 1]);
                    let lower = via_remove.lower_bound().min(via_insert.lower_bound());
                    let upper = via_remove.upper_bound().min(via_insert.upper_bound());
                    dp[i][j] = Range::new(lower, upper);
                    continue;
                }
                let via_match = dp[i - 1][j - 1] + self.cell_bounds[i - 1][j - 1];
                let via_remove = dp[i - 1][j] + Range::exact(self.remove_cost[i - 1]);
                let via_insert = dp[i][j - 1] + Range::exact(self.insert_cost[j - 1]);
                let lower = via_match.lower_bound().min(via_remove.lower_bound()).min(via_insert.lower_bound());
                let upper = via_match.upper_bound().min(via_remove.upper_bound()).min(via_insert.upper_bound());
                dp[i][j] = Range::new(lower, upper);
            }
        }
        self.dp = dp;
    }

    fn refresh_done(&mut self) {
        let m = self.from.len();
        let n = self.to.len();
        self.done = self.dp[m][n].definitive()
            && self
                .cells
                .iter()
                .flatten()
                .all(|c| c.as_ref().is_none_or(Bounded::is_complete));
    }

    /// Finds the next cell worth spending a unit of work on: the first
    /// (row-major) non-definitive, non-dominated cell. Dominated cells
    /// (whose cheapest possible contribution already loses to the best
    /// known total) are skipped for good.
    fn next_worthwhile_cell(&self) -> Option<(usize, usize)> {
        let m = self.from.len();
        let n = self.to.len();
        let global_upper = self.dp[m][n].upper_bound();
        for i in 0..m {
            for j in 0..n {
                let bound = self.cell_bounds[i][j];
                if bound.definitive() {
                    continue;
                }
                let via_match_lower = self.dp[i][j].lower_bound() + bound.lower_bound();
                if via_match_lower > global_upper {
                    log::trace!("list aligner: pruning dominated cell ({i}, {j})");
                    continue; // dominated: never worth refining further
                }
                return Some((i, j));
            }
        }
        None
    }

    fn refine_cell(&mut self, i: usize, j: usize) {
        match &mut self.cells[i][j] {
            Some(edit) => {
                edit.tighten_bounds();
                self.cell_bounds[i][j] = edit.bounds();
            }
            None => {
                let edit = match_cost_edit(&self.from[i], &self.to[j], &self.settings);
                self.cell_bounds[i][j] = edit.bounds();
                self.cells[i][j] = Some(edit);
            }
        }
    }

    /// Reconstructs the optimal alignment once `dp[m][n]` is definitive.
    pub fn alignment(&self) -> Vec<AlignOp> {
        debug_assert!(self.done, "alignment() called before ListEdit converged");
        let mut i = self.from.len();
        let mut j = self.to.len();
        let mut ops = Vec::new();
        while i > 0 || j > 0 {
            if i > 0 && j > 0 {
                let via_match = self.dp[i - 1][j - 1].lower_bound() + self.cell_bounds[i - 1][j - 1].lower_bound();
                if via_match == self.dp[i][j].lower_bound() {
                    ops.push(AlignOp::Match(i - 1, j - 1));
                    i -= 1;
                    j -= 1;
                    continue;
                }
            }
            if i > 0 && self.dp[i - 1][j].lower_bound() + self.remove_cost[i - 1] == self.dp[i][j].lower_bound() {
                ops.push(AlignOp::Remove(i - 1));
                i -= 1;
            } else {
                ops.push(AlignOp::Insert(j - 1));
                j -= 1;
            }
        }
        ops.reverse();
        ops
    }

    pub(super) fn sub_edits(&self) -> Vec<Edit> {
        if !self.done {
            return Vec::new();
        }
        self.alignment()
            .into_iter()
            .map(|op| match op {
                AlignOp::Match(i, j) => self.cells[i][j]
                    .clone()
                    .unwrap_or_else(|| match_cost_edit(&self.from[i], &self.to[j], &self.settings)),
                AlignOp::Remove(i) => Edit::remove(self.from[i].clone()),
                AlignOp::Insert(j) => {
                    let under = self.from.first().cloned().unwrap_or_else(|| self.to[j].clone());
                    Edit::insert(under, self.to[j].clone())
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub enum AlignOp {
    Match(usize, usize),
    Remove(usize),
    Insert(usize),
}

impl Bounded for ListEdit {
    fn bounds(&self) -> Range {
        let m = self.from.len();
        let n = self.to.len();
        self.dp[m][n]
    }

    fn tighten_bounds(&mut self) -> bool {
        if self.done {
            return false;
        }
        loop {
            let prev = self.bounds();
            match self.next_worthwhile_cell() {
                Some((i, j)) => self.refine_cell(i, j),
                None => {
                    self.refresh_done();
                    return false;
                }
            }
            self.recompute_dp();
            self.refresh_done();
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
