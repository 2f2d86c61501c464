//! Unordered-collection alignment (§4.5), the `MultiSetNode` case: any
//! element may pair with any other, so the bipartite matcher below is
//! used with an always-true compatibility predicate.

use std::rc::Rc;

use crate::bounded::Bounded;
use crate::range::Range;
use crate::settings::DiffSettings;
use crate::tree::TreeNode;

use super::bipartite::{BipartiteMatcher, Pairing};
use super::{full_replace, Edit};

#[derive(Clone)]
pub struct MultiSetEdit {
    matcher: Rc<std::cell::RefCell<BipartiteMatcher>>,
}

impl std::fmt::Debug for MultiSetEdit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiSetEdit").finish_non_exhaustive()
    }
}

impl MultiSetEdit {
    pub fn new(from: Vec<Rc<TreeNode>>, to: Vec<Rc<TreeNode>>, settings: DiffSettings) -> Self {
        let matcher = BipartiteMatcher::new(from, to, settings, |_, _| true);
        Self {
            matcher: Rc::new(std::cell::RefCell::new(matcher)),
        }
    }

    pub(super) fn sub_edits(&self) -> Vec<Edit> {
        let matcher = self.matcher.borrow();
        let Some(assignment) = matcher.best_assignment() else {
            return Vec::new();
        };
        let mut used_right = std::collections::HashSet::new();
        let mut out = Vec::new();
        for (i, pairing) in assignment.iter().enumerate() {
            match pairing {
                Pairing::Matched(j) => {
                    used_right.insert(*j);
                    out.push(
                        matcher
                            .materialized_edit(i, *j)
                            .cloned()
                            .unwrap_or_else(|| full_replace(matcher.left()[i].clone(), matcher.right()[*j].clone())),
                    );
                }
                Pairing::Removed => out.push(Edit::remove(matcher.left()[i].clone())),
            }
        }
        let under = matcher.left().first().or_else(|| matcher.right().first()).cloned();
        for (j, node) in matcher.right().iter().enumerate() {
            if !used_right.contains(&j) {
                if let Some(under) = &under {
                    out.push(Edit::insert(under.clone(), node.clone()));
                }
            }
        }
        out
    }
}

impl Bounded for MultiSetEdit {
    fn bounds(&self) -> Range {
        self.matcher.borrow().bounds()
    }

    fn tighten_bounds(&mut self) -> bool {
        self.matcher.borrow_mut().tighten_bounds()
    }

    fn is_complete(&self) -> bool {
        self.matcher.borrow().is_complete()
    }
}
