//! Keyed-collection alignment (§4.5): `MappingNode` and
//! `FixedKeyMappingNode` both reduce to the same bipartite matcher as
//! `MultiSetNode`, but over `KeyValuePairNode`s, with compatibility
//! constrained by whether key edits are allowed:
//!
//! - `allow_key_edits = true` (`MappingNode`, subject also to
//!   `settings.allow_key_edits`): any pair may match any other; the
//!   match cost is `KeyValuePairEdit`'s key-edit cost plus value-edit
//!   cost.
//! - `allow_key_edits = false` (`FixedKeyMappingNode`, or a
//!   `MappingNode` under `settings.allow_key_edits = false`): a pair may
//!   only match another pair with a structurally equal key.

use std::cell::RefCell;
use std::rc::Rc;

use crate::bounded::Bounded;
use crate::range::Range;
use crate::settings::DiffSettings;
use crate::tree::{KeyValuePairNode, TreeNode};

use super::bipartite::{BipartiteMatcher, Pairing};
use super::{compute_edit, full_replace, Edit};

/// The edit between two `KeyValuePairNode`s: a key sub-edit (free when
/// `allow_key_edits` is false, since compatibility already required
/// equal keys) plus a value sub-edit.
#[derive(Debug, Clone)]
pub struct KeyValuePairEdit {
    key_edit: Box<Edit>,
    value_edit: Box<Edit>,
}

impl KeyValuePairEdit {
    pub fn new(from: KeyValuePairNode, to: KeyValuePairNode, allow_key_edits: bool, settings: DiffSettings) -> Self {
        let key_edit = if allow_key_edits {
            compute_edit(&from.key, &to.key, &settings)
        } else {
            debug_assert!(from.key == to.key, "fixed-key mapping matched unequal keys");
            Edit::match_nodes(from.key.clone(), to.key.clone(), 0)
        };
        let value_edit = compute_edit(&from.value, &to.value, &settings);
        Self {
            key_edit: Box::new(key_edit),
            value_edit: Box::new(value_edit),
        }
    }

    pub(super) fn sub_edits(&self) -> Vec<Edit> {
        vec![(*self.key_edit).clone(), (*self.value_edit).clone()]
    }
}

impl Bounded for KeyValuePairEdit {
    fn bounds(&self) -> Range {
        self.key_edit.bounds() + self.value_edit.bounds()
    }

    fn tighten_bounds(&mut self) -> bool {
        if !self.key_edit.bounds().definitive() {
            return self.key_edit.tighten_bounds();
        }
        self.value_edit.tighten_bounds()
    }

    fn is_complete(&self) -> bool {
        self.key_edit.is_complete() && self.value_edit.is_complete()
    }
}

#[derive(Clone)]
pub struct MappingEdit {
    matcher: Rc<RefCell<BipartiteMatcher>>,
    allow_key_edits: bool,
}

impl std::fmt::Debug for MappingEdit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappingEdit").field("allow_key_edits", &self.allow_key_edits).finish_non_exhaustive()
    }
}

impl MappingEdit {
    pub fn new(
        from: Vec<KeyValuePairNode>,
        to: Vec<KeyValuePairNode>,
        mapping_allows_key_edits: bool,
        settings: DiffSettings,
    ) -> Self {
        let allow_key_edits = mapping_allows_key_edits && settings.allow_key_edits;
        let from_nodes: Vec<Rc<TreeNode>> = from.into_iter().map(|p| Rc::new(TreeNode::KeyValuePair(p))).collect();
        let to_nodes: Vec<Rc<TreeNode>> = to.into_iter().map(|p| Rc::new(TreeNode::KeyValuePair(p))).collect();
        let matcher = BipartiteMatcher::new(from_nodes, to_nodes, settings, move |a, b| {
            if allow_key_edits {
                return true;
            }
            let (TreeNode::KeyValuePair(x), TreeNode::KeyValuePair(y)) = (a, b) else {
                unreachable!("mapping matcher only ever holds KeyValuePair nodes");
            };
            x.key == y.key
        });
        Self { matcher: Rc::new(RefCell::new(matcher)), allow_key_edits }
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

impl Bounded for MappingEdit {
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
