//! Edit primitives and their dispatch (§4.2, §4.6, §4.7).
//!
//! Mirrors `graphtage/tree.py`'s `Edit` hierarchy (`Match`, `Remove`,
//! `Insert`, `CompoundEdit` and friends) the same way [`crate::tree`]
//! mirrors its `TreeNode` hierarchy: one closed enum instead of open
//! subclassing, matched exhaustively wherever behaviour varies by kind.

mod bipartite;
mod list_edit;
mod mapping_edit;
mod multiset_edit;
mod string_edit;
mod xml_edit;

pub use list_edit::ListEdit;
pub use mapping_edit::{KeyValuePairEdit, MappingEdit};
pub use multiset_edit::MultiSetEdit;
pub use string_edit::{CharOp, StringEdit};
pub use xml_edit::XmlElementEdit;

use std::rc::Rc;

use crate::bounded::Bounded;
use crate::range::Range;
use crate::settings::DiffSettings;
use crate::tree::TreeNode;

/// A single step (or compound sub-tree of steps) in an edit script.
///
/// Every edit carries the node it originated from, the node it produced
/// (when there is one), and a `valid` flag the driver clears to cancel
/// work in flight (§5). `kind` holds the variant-specific state and
/// [`Bounded`] behaviour.
#[derive(Debug, Clone)]
pub struct Edit {
    pub from_node: Rc<TreeNode>,
    pub to_node: Option<Rc<TreeNode>>,
    valid: bool,
    kind: EditKind,
}

#[derive(Debug, Clone)]
enum EditKind {
    /// Two nodes correspond to one another; `cost` is the (possibly
    /// nonzero, for differing leaves) price of that correspondence.
    Match { cost: i64 },
    /// `from_node` is present only on the left side.
    Remove,
    /// `to_node` is present only on the right side (stored in
    /// `Edit::to_node`; `from_node` is a placeholder matching the
    /// container the insertion happens under, per `edits()` dispatch).
    Insert,
    /// A generic ordered bundle of sub-edits whose bound is always the
    /// plain sum of its children's bounds (§4.2). Used as the top level
    /// "this is actually N independent changes" wrapper; the specialised
    /// compounds below have their own, cheaper-than-naive-sum bookkeeping.
    Compound(Vec<Edit>),
    String(StringEdit),
    List(ListEdit),
    MultiSet(MultiSetEdit),
    Mapping(MappingEdit),
    KeyValuePair(KeyValuePairEdit),
    XmlElement(XmlElementEdit),
}

impl Edit {
    pub fn match_nodes(from: Rc<TreeNode>, to: Rc<TreeNode>, cost: i64) -> Self {
        Self {
            from_node: from,
            to_node: Some(to),
            valid: true,
            kind: EditKind::Match { cost },
        }
    }

    pub fn remove(node: Rc<TreeNode>) -> Self {
        Self {
            from_node: node,
            to_node: None,
            valid: true,
            kind: EditKind::Remove,
        }
    }

    pub fn insert(under: Rc<TreeNode>, node: Rc<TreeNode>) -> Self {
        Self {
            from_node: under,
            to_node: Some(node),
            valid: true,
            kind: EditKind::Insert,
        }
    }

    pub fn compound(from: Rc<TreeNode>, to: Option<Rc<TreeNode>>, sub_edits: Vec<Edit>) -> Self {
        Self {
            from_node: from,
            to_node: to,
            valid: true,
            kind: EditKind::Compound(sub_edits),
        }
    }

    pub(crate) fn from_string(from: Rc<TreeNode>, to: Rc<TreeNode>, edit: StringEdit) -> Self {
        Self {
            from_node: from,
            to_node: Some(to),
            valid: true,
            kind: EditKind::String(edit),
        }
    }

    pub(crate) fn from_list(from: Rc<TreeNode>, to: Rc<TreeNode>, edit: ListEdit) -> Self {
        Self {
            from_node: from,
            to_node: Some(to),
            valid: true,
            kind: EditKind::List(edit),
        }
    }

    pub(crate) fn from_multiset(from: Rc<TreeNode>, to: Rc<TreeNode>, edit: MultiSetEdit) -> Self {
        Self {
            from_node: from,
            to_node: Some(to),
            valid: true,
            kind: EditKind::MultiSet(edit),
        }
    }

    pub(crate) fn from_mapping(from: Rc<TreeNode>, to: Rc<TreeNode>, edit: MappingEdit) -> Self {
        Self {
            from_node: from,
            to_node: Some(to),
            valid: true,
            kind: EditKind::Mapping(edit),
        }
    }

    pub(crate) fn from_key_value_pair(
        from: Rc<TreeNode>,
        to: Rc<TreeNode>,
        edit: KeyValuePairEdit,
    ) -> Self {
        Self {
            from_node: from,
            to_node: Some(to),
            valid: true,
            kind: EditKind::KeyValuePair(edit),
        }
    }

    pub(crate) fn from_xml_element(from: Rc<TreeNode>, to: Rc<TreeNode>, edit: XmlElementEdit) -> Self {
        Self {
            from_node: from,
            to_node: Some(to),
            valid: true,
            kind: EditKind::XmlElement(edit),
        }
    }

    /// Clears `valid`, cancelling this edit and everything reachable
    /// through it. Idempotent.
    pub fn cancel(&mut self) {
        self.valid = false;
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Flattens this edit (if it is a compound of some kind) into its
    /// ordered leaf-level `Match`/`Remove`/`Insert` sub-edits, for
    /// formatters to walk. Non-compound edits return a single-element
    /// list containing a clone of themselves.
    pub fn sub_edits(&self) -> Vec<Edit> {
        match &self.kind {
            EditKind::Compound(edits) => edits.clone(),
            EditKind::String(e) => e.sub_edits(),
            EditKind::List(e) => e.sub_edits(),
            EditKind::MultiSet(e) => e.sub_edits(),
            EditKind::Mapping(e) => e.sub_edits(),
            EditKind::KeyValuePair(e) => e.sub_edits(),
            EditKind::XmlElement(e) => e.sub_edits(),
            EditKind::Match { .. } | EditKind::Remove | EditKind::Insert => vec![self.clone()],
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self.kind, EditKind::Match { .. })
    }

    pub fn is_remove(&self) -> bool {
        matches!(self.kind, EditKind::Remove)
    }

    pub fn is_insert(&self) -> bool {
        matches!(self.kind, EditKind::Insert)
    }

    /// The underlying character-level alignment, for a `Match` between two
    /// differing strings. `None` for every other edit kind, including the
    /// zero-cost `Match` produced when two strings are already equal
    /// (`compute_edit` never builds a `StringEdit` for those).
    pub fn string_edit(&self) -> Option<&StringEdit> {
        match &self.kind {
            EditKind::String(e) => Some(e),
            _ => None,
        }
    }
}

impl Bounded for Edit {
    fn bounds(&self) -> Range {
        if !self.valid {
            return Range::infinite();
        }
        match &self.kind {
            EditKind::Match { cost } => Range::exact(*cost),
            EditKind::Remove => Range::exact(self.from_node.total_size()),
            EditKind::Insert => Range::exact(
                self.to_node
                    .as_ref()
                    .expect("Insert edit always carries a to_node")
                    .total_size(),
            ),
            EditKind::Compound(edits) => edits
                .iter()
                .fold(Range::exact(0), |acc, e| acc + e.bounds()),
            EditKind::String(e) => e.bounds(),
            EditKind::List(e) => e.bounds(),
            EditKind::MultiSet(e) => e.bounds(),
            EditKind::Mapping(e) => e.bounds(),
            EditKind::KeyValuePair(e) => e.bounds(),
            EditKind::XmlElement(e) => e.bounds(),
        }
    }

    fn tighten_bounds(&mut self) -> bool {
        if !self.valid {
            return false;
        }
        match &mut self.kind {
            EditKind::Match { .. } | EditKind::Remove | EditKind::Insert => false,
            EditKind::Compound(edits) => {
                for e in edits.iter_mut() {
                    if !e.bounds().definitive() {
                        return e.tighten_bounds();
                    }
                }
                false
            }
            EditKind::String(e) => e.tighten_bounds(),
            EditKind::List(e) => e.tighten_bounds(),
            EditKind::MultiSet(e) => e.tighten_bounds(),
            EditKind::Mapping(e) => e.tighten_bounds(),
            EditKind::KeyValuePair(e) => e.tighten_bounds(),
            EditKind::XmlElement(e) => e.tighten_bounds(),
        }
    }

    fn is_complete(&self) -> bool {
        if !self.valid {
            return true;
        }
        match &self.kind {
            EditKind::Match { .. } | EditKind::Remove | EditKind::Insert => true,
            EditKind::Compound(edits) => edits.iter().all(Bounded::is_complete),
            EditKind::String(e) => e.is_complete(),
            EditKind::List(e) => e.is_complete(),
            EditKind::MultiSet(e) => e.is_complete(),
            EditKind::Mapping(e) => e.is_complete(),
            EditKind::KeyValuePair(e) => e.is_complete(),
            EditKind::XmlElement(e) => e.is_complete(),
        }
    }
}

/// Leaf-vs-leaf cost table (§4.7, resolving spec Open Question i). Both
/// nodes are known to be the same `kind_name()`.
fn leaf_cost(a: &TreeNode, b: &TreeNode) -> i64 {
    match (a, b) {
        (TreeNode::Integer(x), TreeNode::Integer(y)) => {
            // Bounded by full-replace cost, so a huge numeric delta never
            // costs more than replacing the node outright (SPEC_FULL §i).
            let delta = (x - y).unsigned_abs() as i64;
            delta.min(x.unsigned_abs().max(y.unsigned_abs()) as i64)
        }
        (TreeNode::Float(x), TreeNode::Float(y)) => {
            if x == y {
                0
            } else {
                1
            }
        }
        (TreeNode::Bool(x), TreeNode::Bool(y)) => i64::from(x != y),
        (TreeNode::Null, TreeNode::Null) => 0,
        _ => unreachable!("leaf_cost called on non-leaf or mismatched kinds"),
    }
}

/// Computes the edit between two nodes (§4.6's `edits()` dispatch table,
/// §4.7). Same variant and same shape delegates to the specialised
/// compound for that container; anything else is a full replace (a
/// `Remove` of `a` paired with an `Insert` of `b`, bundled in a generic
/// [`Edit::compound`]).
pub fn compute_edit(a: &Rc<TreeNode>, b: &Rc<TreeNode>, settings: &DiffSettings) -> Edit {
    use TreeNode::{Bool, FixedKeyMapping, Float, Integer, KeyValuePair, List, Mapping, MultiSet, Null, String, XmlElement};

    log::trace!("dispatching edits() for {} vs {}", a.kind_name(), b.kind_name());

    match (a.as_ref(), b.as_ref()) {
        (String(x), String(y)) => {
            if x.value == y.value {
                Edit::match_nodes(a.clone(), b.clone(), 0)
            } else {
                Edit::from_string(a.clone(), b.clone(), StringEdit::new(x.value.clone(), y.value.clone()))
            }
        }
        (Integer(_), Integer(_))
        | (Float(_), Float(_))
        | (Bool(_), Bool(_))
        | (Null, Null) => {
            let cost = leaf_cost(a, b);
            Edit::match_nodes(a.clone(), b.clone(), cost)
        }
        (List(x), List(y)) => {
            Edit::from_list(a.clone(), b.clone(), ListEdit::new(x.items.clone(), y.items.clone(), *settings))
        }
        (MultiSet(x), MultiSet(y)) => {
            Edit::from_multiset(a.clone(), b.clone(), MultiSetEdit::new(x.items.clone(), y.items.clone(), *settings))
        }
        (Mapping(x), Mapping(y)) => Edit::from_mapping(
            a.clone(),
            b.clone(),
            MappingEdit::new(x.pairs.clone(), y.pairs.clone(), true, *settings),
        ),
        (FixedKeyMapping(x), FixedKeyMapping(y)) => Edit::from_mapping(
            a.clone(),
            b.clone(),
            MappingEdit::new(x.pairs.clone(), y.pairs.clone(), false, *settings),
        ),
        (KeyValuePair(x), KeyValuePair(y)) => Edit::from_key_value_pair(
            a.clone(),
            b.clone(),
            KeyValuePairEdit::new(x.clone(), y.clone(), settings.allow_key_edits, *settings),
        ),
        (XmlElement(x), XmlElement(y)) => {
            Edit::from_xml_element(a.clone(), b.clone(), XmlElementEdit::new(x.clone(), y.clone(), *settings))
        }
        _ => full_replace(a.clone(), b.clone()),
    }
}

/// The fallback for two nodes with nothing better in common: remove the
/// left, insert the right. `UnsupportedComparison` is not raised here --
/// §4.7 treats a type mismatch as an expected, not exceptional, outcome
/// -- but the fallback is logged at `debug` level so a caller tuning
/// `--verbose` can see where full replaces are happening.
pub fn full_replace(a: Rc<TreeNode>, b: Rc<TreeNode>) -> Edit {
    log::debug!("falling back to full replace: {} -> {}", a.kind_name(), b.kind_name());
    let remove = Edit::remove(a.clone());
    let insert = Edit::insert(a.clone(), b.clone());
    Edit::compound(a, Some(b), vec![remove, insert])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::StringNode;

    fn int(v: i64) -> Rc<TreeNode> {
        Rc::new(TreeNode::Integer(v))
    }

    fn s(v: &str) -> Rc<TreeNode> {
        Rc::new(TreeNode::String(StringNode {
            value: v.to_string(),
            quoted: true,
        }))
    }

    #[test]
    fn matching_equal_leaves_is_free() {
        let edit = compute_edit(&int(4), &int(4), &DiffSettings::default());
        assert_eq!(edit.bounds(), Range::exact(0));
        assert!(edit.is_match());
    }

    #[test]
    fn mismatched_integers_cost_their_difference() {
        let edit = compute_edit(&int(4), &int(10), &DiffSettings::default());
        assert_eq!(edit.bounds(), Range::exact(6));
    }

    #[test]
    fn type_mismatch_falls_back_to_replace() {
        let mut edit = compute_edit(&int(1), &s("x"), &DiffSettings::default());
        while edit.tighten_bounds() {}
        assert_eq!(edit.bounds(), Range::exact(2)); // Remove(1) + Insert("x")
        assert_eq!(edit.sub_edits().len(), 2);
    }

    #[test]
    fn cancelling_reports_infinite_bounds() {
        let mut edit = compute_edit(&int(1), &int(2), &DiffSettings::default());
        edit.cancel();
        assert_eq!(edit.bounds(), Range::infinite());
        assert!(!edit.tighten_bounds());
    }
}
