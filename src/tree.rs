//! The tree model (§3): tagged variants standing in for what the original
//! Graphtage implementation expressed as a class hierarchy (`TreeNode`
//! subclasses in `graphtage/tree.py`). Rust has no open subtyping story
//! that fits a closed, exhaustively-matched set of shapes nearly as well
//! as an enum, so the class hierarchy collapses into one.
//!
//! Nodes are immutable and shared via `Rc` rather than arena-allocated
//! with a borrowed lifetime (contrast `mergiraf::ast::AstNode<'a>`, which
//! borrows spans out of the source text it parsed). Our nodes own every
//! byte of their data -- there is no source buffer to borrow from -- so an
//! arena would add lifetime plumbing for no matching benefit; `Rc`
//! sharing gives the same cheap-clone, identity-comparable node handles
//! without it.

use std::fmt;
use std::rc::Rc;

/// A node in one of the two trees being compared.
///
/// Leaves carry a scalar value; containers carry child nodes. Every
/// variant is weighed by [`TreeNode::total_size`], the unit the engine
/// uses to cost a `Remove` or `Insert` (§3, §4.2).
#[derive(Debug, Clone)]
pub enum TreeNode {
    Integer(i64),
    Float(OrderedFloat),
    Bool(bool),
    Null,
    String(StringNode),
    List(ListNode),
    MultiSet(MultiSetNode),
    Mapping(MappingNode),
    FixedKeyMapping(MappingNode),
    KeyValuePair(KeyValuePairNode),
    /// A tag, attribute mapping, optional text leaf, and ordered list of
    /// children, modelling the XML element shape that `xml.py`'s
    /// `XMLElement` built directly atop Graphtage's dict/list primitives.
    /// Kept as its own variant (rather than a bare `Mapping`-of-parts)
    /// because its edit cost composes its four parts in a fixed, named
    /// order rather than by generic key/value matching.
    XmlElement(XmlElementNode),
}

/// Wrapper giving `f64` the total ordering and `Eq` the rest of the tree
/// model assumes. NaN is rejected at construction; every other value
/// compares and hashes bit-for-bit, which is sufficient here since floats
/// are always compared for exact equality (content diffing, not numeric
/// tolerance).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderedFloat(f64);

impl OrderedFloat {
    /// Rejects NaN, since it has no total order and would break the `Eq`
    /// this type exists to provide.
    pub fn new(value: f64) -> Result<Self, crate::error::TreeDiffError> {
        if value.is_nan() {
            return Err(crate::error::TreeDiffError::Invariant("float node cannot be NaN".to_string()));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Eq for OrderedFloat {}

impl fmt::Display for OrderedFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct StringNode {
    pub value: String,
    /// Whether the source spelled this as a quoted string literal, kept
    /// only so printers can round-trip quoting style; never affects
    /// equality or cost.
    pub quoted: bool,
}

#[derive(Debug, Clone)]
pub struct ListNode {
    pub items: Vec<Rc<TreeNode>>,
}

#[derive(Debug, Clone)]
pub struct MultiSetNode {
    pub items: Vec<Rc<TreeNode>>,
}

#[derive(Debug, Clone)]
pub struct MappingNode {
    pub pairs: Vec<KeyValuePairNode>,
}

#[derive(Debug, Clone)]
pub struct KeyValuePairNode {
    pub key: Rc<TreeNode>,
    pub value: Rc<TreeNode>,
}

#[derive(Debug, Clone)]
pub struct XmlElementNode {
    pub tag: String,
    pub attributes: MappingNode,
    pub text: Option<String>,
    pub children: Vec<Rc<TreeNode>>,
}

impl TreeNode {
    /// The short, stable name used in `UnsupportedComparison` messages and
    /// in CLI diagnostics; never user data, so `&'static str` suffices.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Null => "null",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::MultiSet(_) => "multiset",
            Self::Mapping(_) => "mapping",
            Self::FixedKeyMapping(_) => "fixed-key mapping",
            Self::KeyValuePair(_) => "key-value pair",
            Self::XmlElement(_) => "xml element",
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Self::Integer(_) | Self::Float(_) | Self::Bool(_) | Self::Null | Self::String(_)
        )
    }

    /// The weight a `Remove` or `Insert` of this node contributes to a
    /// cost (§3: "1 for each scalar, character-length for strings, and
    /// the recursive sum of children for containers").
    pub fn total_size(&self) -> i64 {
        match self {
            Self::Integer(_) | Self::Float(_) | Self::Bool(_) | Self::Null => 1,
            Self::String(s) => s.value.chars().count() as i64,
            Self::List(l) => l.items.iter().map(|n| n.total_size()).sum(),
            Self::MultiSet(m) => m.items.iter().map(|n| n.total_size()).sum(),
            Self::Mapping(m) | Self::FixedKeyMapping(m) => {
                m.pairs.iter().map(|p| p.key.total_size() + p.value.total_size()).sum()
            }
            Self::KeyValuePair(kv) => kv.key.total_size() + kv.value.total_size(),
            Self::XmlElement(x) => {
                let attrs_size: i64 = x
                    .attributes
                    .pairs
                    .iter()
                    .map(|p| p.key.total_size() + p.value.total_size())
                    .sum();
                let text_size = x.text.as_ref().map_or(0, |t| t.chars().count() as i64);
                let children_size: i64 = x.children.iter().map(|n| n.total_size()).sum();
                1 + attrs_size + text_size + children_size
            }
        }
    }
}

impl PartialEq for TreeNode {
    /// Structural equality, whitespace- and case-sensitive for strings
    /// (§3). `quoted` is presentation metadata and is never compared.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Null, Self::Null) => true,
            (Self::String(a), Self::String(b)) => a.value == b.value,
            (Self::List(a), Self::List(b)) => a.items == b.items,
            (Self::MultiSet(a), Self::MultiSet(b)) => a.items == b.items,
            (Self::Mapping(a), Self::Mapping(b)) => a.pairs == b.pairs,
            (Self::FixedKeyMapping(a), Self::FixedKeyMapping(b)) => a.pairs == b.pairs,
            (Self::KeyValuePair(a), Self::KeyValuePair(b)) => a == b,
            (Self::XmlElement(a), Self::XmlElement(b)) => {
                a.tag == b.tag
                    && a.attributes.pairs == b.attributes.pairs
                    && a.text == b.text
                    && a.children == b.children
            }
            _ => false,
        }
    }
}

impl PartialEq for KeyValuePairNode {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value == other.value
    }
}

impl ListNode {
    pub fn new(items: Vec<Rc<TreeNode>>) -> Self {
        Self { items }
    }
}

impl MultiSetNode {
    pub fn new(items: Vec<Rc<TreeNode>>) -> Self {
        Self { items }
    }
}

impl MappingNode {
    /// Builds a mapping, rejecting pairs whose keys are structurally
    /// equal to one another. This is the one tree-construction invariant
    /// the model cannot express in its types, so it is checked here
    /// rather than assumed (§3's "no two keys structurally equal").
    pub fn new(pairs: Vec<KeyValuePairNode>) -> Result<Self, crate::error::TreeDiffError> {
        for i in 0..pairs.len() {
            for j in (i + 1)..pairs.len() {
                if pairs[i].key == pairs[j].key {
                    return Err(crate::error::TreeDiffError::Invariant(format!(
                        "mapping has duplicate key at positions {i} and {j}"
                    )));
                }
            }
        }
        Ok(Self { pairs })
    }
}

impl KeyValuePairNode {
    pub fn new(key: Rc<TreeNode>, value: Rc<TreeNode>) -> Self {
        Self { key, value }
    }
}

/// One step of the ordered edit history recorded against a node, mirroring
/// `graphtage/tree.py`'s `EditedTreeNode.edit_list` generator output.
#[derive(Debug, Clone)]
pub enum EditListEntry {
    Removed,
    Inserted(Rc<TreeNode>),
    MatchedTo(Rc<TreeNode>),
}

/// Per-node edit annotations, keyed by node identity rather than attached
/// by subclassing (the approach `graphtage/tree.py`'s `EditedTreeNode`
/// mixin takes, and which Rust's closed `TreeNode` enum cannot support
/// directly). Populated by the formatter once a diff has converged, for
/// rendering purposes only -- it plays no role in cost computation.
#[derive(Debug, Default, Clone)]
pub struct EditAnnotation {
    pub removed: bool,
    /// Nodes inserted at this position (§3: `inserted: sequence<TreeNode>`
    /// -- a position can receive more than one inserted node, e.g. several
    /// consecutive `Insert`s in a list alignment).
    pub inserted: Vec<Rc<TreeNode>>,
    pub matched_to: Option<Rc<TreeNode>>,
    /// The ordered sequence of edit steps applied to this node.
    pub edit_list: Vec<EditListEntry>,
}

/// A side table mapping node identity (by `Rc` pointer address) to its
/// [`EditAnnotation`]. Never subclasses or wraps `TreeNode`.
#[derive(Debug, Default)]
pub struct EditedTree {
    annotations: rustc_hash::FxHashMap<usize, EditAnnotation>,
}

fn identity(node: &Rc<TreeNode>) -> usize {
    Rc::as_ptr(node) as usize
}

impl EditedTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn annotate(&mut self, node: &Rc<TreeNode>, annotation: EditAnnotation) {
        self.annotations.insert(identity(node), annotation);
    }

    pub fn get(&self, node: &Rc<TreeNode>) -> Option<&EditAnnotation> {
        self.annotations.get(&identity(node))
    }

    /// Mutates (or creates) the annotation for `node` in place.
    pub fn annotate_with(&mut self, node: &Rc<TreeNode>, f: impl FnOnce(&mut EditAnnotation)) {
        f(self.annotations.entry(identity(node)).or_default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(s: &str) -> Rc<TreeNode> {
        Rc::new(TreeNode::String(StringNode {
            value: s.to_string(),
            quoted: true,
        }))
    }

    #[test]
    fn scalar_total_size_is_one() {
        assert_eq!(TreeNode::Integer(42).total_size(), 1);
        assert_eq!(TreeNode::Bool(true).total_size(), 1);
        assert_eq!(TreeNode::Null.total_size(), 1);
    }

    #[test]
    fn string_total_size_is_char_count() {
        let s = TreeNode::String(StringNode {
            value: "héllo".to_string(),
            quoted: false,
        });
        assert_eq!(s.total_size(), 5);
    }

    #[test]
    fn list_total_size_sums_children() {
        let list = TreeNode::List(ListNode::new(vec![leaf("ab"), leaf("c")]));
        assert_eq!(list.total_size(), 3);
    }

    #[test]
    fn equality_is_whitespace_sensitive() {
        let a = TreeNode::String(StringNode {
            value: "x".to_string(),
            quoted: false,
        });
        let b = TreeNode::String(StringNode {
            value: "x ".to_string(),
            quoted: false,
        });
        assert_ne!(a, b);
    }

    #[test]
    fn quoted_flag_does_not_affect_equality() {
        let a = TreeNode::String(StringNode {
            value: "x".to_string(),
            quoted: true,
        });
        let b = TreeNode::String(StringNode {
            value: "x".to_string(),
            quoted: false,
        });
        assert_eq!(a, b);
    }

    #[test]
    fn mapping_rejects_duplicate_keys() {
        let pairs = vec![
            KeyValuePairNode::new(leaf("k"), leaf("1")),
            KeyValuePairNode::new(leaf("k"), leaf("2")),
        ];
        assert!(MappingNode::new(pairs).is_err());
    }

    #[test]
    fn edited_tree_annotates_by_identity_not_value() {
        let a = leaf("same");
        let b = leaf("same");
        let mut tree = EditedTree::new();
        tree.annotate(
            &a,
            EditAnnotation {
                removed: true,
                ..Default::default()
            },
        );
        assert!(tree.get(&a).is_some());
        // `a` and `b` are structurally equal but distinct allocations.
        assert!(tree.get(&b).is_none());
    }

    #[test]
    fn edit_annotation_records_multiple_insertions_and_an_ordered_history() {
        let under = leaf("x");
        let first = leaf("a");
        let second = leaf("b");
        let mut tree = EditedTree::new();
        tree.annotate_with(&under, |a| {
            a.inserted.push(first.clone());
            a.edit_list.push(EditListEntry::Inserted(first.clone()));
        });
        tree.annotate_with(&under, |a| {
            a.inserted.push(second.clone());
            a.edit_list.push(EditListEntry::Inserted(second.clone()));
        });
        let annotation = tree.get(&under).unwrap();
        assert_eq!(annotation.inserted.len(), 2);
        assert_eq!(annotation.edit_list.len(), 2);
    }
}
