//! Table-driven reproductions of the "Concrete end-to-end scenarios"
//! listed under §8, grounded in the teacher's `tests/solve_command.rs`
//! use of `#[rstest]`/`#[case]` for one assertion shape repeated over
//! several small inputs, and in `test_graphtage.py`'s `test_small_diff`
//! / `test_string_diff_printing` for the costs themselves.

use std::rc::Rc;

use pretty_assertions::assert_eq;
use rstest::rstest;

use treediff::tree::{KeyValuePairNode, ListNode, MappingNode, StringNode, TreeNode, XmlElementNode};
use treediff::{diff, DiffSettings, Range};

fn int(v: i64) -> Rc<TreeNode> {
    Rc::new(TreeNode::Integer(v))
}

fn s(v: &str) -> Rc<TreeNode> {
    Rc::new(TreeNode::String(StringNode {
        value: v.to_string(),
        quoted: true,
    }))
}

fn kv(key: &str, value: Rc<TreeNode>) -> KeyValuePairNode {
    KeyValuePairNode::new(s(key), value)
}

#[rstest]
// Scenario 1: string diff -- "abcdef" -> "azced" (§8.1, test_string_diff_printing).
#[case(TreeNode::String(StringNode { value: "abcdef".into(), quoted: false }), TreeNode::String(StringNode { value: "azced".into(), quoted: false }), 3)]
// Scenario 2: run grouping -- "abcdefg" -> "abhijfg" (§8.2). The prefix/suffix
// ("ab"/"fg") match and the three middle characters each substitute for one
// of the other string's, for a cost of 3, not the 6 a remove-insert-only
// model would need.
#[case(TreeNode::String(StringNode { value: "abcdefg".into(), quoted: false }), TreeNode::String(StringNode { value: "abhijfg".into(), quoted: false }), 3)]
// Scenario 3: small mapping -- "foo"->"bar" (cost 3) and 1->2 (cost 1).
#[case(
    TreeNode::Mapping(MappingNode::new(vec![kv("test", s("foo")), kv("baz", int(1))]).unwrap()),
    TreeNode::Mapping(MappingNode::new(vec![kv("test", s("bar")), kv("baz", int(2))]).unwrap()),
    4,
)]
// Scenario 4: ordered list removal -- a leading element dropped.
#[case(
    TreeNode::List(ListNode::new(vec![int(0), int(1), int(2), int(3), int(4), int(5)])),
    TreeNode::List(ListNode::new(vec![int(1), int(2), int(3), int(4), int(5)])),
    1,
)]
fn worked_scenario_matches_expected_cost(#[case] from: TreeNode, #[case] to: TreeNode, #[case] expected: i64) {
    let edit = diff(Rc::new(from), Rc::new(to), &DiffSettings::default()).unwrap();
    assert_eq!(edit.bounds(), Range::exact(expected));
}

#[test]
fn scenario_5_forbidding_key_edits_removes_and_inserts_wholesale() {
    let from = TreeNode::FixedKeyMapping(MappingNode::new(vec![kv("a", int(1)), kv("b", int(2))]).unwrap());
    let to = TreeNode::FixedKeyMapping(MappingNode::new(vec![kv("a", int(1)), kv("c", int(2))]).unwrap());
    let edit = diff(Rc::new(from), Rc::new(to), &DiffSettings::default()).unwrap();
    // "a":1 matches for free; "b":2 removed (1+1) and "c":2 inserted (1+1).
    assert_eq!(edit.bounds(), Range::exact(4));
}

#[test]
fn scenario_6_xml_nested_element_costs_only_the_attribute_edit() {
    let from = XmlElementNode {
        tag: "x".to_string(),
        attributes: MappingNode::new(vec![kv("a", s("1"))]).unwrap(),
        text: Some("t".to_string()),
        children: vec![],
    };
    let to = XmlElementNode {
        tag: "x".to_string(),
        attributes: MappingNode::new(vec![kv("a", s("2"))]).unwrap(),
        text: Some("t".to_string()),
        children: vec![],
    };
    let edit = diff(Rc::new(TreeNode::XmlElement(from)), Rc::new(TreeNode::XmlElement(to)), &DiffSettings::default()).unwrap();
    // tag matches (0), text matches (0), children match (0); only the
    // attribute value "1"->"2" costs anything: one substitution (1).
    assert_eq!(edit.bounds(), Range::exact(1));
}
