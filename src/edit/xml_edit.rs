//! XML element alignment (§4.2, §4.7), grounded in
//! `graphtage/xml.py`'s `XMLElement`: a tag, an attribute mapping, an
//! optional text leaf, and an ordered list of children. The edit
//! composes four independent sub-edits rather than matching generically
//! by key, since an XML element's parts are positionally named rather
//! than looked up by key.

use std::rc::Rc;

use crate::bounded::Bounded;
use crate::range::Range;
use crate::settings::DiffSettings;
use crate::tree::{ListNode, TreeNode, XmlElementNode};

use super::{compute_edit, Edit};

#[derive(Debug, Clone)]
pub struct XmlElementEdit {
    tag_edit: Box<Edit>,
    attributes_edit: Box<Edit>,
    text_edit: Box<Edit>,
    children_edit: Box<Edit>,
}

fn optional_text_node(text: &Option<String>) -> Rc<TreeNode> {
    match text {
        Some(t) => Rc::new(TreeNode::String(crate::tree::StringNode {
            value: t.clone(),
            quoted: false,
        })),
        None => Rc::new(TreeNode::Null),
    }
}

impl XmlElementEdit {
    pub fn new(from: XmlElementNode, to: XmlElementNode, settings: DiffSettings) -> Self {
        let tag_edit = compute_edit(
            &Rc::new(TreeNode::String(crate::tree::StringNode {
                value: from.tag.clone(),
                quoted: false,
            })),
            &Rc::new(TreeNode::String(crate::tree::StringNode {
                value: to.tag.clone(),
                quoted: false,
            })),
            &settings,
        );
        let attributes_edit = compute_edit(
            &Rc::new(TreeNode::Mapping(from.attributes.clone())),
            &Rc::new(TreeNode::Mapping(to.attributes.clone())),
            &settings,
        );
        let text_edit = compute_edit(&optional_text_node(&from.text), &optional_text_node(&to.text), &settings);
        let children_edit = compute_edit(
            &Rc::new(TreeNode::List(ListNode::new(from.children.clone()))),
            &Rc::new(TreeNode::List(ListNode::new(to.children.clone()))),
            &settings,
        );
        Self {
            tag_edit: Box::new(tag_edit),
            attributes_edit: Box::new(attributes_edit),
            text_edit: Box::new(text_edit),
            children_edit: Box::new(children_edit),
        }
    }

    pub(super) fn sub_edits(&self) -> Vec<Edit> {
        vec![
            (*self.tag_edit).clone(),
            (*self.attributes_edit).clone(),
            (*self.text_edit).clone(),
            (*self.children_edit).clone(),
        ]
    }
}

impl Bounded for XmlElementEdit {
    fn bounds(&self) -> Range {
        self.tag_edit.bounds() + self.attributes_edit.bounds() + self.text_edit.bounds() + self.children_edit.bounds()
    }

    fn tighten_bounds(&mut self) -> bool {
        for edit in [
            &mut self.tag_edit,
            &mut self.attributes_edit,
            &mut self.text_edit,
            &mut self.children_edit,
        ] {
            if !edit.bounds().definitive() {
                return edit.tighten_bounds();
            }
        }
        false
    }

    fn is_complete(&self) -> bool {
        self.tag_edit.is_complete()
            && self.attributes_edit.is_complete()
            && self.text_edit.is_complete()
            && self.children_edit.is_complete()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{KeyValuePairNode, MappingNode, StringNode};

    fn leaf(v: &str) -> Rc<TreeNode> {
        Rc::new(TreeNode::String(StringNode {
            value: v.to_string(),
            quoted: true,
        }))
    }

    #[test]
    fn identical_elements_cost_nothing() {
        let el = XmlElementNode {
            tag: "a".to_string(),
            attributes: MappingNode::new(vec![KeyValuePairNode::new(leaf("id"), leaf("1"))]).unwrap(),
            text: Some("hi".to_string()),
            children: vec![],
        };
        let mut edit = XmlElementEdit::new(el.clone(), el, DiffSettings::default());
        while edit.tighten_bounds() {}
        assert_eq!(edit.bounds(), Range::exact(0));
    }

    #[test]
    fn differing_tag_contributes_its_own_cost() {
        let a = XmlElementNode {
            tag: "a".to_string(),
            attributes: MappingNode::new(vec![]).unwrap(),
            text: None,
            children: vec![],
        };
        let b = XmlElementNode {
            tag: "bb".to_string(),
            attributes: MappingNode::new(vec![]).unwrap(),
            text: None,
            children: vec![],
        };
        let mut edit = XmlElementEdit::new(a, b, DiffSettings::default());
        while edit.tighten_bounds() {}
        assert_eq!(edit.bounds(), Range::exact(2)); // substitute 'a'->'b' (1) + insert 'b' (1)
    }
}
