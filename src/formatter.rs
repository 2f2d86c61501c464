//! Visits a converged [`Edit`] tree and drives a [`Printer`] to render a
//! human-readable, colorized patch (§1, §6). Dispatch is an explicit
//! table keyed by edit kind rather than reflection-based method lookup
//! (§9's "Formatter registration" design note), and sub-formatters for
//! strings and sequences delegate anything they don't specially handle
//! back to a parent formatter, mirroring how `graphtage`'s
//! `SequenceFormatter`/`XMLFormatter` nest.

use crate::edit::{Edit, StringEdit};
use crate::printer::{Emphasis, Printer};
use crate::settings::DiffSettings;
use crate::tree::TreeNode;

/// Renders a converged root [`Edit`] into text, using `printer` as the
/// output sink. `settings.join_lists`/`settings.join_dict_items` control
/// whether an all-`Match` compound collapses onto one line instead of one
/// line per element, matching the CLI flags named in §6.
pub fn format_edit(edit: &Edit, settings: &DiffSettings, printer: &mut impl Printer) {
    Formatter { settings }.format(edit, printer);
}

struct Formatter<'a> {
    settings: &'a DiffSettings,
}

impl Formatter<'_> {
    fn format(&self, edit: &Edit, printer: &mut impl Printer) {
        if let Some(string_edit) = edit.string_edit() {
            self.format_string_edit(string_edit, printer);
            return;
        }
        if edit.is_match() {
            self.format_match(edit, printer);
            return;
        }
        if edit.is_remove() {
            self.format_removed_node(&edit.from_node, printer);
            return;
        }
        if edit.is_insert() {
            let to = edit.to_node.as_ref().expect("Insert edit always carries a to_node");
            self.format_inserted_node(to, printer);
            return;
        }
        self.format_compound(edit, printer);
    }

    fn format_match(&self, edit: &Edit, printer: &mut impl Printer) {
        let to = edit.to_node.as_ref().unwrap_or(&edit.from_node);
        self.format_plain_node(to, printer);
    }

    fn format_compound(&self, edit: &Edit, printer: &mut impl Printer) {
        let sub_edits = edit.sub_edits();
        let joinable = self.settings.join_lists
            && sub_edits.iter().all(Edit::is_match)
            && matches!(edit.from_node.as_ref(), TreeNode::List(_));

        self.open_bracket(edit.from_node.as_ref(), printer);
        printer.indent();
        for (i, sub) in sub_edits.iter().enumerate() {
            if i > 0 {
                printer.write_styled(",", Emphasis::Frame);
                if !joinable {
                    printer.newline();
                } else {
                    printer.write(" ");
                }
            } else if !joinable {
                printer.newline();
            }
            self.format(sub, printer);
        }
        printer.dedent();
        if !sub_edits.is_empty() && !joinable {
            printer.newline();
        }
        self.close_bracket(edit.from_node.as_ref(), printer);
    }

    fn format_string_edit(&self, string_edit: &StringEdit, printer: &mut impl Printer) {
        use crate::edit::CharOp;

        printer.write_styled("\"", Emphasis::Frame);
        for (op, from_ch, to_ch) in string_edit.char_ops() {
            match op {
                CharOp::Match => printer.write(&from_ch.expect("Match carries a character").to_string()),
                CharOp::Remove => {
                    printer.write_styled(&from_ch.expect("Remove carries a character").to_string(), Emphasis::Removed);
                }
                CharOp::Insert => {
                    printer.write_styled(&to_ch.expect("Insert carries a character").to_string(), Emphasis::Inserted);
                }
            }
        }
        printer.write_styled("\"", Emphasis::Frame);
    }

    fn format_plain_node(&self, node: &TreeNode, printer: &mut impl Printer) {
        printer.write(&render_scalar_or_label(node));
    }

    fn format_removed_node(&self, node: &TreeNode, printer: &mut impl Printer) {
        printer.write_styled(&render_scalar_or_label(node), Emphasis::Removed);
    }

    fn format_inserted_node(&self, node: &TreeNode, printer: &mut impl Printer) {
        printer.write_styled(&render_scalar_or_label(node), Emphasis::Inserted);
    }

    fn open_bracket(&self, node: &TreeNode, printer: &mut impl Printer) {
        let bracket = match node {
            TreeNode::List(_) => "[",
            TreeNode::MultiSet(_) => "{",
            TreeNode::Mapping(_) | TreeNode::FixedKeyMapping(_) => "{",
            TreeNode::XmlElement(x) => {
                printer.write_styled(&format!("<{}>", x.tag), Emphasis::Frame);
                return;
            }
            _ => "",
        };
        printer.write_styled(bracket, Emphasis::Frame);
    }

    fn close_bracket(&self, node: &TreeNode, printer: &mut impl Printer) {
        let bracket = match node {
            TreeNode::List(_) => "]",
            TreeNode::MultiSet(_) => "}",
            TreeNode::Mapping(_) | TreeNode::FixedKeyMapping(_) => "}",
            TreeNode::XmlElement(x) => {
                printer.write_styled(&format!("</{}>", x.tag), Emphasis::Frame);
                return;
            }
            _ => "",
        };
        printer.write_styled(bracket, Emphasis::Frame);
    }
}

fn render_scalar_or_label(node: &TreeNode) -> String {
    match node {
        TreeNode::Integer(n) => n.to_string(),
        TreeNode::Float(f) => f.to_string(),
        TreeNode::Bool(b) => b.to_string(),
        TreeNode::Null => "null".to_string(),
        TreeNode::String(s) => {
            if s.quoted {
                format!("\"{}\"", s.value)
            } else {
                s.value.clone()
            }
        }
        other => format!("<{}>", other.kind_name()),
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::driver::diff;
    use crate::printer::PlainPrinter;
    use crate::tree::{ListNode, StringNode};

    fn leaf(v: &str) -> Rc<TreeNode> {
        Rc::new(TreeNode::String(StringNode {
            value: v.to_string(),
            quoted: true,
        }))
    }

    #[test]
    fn formats_a_removed_list_element() {
        let from = Rc::new(TreeNode::List(ListNode::new(vec![Rc::new(TreeNode::Integer(0)), leaf("a")])));
        let to = Rc::new(TreeNode::List(ListNode::new(vec![leaf("a")])));
        let edit = diff(from, to, &DiffSettings::default()).unwrap();
        let mut printer = PlainPrinter::new();
        format_edit(&edit, &DiffSettings::default(), &mut printer);
        let out = printer.finish();
        assert!(out.contains('0'));
        assert!(out.contains('['));
    }

    #[test]
    fn formats_matching_scalar_with_no_markup() {
        let edit = diff(Rc::new(TreeNode::Integer(4)), Rc::new(TreeNode::Integer(4)), &DiffSettings::default()).unwrap();
        let mut printer = PlainPrinter::new();
        format_edit(&edit, &DiffSettings::default(), &mut printer);
        assert_eq!(printer.finish(), "4");
    }
}
