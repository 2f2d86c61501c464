//! The parser collaborator interface (§6): "produces a `TreeNode` from a
//! file path or in-memory value... Parse errors propagate as
//! `ParseError{path, message}`." One real format (JSON) is implemented in
//! full; the remaining CLI-advertised formats are present as honest stubs
//! so the `--from-format`/`--to-format` dispatch table stays total
//! (§6's CLI surface sketch names `json|yaml|xml|html|csv|plist|…`)
//! without committing this exercise to four more full parsers -- parsers
//! are explicitly out of scope per §1, and JSON alone is enough to
//! exercise the engine end to end.

mod json;

use std::path::Path;

use crate::error::{Result, TreeDiffError};
use crate::tree::TreeNode;

pub use json::parse_json;

/// The input formats the CLI advertises via `--from-format`/`--to-format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Xml,
    Csv,
}

impl Format {
    pub fn parse_name(name: &str) -> Option<Self> {
        match name {
            "json" => Some(Self::Json),
            "yaml" => Some(Self::Yaml),
            "xml" => Some(Self::Xml),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Xml => "xml",
            Self::Csv => "csv",
        }
    }

    /// Every format the CLI advertises via `--from-format`/`--to-format`,
    /// for usage messages (§6).
    pub fn all() -> &'static [Format] {
        &[Self::Json, Self::Yaml, Self::Xml, Self::Csv]
    }
}

/// Builds a [`TreeNode`] from `contents`, dispatching on `format`.
/// `path` is carried through only for error messages (§7's
/// `ParseError{path, message}`), and is `None` when diffing in-memory
/// values that never had a file backing them.
pub fn build_tree(format: Format, contents: &str, path: Option<&Path>) -> Result<TreeNode> {
    match format {
        Format::Json => parse_json(contents).map_err(|message| TreeDiffError::ParseError {
            path: path.map(Path::to_path_buf),
            message,
        }),
        Format::Yaml | Format::Xml | Format::Csv => Err(TreeDiffError::ParseError {
            path: path.map(Path::to_path_buf),
            message: format!("{format:?} parsing is not implemented in this reference build"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_json_by_name() {
        assert_eq!(Format::parse_name("json"), Some(Format::Json));
        assert_eq!(Format::parse_name("bogus"), None);
    }

    #[test]
    fn unimplemented_formats_report_a_parse_error() {
        let err = build_tree(Format::Yaml, "a: 1", None).unwrap_err();
        assert!(matches!(err, TreeDiffError::ParseError { .. }));
    }
}
