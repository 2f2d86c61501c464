//! A minimum-cost structural diff engine for semi-structured documents.
//!
//! The engine compares two [`tree::TreeNode`] trees and produces an
//! [`edit::Edit`] describing the cheapest way to turn one into the other,
//! using interval-bounded incremental refinement ([`bounded::Bounded`])
//! rather than computing exact costs up front, so a caller can stop early
//! with a usable (if not yet exact) bound.

pub mod bounded;
pub mod driver;
pub mod edit;
pub mod error;
pub mod formatter;
pub mod parser;
pub mod printer;
pub mod range;
pub mod settings;
pub mod tree;

pub use bounded::Bounded;
pub use driver::{diff, diff_cancellable};
pub use edit::Edit;
pub use error::{Result, TreeDiffError};
pub use range::Range;
pub use settings::DiffSettings;
pub use tree::{EditAnnotation, EditListEntry, EditedTree, TreeNode};
