//! Error taxonomy for the tree-diff engine (§7 of the design spec).

use std::path::PathBuf;

use thiserror::Error;

/// The kinds of failure the engine and its collaborators can raise.
///
/// `Invariant` is the only kind the core never recovers from: it signals a
/// bug (bounds that widened, a mapping with duplicate keys) rather than an
/// expected condition. Everything else bubbles up to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeDiffError {
    /// Raised by a parser collaborator when a document could not be read.
    #[error("failed to parse {path}: {message}", path = .path.as_ref().map_or_else(|| "<memory>".to_string(), |p| p.display().to_string()))]
    ParseError {
        path: Option<PathBuf>,
        message: String,
    },

    /// Two nodes of incompatible shape were compared. The caller is not
    /// expected to treat this as fatal: `edits()` already falls back to a
    /// full replace (§4.7) before this would ever need to be raised: it
    /// exists so collaborators can log or assert on the fallback path.
    #[error("cannot compare {left_kind} with {right_kind}; falling back to full replace")]
    UnsupportedComparison {
        left_kind: &'static str,
        right_kind: &'static str,
    },

    /// An internal check failed: bounds widened, or a `MappingNode` was
    /// constructed with structurally-equal keys. This is always a bug in
    /// the engine or in a caller's hand-built tree, never an expected
    /// runtime condition.
    #[error("internal invariant violated: {0}")]
    Invariant(String),

    /// The caller cleared `valid` on the edit being tightened; propagate
    /// without producing output.
    #[error("diff was cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, TreeDiffError>;
