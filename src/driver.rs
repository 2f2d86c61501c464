//! The top-level driver (§4.6): computes the root edit and tightens it
//! to convergence. Mirrors the shape of `graphtage/tree.py`'s
//! `TreeNode.diff()` loop, translated from exception-based cancellation
//! to a `valid` flag checked each iteration (§5).

use std::rc::Rc;

use crate::bounded::Bounded;
use crate::edit::{compute_edit, Edit};
use crate::error::{Result, TreeDiffError};
use crate::settings::DiffSettings;
use crate::tree::TreeNode;

/// Computes the minimum-cost edit between `from` and `to`, tightening
/// bounds until the result is definitive.
///
/// This is single-threaded and cooperative: each `tighten_bounds` call is
/// one unit of work, so a caller that wants to bound wall-clock time (or
/// support cancellation from another thread) can interleave its own
/// checks between calls rather than being forced to wait for the whole
/// computation (§5).
pub fn diff(from: Rc<TreeNode>, to: Rc<TreeNode>, settings: &DiffSettings) -> Result<Edit> {
    let mut root_edit = compute_edit(&from, &to, settings);
    while root_edit.is_valid() && !root_edit.bounds().definitive() {
        if !root_edit.tighten_bounds() {
            break;
        }
    }
    if !root_edit.is_valid() {
        return Err(TreeDiffError::Cancelled);
    }
    if !root_edit.bounds().definitive() {
        return Err(TreeDiffError::Invariant(format!(
            "diff loop exited with non-definitive bounds {:?}",
            root_edit.bounds()
        )));
    }
    Ok(root_edit)
}

/// Like [`diff`], but lets the caller interrupt the loop: `should_cancel`
/// is polled between tightening steps, and cancelling sets the edit's
/// `valid` flag before returning the `Cancelled` error (§5).
pub fn diff_cancellable(
    from: Rc<TreeNode>,
    to: Rc<TreeNode>,
    settings: &DiffSettings,
    mut should_cancel: impl FnMut() -> bool,
) -> Result<Edit> {
    let mut root_edit = compute_edit(&from, &to, settings);
    while root_edit.is_valid() && !root_edit.bounds().definitive() {
        if should_cancel() {
            root_edit.cancel();
            break;
        }
        if !root_edit.tighten_bounds() {
            break;
        }
    }
    if !root_edit.is_valid() {
        return Err(TreeDiffError::Cancelled);
    }
    Ok(root_edit)
}
