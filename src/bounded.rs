//! The `Bounded` capability (§4.1): anything whose eventual cost is only
//! known as an interval, narrowable by incremental work.

use crate::range::Range;

/// A computation exposing a `[lower, upper]` bound on its eventual result.
///
/// Implementors must uphold two invariants, checked by the property tests
/// in `tests/invariants.rs`:
///
/// - **Monotone tightening**: successive `bounds()` calls return ranges
///   that are subsets of previous ones (`tighten_bounds` never widens).
/// - **Definitiveness implies completeness**: once `bounds().definitive()`
///   is `true`, `tighten_bounds()` must return `false` on every subsequent
///   call.
pub trait Bounded {
    /// The current best-known bound on the eventual cost.
    fn bounds(&self) -> Range;

    /// Performs one unit of incremental work towards narrowing `bounds()`.
    /// Returns `true` if the bound actually narrowed. Once this returns
    /// `false`, it must keep returning `false`.
    fn tighten_bounds(&mut self) -> bool;

    /// Whether every internal sub-computation has finished. Implies that
    /// `tighten_bounds` can no longer narrow anything, but the converse
    /// need not hold immediately (a definitive bound can be reached before
    /// bookkeeping is done).
    fn is_complete(&self) -> bool;
}
