//! Ambient configuration for a diff run, threaded through `edits()`
//! dispatch. Grounded in `mergiraf::settings::DisplaySettings`: a plain
//! struct of toggles with a `Default` impl, not a builder or a global.

/// Parameters controlling how two trees are compared and how the
/// resulting edit script is later rendered.
#[derive(Debug, Clone, Copy)]
pub struct DiffSettings {
    /// Whether `MappingNode`s may match keys that differ (emitting a
    /// `KeyValuePairEdit` whose key sub-edit has nonzero cost). Has no
    /// effect on `FixedKeyMappingNode`, which never allows key edits
    /// regardless of this setting (§4.5).
    pub allow_key_edits: bool,
    /// Whether `ListNode`s are diffed with the full sequence aligner
    /// (§4.4) or with a cheap positional zip (index `i` of `a` is always
    /// matched to index `i` of `b`, with the longer list's tail
    /// inserted/removed). The cheap path is a coarser approximation, not
    /// guaranteed minimum-cost; it exists for callers who value speed
    /// over an optimal script on very long sequences.
    pub allow_list_edits: bool,
    /// Whether element matches within a `ListNode` alignment may use the
    /// full recursive `edits()` cost (which can itself search nested
    /// containers) or must fall back to a cheap leaf-only comparison.
    /// Mirrors the CLI's `--no-list-edit-distance` flag (§6).
    pub allow_list_edit_distance: bool,
    /// Whether the default formatter emits ANSI color codes.
    pub color: bool,
    /// Whether the default formatter joins short lists onto one line.
    pub join_lists: bool,
    /// Whether the default formatter joins short mapping entries onto
    /// one line.
    pub join_dict_items: bool,
}

impl Default for DiffSettings {
    fn default() -> Self {
        Self {
            allow_key_edits: true,
            allow_list_edits: true,
            allow_list_edit_distance: true,
            color: true,
            join_lists: false,
            join_dict_items: false,
        }
    }
}
