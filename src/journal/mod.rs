//! Append-only change journalling.
//!
//! An *old* history (sorted by key, possibly several rows per key) absorbs a
//! *new* snapshot (sorted, one row per key) in three steps:
//!
//! 1. **Align**: pair every distinct key with its last old row and its new
//!    row ([`ordered_generate_journalling_indices`])
//! 2. **Decide**: keep a new row only if its key is new or its value differs
//!    from the latest old value ([`compare_rows_for_journalling`])
//! 3. **Merge**: emit every old row unchanged, each kept new row directly
//!    after its key's old run ([`merge_journalled_entries`])
//!
//! Old rows are never dropped or rewritten, and journalling the same
//! snapshot into the merged history again keeps nothing.
//!
//! [`JournalPlan`] drives the three steps over a table with several value
//! columns.

mod align;
mod compare;
mod merge;
mod plan;

pub use align::{ordered_generate_journalling_indices, JournalAlignment};
pub use compare::{compare_indexed_rows_for_journalling, compare_rows_for_journalling};
pub use merge::{
    merge_indexed_journalled_entries, merge_indexed_journalled_entries_count,
    merge_journalled_entries, merge_journalled_entries_count,
};
pub use plan::JournalPlan;
