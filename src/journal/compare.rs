use super::JournalAlignment;
use crate::column::indexed::{row, validate_offsets};
use crate::error::{ensure_len, Result};
use crate::sentinel::checked_index;

/// Walk the alignment and decide, per entry, whether the new row is kept.
fn decide<F>(alignment: &JournalAlignment, differs: F) -> Result<Vec<bool>>
where
    F: Fn(usize, usize) -> bool,
{
    alignment.validate()?;
    let mut keep = Vec::with_capacity(alignment.len());
    for k in 0..alignment.len() {
        let new = checked_index("journal alignment new side", &alignment.new, k, alignment.new_rows)?;
        let old = checked_index("journal alignment old side", &alignment.old, k, alignment.old_rows)?;
        keep.push(match (old, new) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(o), Some(n)) => differs(o, n),
        });
    }
    Ok(keep)
}

/// Keep mask over the alignment for a scalar value column: a new row is kept
/// when its key is new or its value differs from the latest old value.
pub fn compare_rows_for_journalling<V: PartialEq>(
    alignment: &JournalAlignment,
    old_values: &[V],
    new_values: &[V],
) -> Result<Vec<bool>> {
    ensure_len("old values", alignment.old_rows, old_values.len())?;
    ensure_len("new values", alignment.new_rows, new_values.len())?;
    decide(alignment, |o, n| old_values[o] != new_values[n])
}

/// Keep mask for an indexed column; rows compare by their bytes.
pub fn compare_indexed_rows_for_journalling(
    alignment: &JournalAlignment,
    old_offsets: &[u64],
    old_values: &[u8],
    new_offsets: &[u64],
    new_values: &[u8],
) -> Result<Vec<bool>> {
    let old_rows = validate_offsets("old offsets", old_offsets, old_values.len())?;
    let new_rows = validate_offsets("new offsets", new_offsets, new_values.len())?;
    ensure_len("old indexed rows", alignment.old_rows, old_rows)?;
    ensure_len("new indexed rows", alignment.new_rows, new_rows)?;
    decide(alignment, |o, n| {
        row(old_offsets, old_values, o) != row(new_offsets, new_values, n)
    })
}
