use tracing::debug;

use super::{
    compare_indexed_rows_for_journalling, compare_rows_for_journalling,
    merge_indexed_journalled_entries, merge_indexed_journalled_entries_count,
    merge_journalled_entries, ordered_generate_journalling_indices, JournalAlignment,
};
use crate::column::IndexedValues;
use crate::error::{ensure_len, Result};
use crate::sentinel::is_valid_index;

/// Journal merge of a whole table: one key column, any number of value columns.
///
/// A new row is kept when its key is new or *any* marked column changed, and
/// every column is then merged with the same keep mask so the merged columns
/// stay row-aligned.
#[derive(Debug, Clone)]
pub struct JournalPlan {
    alignment: JournalAlignment,
    keep: Vec<bool>,
}

impl JournalPlan {
    pub fn new<K: Ord>(old_keys: &[K], new_keys: &[K]) -> Result<Self> {
        let alignment = ordered_generate_journalling_indices(old_keys, new_keys)?;
        let keep = alignment
            .old
            .iter()
            .zip(&alignment.new)
            .map(|(&o, &n)| !is_valid_index(o) && is_valid_index(n))
            .collect();
        Ok(Self { alignment, keep })
    }

    pub fn alignment(&self) -> &JournalAlignment {
        &self.alignment
    }

    pub fn keep(&self) -> &[bool] {
        &self.keep
    }

    pub fn kept(&self) -> usize {
        self.keep.iter().filter(|&&k| k).count()
    }

    /// Rows in every merged column.
    pub fn merged_len(&self) -> usize {
        self.alignment.old_rows + self.kept()
    }

    fn absorb(&mut self, changed: Vec<bool>) {
        for (keep, changed) in self.keep.iter_mut().zip(changed) {
            *keep |= changed;
        }
    }

    pub fn mark_scalar_changes<V: PartialEq>(&mut self, old: &[V], new: &[V]) -> Result<()> {
        let changed = compare_rows_for_journalling(&self.alignment, old, new)?;
        self.absorb(changed);
        Ok(())
    }

    pub fn mark_indexed_changes(&mut self, old: &IndexedValues, new: &IndexedValues) -> Result<()> {
        let changed = compare_indexed_rows_for_journalling(
            &self.alignment,
            &old.offsets,
            &old.values,
            &new.offsets,
            &new.values,
        )?;
        self.absorb(changed);
        Ok(())
    }

    pub fn merge_scalar<V: Copy + Default>(&self, old: &[V], new: &[V]) -> Result<Vec<V>> {
        let mut dest = vec![V::default(); self.merged_len()];
        let written = merge_journalled_entries(&self.alignment, &self.keep, old, new, &mut dest)?;
        ensure_len("merged rows", dest.len(), written)?;
        Ok(dest)
    }

    pub fn merge_indexed(&self, old: &IndexedValues, new: &IndexedValues) -> Result<IndexedValues> {
        let bytes = merge_indexed_journalled_entries_count(
            &self.alignment,
            &self.keep,
            &old.offsets,
            &new.offsets,
        )?;
        let mut merged = IndexedValues {
            offsets: vec![0; self.merged_len() + 1],
            values: vec![0; bytes],
        };
        merge_indexed_journalled_entries(
            &self.alignment,
            &self.keep,
            &old.offsets,
            &old.values,
            &new.offsets,
            &new.values,
            &mut merged.offsets,
            &mut merged.values,
        )?;
        debug!(rows = merged.len(), bytes, "indexed column merged");
        Ok(merged)
    }
}
