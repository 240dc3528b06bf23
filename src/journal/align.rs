use std::cmp::Ordering;

use tracing::debug;

use crate::error::{ensure_len, Result};
use crate::ordering::{run_length, validate_ordered, validate_unique_ordered};
use crate::sentinel::{index_to_option, INVALID_INDEX};

/// Key-by-key correspondence between an old history and a new snapshot.
///
/// Entry `k` describes the `k`-th distinct key of `old ∪ new` in key order:
/// `old[k]` is the last old row carrying the key and `new[k]` the new row,
/// each or the sentinel when the key is absent from that side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalAlignment {
    pub old: Vec<u64>,
    pub new: Vec<u64>,
    pub old_rows: usize,
    pub new_rows: usize,
}

impl JournalAlignment {
    pub fn len(&self) -> usize {
        self.old.len()
    }

    pub fn is_empty(&self) -> bool {
        self.old.is_empty()
    }

    /// Decoded `(old, new)` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (Option<usize>, Option<usize>)> + '_ {
        self.old
            .iter()
            .zip(&self.new)
            .map(|(&o, &n)| (index_to_option(o), index_to_option(n)))
    }

    pub(crate) fn validate(&self) -> Result<()> {
        ensure_len("journal alignment new side", self.old.len(), self.new.len())
    }
}

/// Align an old key history (duplicates allowed) with a new snapshot (unique keys).
pub fn ordered_generate_journalling_indices<K: Ord>(
    old_keys: &[K],
    new_keys: &[K],
) -> Result<JournalAlignment> {
    validate_ordered("old keys", old_keys)?;
    validate_unique_ordered("new keys", new_keys)?;

    let mut old = Vec::with_capacity(old_keys.len().max(new_keys.len()));
    let mut new = Vec::with_capacity(old.capacity());
    let (mut i, mut j) = (0, 0);
    while i < old_keys.len() || j < new_keys.len() {
        let ord = match (old_keys.get(i), new_keys.get(j)) {
            (Some(o), Some(n)) => o.cmp(n),
            (Some(_), None) => Ordering::Less,
            _ => Ordering::Greater,
        };
        match ord {
            Ordering::Less => {
                let run = run_length(old_keys, i);
                old.push((i + run - 1) as u64);
                new.push(INVALID_INDEX);
                i += run;
            }
            Ordering::Greater => {
                old.push(INVALID_INDEX);
                new.push(j as u64);
                j += 1;
            }
            Ordering::Equal => {
                let run = run_length(old_keys, i);
                old.push((i + run - 1) as u64);
                new.push(j as u64);
                i += run;
                j += 1;
            }
        }
    }
    debug!(
        old_rows = old_keys.len(),
        new_rows = new_keys.len(),
        keys = old.len(),
        "journal alignment generated"
    );
    Ok(JournalAlignment {
        old,
        new,
        old_rows: old_keys.len(),
        new_rows: new_keys.len(),
    })
}
