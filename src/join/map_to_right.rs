//! Per-left-row lookup of the matching right row.

use std::cmp::Ordering;

use crate::error::{ensure_len, Result};
use crate::ordering::{validate_ordered, validate_unique_ordered};
use crate::sentinel::INVALID_INDEX;

/// `result[i]` = position of `left[i]` in `right`, or the sentinel.
/// Both sides must hold unique keys. Returns the number of matched rows.
pub fn ordered_map_to_right_both_unique<T: Ord>(
    left: &[T],
    right: &[T],
    result: &mut [u64],
) -> Result<usize> {
    validate_unique_ordered("left keys", left)?;
    validate_unique_ordered("right keys", right)?;
    ensure_len("map-to-right result", left.len(), result.len())?;

    let mut matched = 0;
    let mut j = 0;
    for (i, key) in left.iter().enumerate() {
        while j < right.len() && right[j] < *key {
            j += 1;
        }
        result[i] = if j < right.len() && right[j] == *key {
            matched += 1;
            let hit = j as u64;
            j += 1;
            hit
        } else {
            INVALID_INDEX
        };
    }
    Ok(matched)
}

/// `result[i]` = first position of `left[i]` in `right`, or the sentinel.
///
/// `left` may repeat keys; every repeat maps to the same right row.
pub fn ordered_map_to_right_right_unique<T: Ord>(
    left: &[T],
    right: &[T],
    result: &mut [u64],
) -> Result<usize> {
    validate_ordered("left keys", left)?;
    validate_ordered("right keys", right)?;
    ensure_len("map-to-right result", left.len(), result.len())?;

    let mut matched = 0;
    let mut j = 0;
    for (i, key) in left.iter().enumerate() {
        while j < right.len() && right[j].cmp(key) == Ordering::Less {
            j += 1;
        }
        result[i] = match right.get(j) {
            Some(r) if r == key => {
                matched += 1;
                j as u64
            }
            _ => INVALID_INDEX,
        };
    }
    Ok(matched)
}
