//! Left and full outer joins.

use std::cmp::Ordering;

use tracing::debug;

use super::PairSink;
use crate::error::Result;
use crate::ordering::{run_length, validate_ordered, validate_unique_ordered};
use crate::sentinel::INVALID_INDEX;

/// Rows in the left join of `left` with `right`: each left run contributes
/// its cross product with the matching right run, or itself if unmatched.
pub fn ordered_left_map_result_size<T: Ord>(left: &[T], right: &[T]) -> Result<usize> {
    validate_ordered("left keys", left)?;
    validate_ordered("right keys", right)?;
    Ok(count_left_rows(left, right))
}

fn count_left_rows<T: Ord>(left: &[T], right: &[T]) -> usize {
    let (mut i, mut j, mut total) = (0, 0, 0);
    while i < left.len() {
        let run_l = run_length(left, i);
        while j < right.len() && right[j] < left[i] {
            j += 1;
        }
        if j < right.len() && right[j] == left[i] {
            let run_r = run_length(right, j);
            total += run_l * run_r;
            j += run_r;
        } else {
            total += run_l;
        }
        i += run_l;
    }
    total
}

/// General left join. Unmatched left rows pair with the sentinel.
pub fn ordered_left_map<T: Ord>(
    left: &[T],
    right: &[T],
    left_map: &mut [u64],
    right_map: &mut [u64],
) -> Result<usize> {
    validate_ordered("left keys", left)?;
    validate_ordered("right keys", right)?;
    let mut sink = PairSink::new(left_map, right_map, count_left_rows(left, right))?;

    let (mut i, mut j) = (0, 0);
    while i < left.len() {
        let ord = if j < right.len() {
            left[i].cmp(&right[j])
        } else {
            Ordering::Less
        };
        match ord {
            Ordering::Less => {
                sink.push(i as u64, INVALID_INDEX)?;
                i += 1;
            }
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                let run_l = run_length(left, i);
                let run_r = run_length(right, j);
                for l in i..i + run_l {
                    for r in j..j + run_r {
                        sink.push(l as u64, r as u64)?;
                    }
                }
                i += run_l;
                j += run_r;
            }
        }
    }
    debug!(left = left.len(), pairs = sink.len(), "left join materialized");
    Ok(sink.len())
}

/// Rows in the full outer join of two unique key sequences:
/// `|left| + |right| - |matches|`.
pub fn ordered_outer_map_result_size_both_unique<T: Ord>(left: &[T], right: &[T]) -> Result<usize> {
    validate_unique_ordered("left keys", left)?;
    validate_unique_ordered("right keys", right)?;
    Ok(count_outer_rows(left, right))
}

fn count_outer_rows<T: Ord>(left: &[T], right: &[T]) -> usize {
    let (mut i, mut j, mut matches) = (0, 0, 0);
    while i < left.len() && j < right.len() {
        match left[i].cmp(&right[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                matches += 1;
                i += 1;
                j += 1;
            }
        }
    }
    left.len() + right.len() - matches
}

/// Full outer join of two unique key sequences in key order.
///
/// Every left row and every right row appears exactly once; the side a key
/// is missing from carries the sentinel.
pub fn ordered_outer_map_both_unique<T: Ord>(
    left: &[T],
    right: &[T],
    left_map: &mut [u64],
    right_map: &mut [u64],
) -> Result<usize> {
    validate_unique_ordered("left keys", left)?;
    validate_unique_ordered("right keys", right)?;
    let mut sink = PairSink::new(left_map, right_map, count_outer_rows(left, right))?;

    let (mut i, mut j) = (0, 0);
    while i < left.len() || j < right.len() {
        let ord = match (left.get(i), right.get(j)) {
            (Some(l), Some(r)) => l.cmp(r),
            (Some(_), None) => Ordering::Less,
            _ => Ordering::Greater,
        };
        match ord {
            Ordering::Less => {
                sink.push(i as u64, INVALID_INDEX)?;
                i += 1;
            }
            Ordering::Greater => {
                sink.push(INVALID_INDEX, j as u64)?;
                j += 1;
            }
            Ordering::Equal => {
                sink.push(i as u64, j as u64)?;
                i += 1;
                j += 1;
            }
        }
    }
    debug!(
        left = left.len(),
        right = right.len(),
        pairs = sink.len(),
        "outer join materialized"
    );
    Ok(sink.len())
}
