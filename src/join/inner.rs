//! Inner equi-joins over sorted keys.

use std::cmp::Ordering;

use tracing::debug;

use super::PairSink;
use crate::error::Result;
use crate::ordering::{run_length, validate_ordered, validate_unique_ordered};

/// Number of pairs an inner join of `left` and `right` produces:
/// the sum over shared keys of `run(left) * run(right)`.
pub fn ordered_inner_map_result_size<T: Ord>(left: &[T], right: &[T]) -> Result<usize> {
    validate_ordered("left keys", left)?;
    validate_ordered("right keys", right)?;
    Ok(count_pairs(left, right))
}

fn count_pairs<T: Ord>(left: &[T], right: &[T]) -> usize {
    let (mut i, mut j, mut total) = (0, 0, 0);
    while i < left.len() && j < right.len() {
        match left[i].cmp(&right[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                let run_l = run_length(left, i);
                let run_r = run_length(right, j);
                total += run_l * run_r;
                i += run_l;
                j += run_r;
            }
        }
    }
    total
}

/// General inner join; duplicates on either side produce cross products.
///
/// Returns the number of pairs written to the front of the maps.
pub fn ordered_inner_map<T: Ord>(
    left: &[T],
    right: &[T],
    left_map: &mut [u64],
    right_map: &mut [u64],
) -> Result<usize> {
    validate_ordered("left keys", left)?;
    validate_ordered("right keys", right)?;
    let mut sink = PairSink::new(left_map, right_map, count_pairs(left, right))?;

    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        match left[i].cmp(&right[j]) {
            Ordering::Less => i += 1,
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
    debug!(
        left = left.len(),
        right = right.len(),
        pairs = sink.len(),
        "inner join materialized"
    );
    Ok(sink.len())
}

/// Inner join where `left` holds unique keys.
pub fn ordered_inner_map_left_unique<T: Ord>(
    left: &[T],
    right: &[T],
    left_map: &mut [u64],
    right_map: &mut [u64],
) -> Result<usize> {
    validate_unique_ordered("left keys", left)?;
    validate_ordered("right keys", right)?;
    let mut sink = PairSink::new(left_map, right_map, count_pairs(left, right))?;

    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        match left[i].cmp(&right[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                sink.push(i as u64, j as u64)?;
                j += 1;
            }
        }
    }
    Ok(sink.len())
}

/// Inner join where both sides hold unique keys.
pub fn ordered_inner_map_both_unique<T: Ord>(
    left: &[T],
    right: &[T],
    left_map: &mut [u64],
    right_map: &mut [u64],
) -> Result<usize> {
    validate_unique_ordered("left keys", left)?;
    validate_unique_ordered("right keys", right)?;
    let mut sink = PairSink::new(left_map, right_map, count_pairs(left, right))?;

    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        match left[i].cmp(&right[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                sink.push(i as u64, j as u64)?;
                i += 1;
                j += 1;
            }
        }
    }
    Ok(sink.len())
}
