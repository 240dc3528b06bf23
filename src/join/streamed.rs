//! Column-backed join variants.
//!
//! Inputs are read through [`ColumnCursor`]s and outputs written through
//! [`ColumnWriter`]s, both `chunk_len` rows at a time. Every input row is
//! read: order is checked on both key columns and uniqueness on each side
//! declared unique, including the tail left over once the other side runs
//! out. Pairs are written while scanning, so on error the output columns
//! may hold the pairs found before the violation.

use std::cmp::Ordering;

use tracing::debug;

use crate::column::{Column, ColumnCursor, ColumnWriter};
use crate::error::{Error, Result};
use crate::sentinel::INVALID_INDEX;

/// Advance past the current value, failing if the next one repeats it.
fn advance_unique<K, C>(cursor: &mut ColumnCursor<'_, K, C>, what: &'static str) -> Result<()>
where
    K: Copy + Ord,
    C: Column<K> + ?Sized,
{
    let current = cursor.next_value()?;
    if let (Some(current), Some(next)) = (current, cursor.peek()?) {
        if current == next {
            return Err(Error::NotUnique {
                what,
                position: cursor.position(),
            });
        }
    }
    Ok(())
}

/// Streamed [`ordered_map_to_right_right_unique`](super::ordered_map_to_right_right_unique):
/// `result[i]` is the first right row holding `left[i]`, or the sentinel.
///
/// `result` is written from position 0. Returns the number of rows written.
pub fn ordered_map_to_right_right_unique_streamed<K, L, R, D>(
    left: &L,
    right: &R,
    result: &mut D,
    chunk_len: usize,
) -> Result<usize>
where
    K: Copy + Ord,
    L: Column<K> + ?Sized,
    R: Column<K> + ?Sized,
    D: Column<u64> + ?Sized,
{
    let mut lefts = ColumnCursor::over(left, "left keys", chunk_len).ordered();
    let mut rights = ColumnCursor::over(right, "right keys", chunk_len).ordered();
    let mut writer = ColumnWriter::new(result, 0, chunk_len);

    let mut matched = 0usize;
    while let Some(key) = lefts.next_value()? {
        let mut hit = INVALID_INDEX;
        while let Some(candidate) = rights.peek()? {
            match candidate.cmp(&key) {
                Ordering::Less => {
                    rights.next_value()?;
                }
                Ordering::Equal => {
                    hit = rights.position() as u64;
                    matched += 1;
                    break;
                }
                Ordering::Greater => break,
            }
        }
        writer.push(hit)?;
    }
    let written = writer.finish()?;
    debug!(rows = written, matched, chunk_len, "streamed map-to-right complete");
    Ok(written)
}

fn streamed_inner<K, L, R, D>(
    left: &L,
    right: &R,
    left_result: &mut D,
    right_result: &mut D,
    chunk_len: usize,
    right_unique: bool,
) -> Result<usize>
where
    K: Copy + Ord,
    L: Column<K> + ?Sized,
    R: Column<K> + ?Sized,
    D: Column<u64> + ?Sized,
{
    let mut lefts = ColumnCursor::over(left, "left keys", chunk_len).ordered();
    let mut rights = ColumnCursor::over(right, "right keys", chunk_len).ordered();
    let mut left_writer = ColumnWriter::new(left_result, 0, chunk_len);
    let mut right_writer = ColumnWriter::new(right_result, 0, chunk_len);

    loop {
        let (l, r) = match (lefts.peek()?, rights.peek()?) {
            (Some(l), Some(r)) => (l, r),
            _ => break,
        };
        match l.cmp(&r) {
            Ordering::Less => advance_unique(&mut lefts, "left keys")?,
            Ordering::Greater if right_unique => advance_unique(&mut rights, "right keys")?,
            Ordering::Greater => {
                rights.next_value()?;
            }
            Ordering::Equal => {
                left_writer.push(lefts.position() as u64)?;
                right_writer.push(rights.position() as u64)?;
                if right_unique {
                    advance_unique(&mut lefts, "left keys")?;
                    advance_unique(&mut rights, "right keys")?;
                } else {
                    rights.next_value()?;
                    if rights.peek()? != Some(l) {
                        advance_unique(&mut lefts, "left keys")?;
                    }
                }
            }
        }
    }
    while !lefts.is_exhausted() {
        advance_unique(&mut lefts, "left keys")?;
    }
    while !rights.is_exhausted() {
        if right_unique {
            advance_unique(&mut rights, "right keys")?;
        } else {
            rights.next_value()?;
        }
    }

    let written = left_writer.finish()?;
    right_writer.finish()?;
    debug!(pairs = written, chunk_len, right_unique, "streamed inner join complete");
    Ok(written)
}

/// Streamed inner join where the left keys are unique. Writes the pairs to
/// `left_result` / `right_result` from position 0 and returns their count.
pub fn ordered_inner_map_left_unique_streamed<K, L, R, D>(
    left: &L,
    right: &R,
    left_result: &mut D,
    right_result: &mut D,
    chunk_len: usize,
) -> Result<usize>
where
    K: Copy + Ord,
    L: Column<K> + ?Sized,
    R: Column<K> + ?Sized,
    D: Column<u64> + ?Sized,
{
    streamed_inner(left, right, left_result, right_result, chunk_len, false)
}

/// Streamed inner join where both key columns are unique.
pub fn ordered_inner_map_both_unique_streamed<K, L, R, D>(
    left: &L,
    right: &R,
    left_result: &mut D,
    right_result: &mut D,
    chunk_len: usize,
) -> Result<usize>
where
    K: Copy + Ord,
    L: Column<K> + ?Sized,
    R: Column<K> + ?Sized,
    D: Column<u64> + ?Sized,
{
    streamed_inner(left, right, left_result, right_result, chunk_len, true)
}
