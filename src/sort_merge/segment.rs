//! Phase 1: sort fixed-length segments in place.

use std::cmp::Ordering;

use tracing::trace;

use crate::column::Column;
use crate::error::{ensure_len, Error, Result};

/// Stable sort of every `segment_len` rows of an (index, value) column pair
/// by value, carrying the index along. Returns the number of segments.
///
/// Only one segment is resident at a time.
pub fn sort_segments<V, I, S>(index: &mut I, values: &mut S, segment_len: usize) -> Result<usize>
where
    V: Copy + PartialOrd,
    I: Column<u64> + ?Sized,
    S: Column<V> + ?Sized,
{
    if segment_len == 0 {
        return Err(Error::Config("segment length must be positive".into()));
    }
    ensure_len("index column", values.len(), index.len())?;

    let len = values.len();
    let mut segments = 0;
    let mut start = 0;
    while start < len {
        let end = (start + segment_len).min(len);
        let mut rows: Vec<(V, u64)> = values
            .read(start..end)?
            .into_iter()
            .zip(index.read(start..end)?)
            .collect();
        rows.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

        let (sorted_values, sorted_index): (Vec<V>, Vec<u64>) = rows.into_iter().unzip();
        values.write(start..end, &sorted_values)?;
        index.write(start..end, &sorted_index)?;

        trace!(segment = segments, start, end, "segment sorted");
        segments += 1;
        start = end;
    }
    Ok(segments)
}
