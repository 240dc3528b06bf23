//! Gathers driven by index maps that may contain the invalid sentinel.
//!
//! The in-memory gathers fill unmapped destinations with a caller-supplied
//! empty value. The streamed gather fills them with `T::default()` instead;
//! the two behaviours are deliberately kept apart.

use tracing::debug;

use crate::column::indexed::{row, row_len, validate_offsets};
use crate::column::{Column, ColumnCursor, ColumnWriter, IndexedValues};
use crate::error::{ensure_len, Error, Result};
use crate::sentinel::{checked_index, INVALID_INDEX};

/// Decode every entry of `map` against a source of `len` rows, honouring `filter`.
fn resolve_map(map: &[u64], filter: &[bool], len: usize) -> Result<Vec<Option<usize>>> {
    ensure_len("valid filter", map.len(), filter.len())?;
    let mut resolved = Vec::with_capacity(map.len());
    for (i, &keep) in filter.iter().enumerate() {
        let index = checked_index("index map", map, i, len)?;
        if !keep {
            resolved.push(None);
            continue;
        }
        match index {
            Some(src) => resolved.push(Some(src)),
            None => {
                return Err(Error::SentinelMisuse {
                    what: "index map",
                    position: i,
                })
            }
        }
    }
    Ok(resolved)
}

/// `mapped[i] = values[map[i]]` where `filter[i]`, else `empty`.
pub fn safe_map_values<T: Copy>(
    values: &[T],
    map: &[u64],
    filter: &[bool],
    empty: T,
) -> Result<Vec<T>> {
    let resolved = resolve_map(map, filter, values.len())?;
    Ok(resolved
        .into_iter()
        .map(|src| src.map_or(empty, |s| values[s]))
        .collect())
}

/// Row-wise gather over an indexed column; unmapped rows become `empty`.
pub fn safe_map_indexed_values(
    offsets: &[u64],
    values: &[u8],
    map: &[u64],
    filter: &[bool],
    empty: &[u8],
) -> Result<IndexedValues> {
    let rows = validate_offsets("source offsets", offsets, values.len())?;
    let resolved = resolve_map(map, filter, rows)?;

    let total: usize = resolved
        .iter()
        .map(|src| src.map_or(empty.len(), |s| row_len(offsets, s)))
        .sum();

    let mut out = IndexedValues {
        offsets: Vec::with_capacity(resolved.len() + 1),
        values: Vec::with_capacity(total),
    };
    out.offsets.push(0);
    for src in resolved {
        match src {
            Some(s) => out.values.extend_from_slice(row(offsets, values, s)),
            None => out.values.extend_from_slice(empty),
        }
        out.offsets.push(out.values.len() as u64);
    }
    Ok(out)
}

/// `values[index[i]]` for every `i`; every entry must be a valid offset.
pub fn apply_index<T: Copy>(index: &[u64], values: &[T]) -> Result<Vec<T>> {
    let mut out = Vec::with_capacity(index.len());
    for i in 0..index.len() {
        match checked_index("index", index, i, values.len())? {
            Some(src) => out.push(values[src]),
            None => {
                return Err(Error::SentinelMisuse {
                    what: "index",
                    position: i,
                })
            }
        }
    }
    Ok(out)
}

/// Streamed gather `dest[i] = src[map[i]]`, with `T::default()` where
/// `map[i]` is the sentinel.
///
/// Valid entries of `map` must be non-decreasing. Both `src` and `map` are
/// read `chunk_len` rows at a time and `dest` is written from position 0 in
/// chunks of the same length. Returns the number of rows written.
pub fn ordered_map_valid_stream<T, S, M, D>(
    src: &S,
    map: &M,
    dest: &mut D,
    chunk_len: usize,
) -> Result<usize>
where
    T: Copy + PartialOrd + Default,
    S: Column<T> + ?Sized,
    M: Column<u64> + ?Sized,
    D: Column<T> + ?Sized,
{
    let mut map_cursor = ColumnCursor::over(map, "index map", chunk_len);
    let mut src_cursor = ColumnCursor::over(src, "source", chunk_len);
    let mut writer = ColumnWriter::new(dest, 0, chunk_len);

    let mut last_valid = 0u64;
    let mut unmapped = 0usize;
    while let Some(raw) = map_cursor.next_value()? {
        let position = map_cursor.position() - 1;
        if raw == INVALID_INDEX {
            unmapped += 1;
            writer.push(T::default())?;
            continue;
        }
        if raw < last_valid {
            return Err(Error::Unordered {
                what: "index map",
                position,
            });
        }
        if raw >= src.len() as u64 {
            return Err(Error::IndexOutOfRange {
                what: "index map",
                position,
                index: raw,
                len: src.len(),
            });
        }
        last_valid = raw;
        writer.push(src_cursor.seek_read(raw as usize)?)?;
    }
    let written = writer.finish()?;
    debug!(rows = written, unmapped, chunk_len, "streamed valid map complete");
    Ok(written)
}
