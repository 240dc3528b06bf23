//! The invalid-index sentinel.
//!
//! Index maps are stored as `u64` arrays so they can live in a column; an
//! entry equal to [`INVALID_INDEX`] means "no source row". At single-value
//! boundaries the sentinel is converted to and from `Option<usize>`.

use crate::error::{Error, Result};

/// Out-of-range marker for "no corresponding source row".
pub const INVALID_INDEX: u64 = 1 << 62;

#[inline]
pub fn is_valid_index(raw: u64) -> bool {
    raw != INVALID_INDEX
}

#[inline]
pub fn index_to_option(raw: u64) -> Option<usize> {
    if raw == INVALID_INDEX {
        None
    } else {
        Some(raw as usize)
    }
}

#[inline]
pub fn option_to_index(index: Option<usize>) -> u64 {
    match index {
        Some(i) => i as u64,
        None => INVALID_INDEX,
    }
}

/// `entry != INVALID_INDEX` for every entry of `map`.
pub fn valid_filter(map: &[u64]) -> Vec<bool> {
    map.iter().map(|&raw| is_valid_index(raw)).collect()
}

/// Decode `map[position]` as an offset into a source of `len` rows.
///
/// Out-of-range entries are an error; the sentinel decodes to `None`.
pub(crate) fn checked_index(
    what: &'static str,
    map: &[u64],
    position: usize,
    len: usize,
) -> Result<Option<usize>> {
    let raw = map[position];
    if raw == INVALID_INDEX {
        return Ok(None);
    }
    if raw >= len as u64 {
        return Err(Error::IndexOutOfRange {
            what,
            position,
            index: raw,
            len,
        });
    }
    Ok(Some(raw as usize))
}
