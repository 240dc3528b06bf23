//! Variable-length rows as an offsets array plus a flat byte buffer.

use crate::error::{Error, Result};

/// Owned indexed column: row `i` is `values[offsets[i]..offsets[i + 1]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedValues {
    pub offsets: Vec<u64>,
    pub values: Vec<u8>,
}

impl Default for IndexedValues {
    fn default() -> Self {
        Self {
            offsets: vec![0],
            values: Vec::new(),
        }
    }
}

impl IndexedValues {
    pub fn from_rows<I, R>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[u8]>,
    {
        let mut out = Self::default();
        for row in rows {
            out.push(row.as_ref());
        }
        out
    }

    pub fn push(&mut self, row: &[u8]) {
        self.values.extend_from_slice(row);
        self.offsets.push(self.values.len() as u64);
    }

    pub fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn row(&self, i: usize) -> &[u8] {
        row(&self.offsets, &self.values, i)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.len()).map(move |i| self.row(i))
    }

    pub fn validate(&self) -> Result<()> {
        validate_offsets("indexed values", &self.offsets, self.values.len()).map(|_| ())
    }
}

#[inline]
pub(crate) fn row<'a>(offsets: &[u64], values: &'a [u8], i: usize) -> &'a [u8] {
    &values[offsets[i] as usize..offsets[i + 1] as usize]
}

#[inline]
pub(crate) fn row_len(offsets: &[u64], i: usize) -> usize {
    (offsets[i + 1] - offsets[i]) as usize
}

/// Check that `offsets` is non-empty, non-decreasing and stays inside a
/// buffer of `values_len` bytes. Returns the row count.
pub(crate) fn validate_offsets(
    what: &'static str,
    offsets: &[u64],
    values_len: usize,
) -> Result<usize> {
    let Some(&last) = offsets.last() else {
        return Err(Error::MalformedOffsets { what, row: 0 });
    };
    if let Some(row) = offsets.windows(2).position(|w| w[1] < w[0]) {
        return Err(Error::MalformedOffsets { what, row });
    }
    if last as usize > values_len {
        return Err(Error::MalformedOffsets {
            what,
            row: offsets.len() - 2,
        });
    }
    Ok(offsets.len() - 1)
}
