//! Column store contract consumed by the engine.
//!
//! A [`Column`] is a typed, resizable array that can be read and written in
//! arbitrary sub-ranges, so streamed operations never need a whole column
//! resident. Two backends are provided:
//!
//! - [`MemColumn`]: a `Vec` in memory
//! - [`FileColumn`]: fixed-width little-endian records in a file
//!
//! Variable-length rows are held as [`IndexedValues`] (offsets + bytes).

mod file;
pub(crate) mod indexed;
mod stream;

pub use file::FileColumn;
pub use indexed::IndexedValues;
pub use stream::{ColumnCursor, ColumnWriter};

use std::ops::Range;

use crate::error::{ensure_len, Error, Result};

/// Chunked, typed array storage.
pub trait Column<T: Copy> {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy out `range`, which must lie within `0..len()`.
    fn read(&self, range: Range<usize>) -> Result<Vec<T>>;

    /// Overwrite `range` with `values`.
    ///
    /// `range.start` may equal `len()` (and `range.end` exceed it) to grow the
    /// column contiguously; a gap past the end is an error.
    fn write(&mut self, range: Range<usize>, values: &[T]) -> Result<()>;

    fn append(&mut self, values: &[T]) -> Result<()> {
        let start = self.len();
        self.write(start..start + values.len(), values)
    }
}

pub(crate) fn check_read_range(range: &Range<usize>, len: usize) -> Result<()> {
    if range.start > range.end || range.end > len {
        return Err(Error::IndexOutOfRange {
            what: "column read",
            position: range.start,
            index: range.end as u64,
            len,
        });
    }
    Ok(())
}

pub(crate) fn check_write_range(range: &Range<usize>, values: usize, len: usize) -> Result<()> {
    ensure_len("column write", range.end.saturating_sub(range.start), values)?;
    if range.start > len || range.start > range.end {
        return Err(Error::IndexOutOfRange {
            what: "column write",
            position: range.start,
            index: range.start as u64,
            len,
        });
    }
    Ok(())
}

/// Fixed-width little-endian encoding of a column element.
pub trait FixedWidth: Copy + Default {
    const WIDTH: usize;

    fn encode(self, out: &mut [u8]);

    fn decode(buf: &[u8]) -> Self;
}

macro_rules! fixed_width_le {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FixedWidth for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn encode(self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_le_bytes());
                }

                #[inline]
                fn decode(buf: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(buf);
                    <$ty>::from_le_bytes(raw)
                }
            }
        )*
    };
}

fixed_width_le!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl FixedWidth for bool {
    const WIDTH: usize = 1;

    #[inline]
    fn encode(self, out: &mut [u8]) {
        out[0] = u8::from(self);
    }

    #[inline]
    fn decode(buf: &[u8]) -> Self {
        buf[0] != 0
    }
}

/// In-memory column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemColumn<T> {
    values: Vec<T>,
}

impl<T: Copy> MemColumn<T> {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    pub fn into_vec(self) -> Vec<T> {
        self.values
    }
}

impl<T> From<Vec<T>> for MemColumn<T> {
    fn from(values: Vec<T>) -> Self {
        Self { values }
    }
}

impl<T: Copy> Column<T> for MemColumn<T> {
    fn len(&self) -> usize {
        self.values.len()
    }

    fn read(&self, range: Range<usize>) -> Result<Vec<T>> {
        check_read_range(&range, self.values.len())?;
        Ok(self.values[range].to_vec())
    }

    fn write(&mut self, range: Range<usize>, values: &[T]) -> Result<()> {
        check_write_range(&range, values.len(), self.values.len())?;
        let overlap = range.end.min(self.values.len());
        let split = overlap - range.start;
        self.values[range.start..overlap].copy_from_slice(&values[..split]);
        self.values.extend_from_slice(&values[split..]);
        Ok(())
    }
}
