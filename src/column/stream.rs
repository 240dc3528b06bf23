//! Chunked sequential access to columns.
//!
//! [`ColumnCursor`] and [`ColumnWriter`] hold at most one chunk of a column
//! at a time, so streamed operations run in memory proportional to the
//! chunk length rather than the column length.

use std::ops::Range;

use super::Column;
use crate::error::{Error, Result};

/// Forward-only chunked reader over a range of a column.
pub struct ColumnCursor<'a, T, C: ?Sized> {
    column: &'a C,
    what: &'static str,
    end: usize,
    chunk_len: usize,
    buffer: Vec<T>,
    buffer_start: usize,
    position: usize,
    check_order: bool,
    last_loaded: Option<T>,
}

impl<'a, T, C> ColumnCursor<'a, T, C>
where
    T: Copy + PartialOrd,
    C: Column<T> + ?Sized,
{
    pub fn new(column: &'a C, what: &'static str, range: Range<usize>, chunk_len: usize) -> Self {
        let end = range.end.min(column.len());
        Self {
            column,
            what,
            end,
            chunk_len: chunk_len.max(1),
            buffer: Vec::new(),
            buffer_start: range.start,
            position: range.start,
            check_order: false,
            last_loaded: None,
        }
    }

    /// Cursor over the whole column.
    pub fn over(column: &'a C, what: &'static str, chunk_len: usize) -> Self {
        Self::new(column, what, 0..column.len(), chunk_len)
    }

    /// Reject any decrease between consecutive values as chunks are loaded.
    pub fn ordered(mut self) -> Self {
        self.check_order = true;
        self
    }

    /// Absolute column position of the next value.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.end
    }

    pub fn peek(&mut self) -> Result<Option<T>> {
        if self.position >= self.end {
            return Ok(None);
        }
        if self.position >= self.buffer_start + self.buffer.len() {
            self.load(self.position)?;
        }
        Ok(Some(self.buffer[self.position - self.buffer_start]))
    }

    pub fn next_value(&mut self) -> Result<Option<T>> {
        let value = self.peek()?;
        if value.is_some() {
            self.position += 1;
        }
        Ok(value)
    }

    /// Value at absolute position `index`, which must not lie before the
    /// current chunk. Moves the cursor to `index + 1`.
    pub fn seek_read(&mut self, index: usize) -> Result<T> {
        if index < self.buffer_start {
            return Err(Error::Unordered {
                what: self.what,
                position: index,
            });
        }
        if index >= self.end {
            return Err(Error::IndexOutOfRange {
                what: self.what,
                position: self.position,
                index: index as u64,
                len: self.end,
            });
        }
        if index >= self.buffer_start + self.buffer.len() {
            self.load(index)?;
        }
        self.position = index + 1;
        Ok(self.buffer[index - self.buffer_start])
    }

    fn load(&mut self, start: usize) -> Result<()> {
        let stop = (start + self.chunk_len).min(self.end);
        self.buffer = self.column.read(start..stop)?;
        self.buffer_start = start;
        if self.check_order {
            let mut previous = self.last_loaded;
            for (offset, &value) in self.buffer.iter().enumerate() {
                if matches!(previous, Some(p) if value < p) {
                    return Err(Error::Unordered {
                        what: self.what,
                        position: start + offset,
                    });
                }
                previous = Some(value);
            }
        }
        if let Some(&last) = self.buffer.last() {
            self.last_loaded = Some(last);
        }
        Ok(())
    }
}

/// Sequential chunk-buffered writer into a column, starting at a fixed position.
pub struct ColumnWriter<'a, T, C: ?Sized> {
    column: &'a mut C,
    chunk_len: usize,
    buffer: Vec<T>,
    position: usize,
    written: usize,
}

impl<'a, T, C> ColumnWriter<'a, T, C>
where
    T: Copy,
    C: Column<T> + ?Sized,
{
    pub fn new(column: &'a mut C, start: usize, chunk_len: usize) -> Self {
        let chunk_len = chunk_len.max(1);
        Self {
            column,
            chunk_len,
            buffer: Vec::with_capacity(chunk_len),
            position: start,
            written: 0,
        }
    }

    pub fn push(&mut self, value: T) -> Result<()> {
        self.buffer.push(value);
        if self.buffer.len() >= self.chunk_len {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let end = self.position + self.buffer.len();
        self.column.write(self.position..end, &self.buffer)?;
        self.written += self.buffer.len();
        self.position = end;
        self.buffer.clear();
        Ok(())
    }

    /// Flush and return the number of values written.
    pub fn finish(mut self) -> Result<usize> {
        self.flush()?;
        Ok(self.written)
    }
}
