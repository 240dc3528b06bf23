//! File-backed fixed-width column.
//!
//! Records are stored back to back as little-endian `T::WIDTH`-byte values.
//! Reads and writes seek to the requested range and touch nothing else.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::ops::Range;
use std::path::Path;

use tracing::trace;

use super::{check_read_range, check_write_range, Column, FixedWidth};
use crate::error::Result;

pub struct FileColumn<T> {
    file: File,
    len: usize,
    _marker: PhantomData<T>,
}

impl<T: FixedWidth> FileColumn<T> {
    /// Create (or truncate) a column at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .read(true)
            .write(true)
            .open(path)?;
        Ok(Self::from_file(file, 0))
    }

    /// Open an existing column; the file length must be a whole number of records.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        let bytes = file.metadata()?.len() as usize;
        if bytes % T::WIDTH != 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "{} is {} bytes, not a multiple of the {}-byte record width",
                    path.display(),
                    bytes,
                    T::WIDTH
                ),
            )
            .into());
        }
        Ok(Self::from_file(file, bytes / T::WIDTH))
    }

    /// Anonymous column in a temporary file, removed when dropped.
    pub fn scratch() -> Result<Self> {
        Ok(Self::from_file(tempfile::tempfile()?, 0))
    }

    fn from_file(file: File, len: usize) -> Self {
        Self {
            file,
            len,
            _marker: PhantomData,
        }
    }

    pub fn sync(&self) -> Result<()> {
        self.file.sync_data()?;
        Ok(())
    }
}

impl<T: FixedWidth> Column<T> for FileColumn<T> {
    fn len(&self) -> usize {
        self.len
    }

    fn read(&self, range: Range<usize>) -> Result<Vec<T>> {
        check_read_range(&range, self.len)?;
        let count = range.end - range.start;
        if count == 0 {
            return Ok(Vec::new());
        }
        let mut raw = vec![0u8; count * T::WIDTH];
        let mut file = &self.file;
        file.seek(SeekFrom::Start((range.start * T::WIDTH) as u64))?;
        file.read_exact(&mut raw)?;
        trace!(start = range.start, count, "file column read");
        Ok(raw.chunks_exact(T::WIDTH).map(T::decode).collect())
    }

    fn write(&mut self, range: Range<usize>, values: &[T]) -> Result<()> {
        check_write_range(&range, values.len(), self.len)?;
        if values.is_empty() {
            return Ok(());
        }
        let mut raw = vec![0u8; values.len() * T::WIDTH];
        for (value, out) in values.iter().zip(raw.chunks_exact_mut(T::WIDTH)) {
            value.encode(out);
        }
        self.file
            .seek(SeekFrom::Start((range.start * T::WIDTH) as u64))?;
        self.file.write_all(&raw)?;
        self.len = self.len.max(range.end);
        trace!(start = range.start, count = values.len(), "file column write");
        Ok(())
    }
}
