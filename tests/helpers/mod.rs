//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::cell::Cell;
use std::ops::Range;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use snapshot_journal::{Column, Result};

/// Install a test-writer subscriber once so `RUST_LOG`-style output shows up
/// under `cargo test -- --nocapture`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Column wrapper that records how much it is asked to read at once.
pub struct TrackingColumn<C> {
    pub inner: C,
    max_read: Cell<usize>,
    reads: Cell<usize>,
}

impl<C> TrackingColumn<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            max_read: Cell::new(0),
            reads: Cell::new(0),
        }
    }

    pub fn max_read(&self) -> usize {
        self.max_read.get()
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl<T: Copy, C: Column<T>> Column<T> for TrackingColumn<C> {
    fn len(&self) -> usize {
        self.inner.len()
    }

    fn read(&self, range: Range<usize>) -> Result<Vec<T>> {
        self.max_read.set(self.max_read.get().max(range.len()));
        self.reads.set(self.reads.get() + 1);
        self.inner.read(range)
    }

    fn write(&mut self, range: Range<usize>, values: &[T]) -> Result<()> {
        self.inner.write(range, values)
    }
}

/// `base..base + len` in a seeded random order.
pub fn shuffled(base: i64, len: usize, seed: u64) -> Vec<i64> {
    let mut values: Vec<i64> = (base..base + len as i64).collect();
    values.shuffle(&mut StdRng::seed_from_u64(seed));
    values
}

/// Stable argsort, the reference the external sort must match.
pub fn argsort<T: Ord>(values: &[T]) -> Vec<u64> {
    let mut order: Vec<u64> = (0..values.len() as u64).collect();
    order.sort_by(|&a, &b| values[a as usize].cmp(&values[b as usize]));
    order
}
