//! Phase 2: k-way merge of presorted segments.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::{debug, info};

use super::sort_segments;
use crate::column::{Column, ColumnCursor, ColumnWriter, FileColumn, FixedWidth};
use crate::config::EngineConfig;
use crate::error::{ensure_len, Error, Result};

struct SegmentReader<'a, V, SI: ?Sized, SV: ?Sized> {
    values: ColumnCursor<'a, V, SV>,
    index: ColumnCursor<'a, u64, SI>,
}

// Min-heap by value; the earlier segment wins ties so the merge stays stable.
struct HeapItem<V> {
    value: V,
    segment: usize,
}

impl<V: PartialOrd> Ord for HeapItem<V> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse for min-heap
        other
            .value
            .partial_cmp(&self.value)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.segment.cmp(&self.segment))
    }
}

impl<V: PartialOrd> PartialOrd for HeapItem<V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<V: PartialOrd> PartialEq for HeapItem<V> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<V: PartialOrd> Eq for HeapItem<V> {}

/// Merge the `segment_len`-row segments of a segment-sorted (index, value)
/// pair into globally sorted target columns, written from position 0.
///
/// Each segment is read through its own cursor of `chunk_len` rows, so peak
/// memory is `segments * chunk_len` pairs regardless of the column length.
/// Equal values keep their source order. Returns the number of rows merged.
pub fn streaming_sort_merge<V, SI, SV, TI, TV>(
    src_index: &SI,
    src_values: &SV,
    tgt_index: &mut TI,
    tgt_values: &mut TV,
    segment_len: usize,
    chunk_len: usize,
) -> Result<usize>
where
    V: Copy + PartialOrd,
    SI: Column<u64> + ?Sized,
    SV: Column<V> + ?Sized,
    TI: Column<u64> + ?Sized,
    TV: Column<V> + ?Sized,
{
    if segment_len == 0 {
        return Err(Error::Config("segment length must be positive".into()));
    }
    let len = src_values.len();
    ensure_len("source index column", len, src_index.len())?;

    let mut readers = Vec::with_capacity(len.div_ceil(segment_len));
    let mut heap = BinaryHeap::new();
    let mut start = 0;
    while start < len {
        let end = (start + segment_len).min(len);
        let mut reader = SegmentReader {
            values: ColumnCursor::new(src_values, "segment values", start..end, chunk_len)
                .ordered(),
            index: ColumnCursor::new(src_index, "segment index", start..end, chunk_len),
        };
        if let Some(value) = reader.values.peek()? {
            heap.push(HeapItem {
                value,
                segment: readers.len(),
            });
        }
        readers.push(reader);
        start = end;
    }
    debug!(rows = len, segments = readers.len(), chunk_len, "merging sorted segments");

    let mut value_writer = ColumnWriter::new(tgt_values, 0, chunk_len);
    let mut index_writer = ColumnWriter::new(tgt_index, 0, chunk_len);
    while let Some(item) = heap.pop() {
        let reader = &mut readers[item.segment];
        reader.values.next_value()?;
        let Some(index) = reader.index.next_value()? else {
            return Err(Error::length("segment index", len, reader.index.position()));
        };
        value_writer.push(item.value)?;
        index_writer.push(index)?;

        if let Some(value) = reader.values.peek()? {
            heap.push(HeapItem {
                value,
                segment: item.segment,
            });
        }
    }

    let merged = value_writer.finish()?;
    index_writer.finish()?;
    Ok(merged)
}

/// Bounded-memory argsort of `values` into (sorted value, original row)
/// target columns, staging through scratch files sized by `config`.
pub fn argsort_streamed<V, S, TI, TV>(
    values: &S,
    tgt_index: &mut TI,
    tgt_values: &mut TV,
    config: &EngineConfig,
) -> Result<usize>
where
    V: FixedWidth + PartialOrd,
    S: Column<V> + ?Sized,
    TI: Column<u64> + ?Sized,
    TV: Column<V> + ?Sized,
{
    config.validate()?;

    let mut stage_values = FileColumn::<V>::scratch()?;
    let mut stage_index = FileColumn::<u64>::scratch()?;
    {
        let mut source = ColumnCursor::over(values, "argsort input", config.stream_chunk_len);
        let mut value_writer = ColumnWriter::new(&mut stage_values, 0, config.stream_chunk_len);
        let mut index_writer = ColumnWriter::new(&mut stage_index, 0, config.stream_chunk_len);
        let mut row = 0u64;
        while let Some(value) = source.next_value()? {
            value_writer.push(value)?;
            index_writer.push(row)?;
            row += 1;
        }
        value_writer.finish()?;
        index_writer.finish()?;
    }

    let segments = sort_segments(&mut stage_index, &mut stage_values, config.sort_segment_len)?;
    let merged = streaming_sort_merge(
        &stage_index,
        &stage_values,
        tgt_index,
        tgt_values,
        config.sort_segment_len,
        config.merge_chunk_len,
    )?;
    info!(rows = merged, segments, "streamed argsort complete");
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::MemColumn;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn argsort(values: &[i64]) -> Vec<u64> {
        let mut order: Vec<u64> = (0..values.len() as u64).collect();
        order.sort_by_key(|&i| values[i as usize]);
        order
    }

    #[test]
    fn test_streaming_sort_merge_non_divisible_lengths() {
        let mut values: Vec<i64> = (1000..1105).collect();
        values.shuffle(&mut StdRng::seed_from_u64(7));

        let mut src_values = MemColumn::from(values.clone());
        let mut src_index = MemColumn::from((0..105u64).collect::<Vec<_>>());
        sort_segments(&mut src_index, &mut src_values, 25).unwrap();

        let mut tgt_index = MemColumn::<u64>::new();
        let mut tgt_values = MemColumn::<i64>::new();
        let merged =
            streaming_sort_merge(&src_index, &src_values, &mut tgt_index, &mut tgt_values, 25, 8)
                .unwrap();

        let mut expected = values.clone();
        expected.sort();
        assert_eq!(merged, 105);
        assert_eq!(tgt_values.as_slice(), expected.as_slice());
        assert_eq!(tgt_index.as_slice(), argsort(&values).as_slice());
    }

    #[test]
    fn test_streaming_sort_merge_keeps_ties_in_source_order() {
        let values = vec![2i64, 1, 2, 1, 2, 1, 0];
        let mut src_values = MemColumn::from(values.clone());
        let mut src_index = MemColumn::from((0..7u64).collect::<Vec<_>>());
        sort_segments(&mut src_index, &mut src_values, 3).unwrap();

        let mut tgt_index = MemColumn::<u64>::new();
        let mut tgt_values = MemColumn::<i64>::new();
        streaming_sort_merge(&src_index, &src_values, &mut tgt_index, &mut tgt_values, 3, 2)
            .unwrap();
        assert_eq!(tgt_values.as_slice(), &[0, 1, 1, 1, 2, 2, 2]);
        assert_eq!(tgt_index.as_slice(), &[6, 1, 3, 5, 0, 2, 4]);
    }

    #[test]
    fn test_streaming_sort_merge_rejects_unsorted_segment() {
        let src_values = MemColumn::from(vec![1i64, 3, 2, 4]);
        let src_index = MemColumn::from(vec![0u64, 1, 2, 3]);
        let mut tgt_index = MemColumn::<u64>::new();
        let mut tgt_values = MemColumn::<i64>::new();
        assert!(matches!(
            streaming_sort_merge(&src_index, &src_values, &mut tgt_index, &mut tgt_values, 4, 2),
            Err(Error::Unordered { position: 2, .. })
        ));
    }

    #[test]
    fn test_argsort_streamed_through_scratch_files() {
        let mut values: Vec<i64> = (0..200).map(|v| (v * 37) % 101).collect();
        values.shuffle(&mut StdRng::seed_from_u64(11));
        let source = MemColumn::from(values.clone());
        let config = EngineConfig::default()
            .with_stream_chunk_len(16)
            .with_sort_segment_len(30)
            .with_merge_chunk_len(7);

        let mut tgt_index = MemColumn::<u64>::new();
        let mut tgt_values = MemColumn::<i64>::new();
        let rows = argsort_streamed(&source, &mut tgt_index, &mut tgt_values, &config).unwrap();

        let mut expected = values.clone();
        expected.sort();
        assert_eq!(rows, 200);
        assert_eq!(tgt_values.as_slice(), expected.as_slice());
        assert_eq!(tgt_index.as_slice(), argsort(&values).as_slice());
    }
}
