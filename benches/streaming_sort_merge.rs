//! Streaming Sort-Merge Benchmark
//! Measures the segment sort and k-way merge phases separately

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use snapshot_journal::column::MemColumn;
use snapshot_journal::sort_merge::{sort_segments, streaming_sort_merge};

const ROWS: usize = 200_000;

fn shuffled_values() -> Vec<i64> {
    let mut values: Vec<i64> = (0..ROWS as i64).collect();
    values.shuffle(&mut StdRng::seed_from_u64(42));
    values
}

fn benchmark_sort_segments(c: &mut Criterion) {
    let values = shuffled_values();
    c.bench_function("sort_segments", |b| {
        b.iter(|| {
            let mut index = MemColumn::from((0..ROWS as u64).collect::<Vec<_>>());
            let mut vals = MemColumn::from(values.clone());
            black_box(sort_segments(&mut index, &mut vals, 16_384))
        })
    });
}

fn benchmark_merge(c: &mut Criterion) {
    let mut index = MemColumn::from((0..ROWS as u64).collect::<Vec<_>>());
    let mut values = MemColumn::from(shuffled_values());
    sort_segments(&mut index, &mut values, 16_384).unwrap();

    let mut group = c.benchmark_group("streaming_sort_merge");
    for chunk_len in [64usize, 1024, 8192] {
        group.bench_with_input(BenchmarkId::from_parameter(chunk_len), &chunk_len, |b, &chunk| {
            b.iter(|| {
                let mut tgt_index = MemColumn::<u64>::new();
                let mut tgt_values = MemColumn::<i64>::new();
                black_box(streaming_sort_merge(
                    &index,
                    &values,
                    &mut tgt_index,
                    &mut tgt_values,
                    16_384,
                    chunk,
                ))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_sort_segments, benchmark_merge);
criterion_main!(benches);
