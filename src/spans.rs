//! Span partitions and per-span aggregation.
//!
//! A span partition `[s0 = 0, s1, .., sk = N]` splits N values into k
//! half-open spans `[s_i, s_{i+1})`. The aggregators write, per span, the
//! *position* of the selected value. The plain variants reject empty spans;
//! the `_filter` variants mark them `false` and leave `dest` untouched.

use crate::error::{ensure_len, Error, Result};

/// Span partition of a sorted key sequence: one span per run of equal keys.
pub fn get_spans<T: PartialEq>(keys: &[T]) -> Vec<u64> {
    let mut spans = Vec::with_capacity(keys.len() / 2 + 2);
    spans.push(0);
    for i in 1..keys.len() {
        if keys[i] != keys[i - 1] {
            spans.push(i as u64);
        }
    }
    if !keys.is_empty() {
        spans.push(keys.len() as u64);
    }
    spans
}

/// Check the partition shape; returns the number of spans.
fn validate_spans(spans: &[u64], values_len: Option<usize>) -> Result<usize> {
    if spans.first() != Some(&0) {
        return Err(Error::MalformedOffsets {
            what: "spans",
            row: 0,
        });
    }
    if let Some(row) = spans.windows(2).position(|w| w[1] < w[0]) {
        return Err(Error::MalformedOffsets { what: "spans", row });
    }
    if let Some(len) = values_len {
        ensure_len("span partition end", len, spans[spans.len() - 1] as usize)?;
    }
    Ok(spans.len() - 1)
}

fn apply_spans<F>(
    spans: &[u64],
    values_len: Option<usize>,
    dest: &mut [u64],
    mut filter: Option<&mut [bool]>,
    pick: F,
) -> Result<()>
where
    F: Fn(usize, usize) -> usize,
{
    let count = validate_spans(spans, values_len)?;
    ensure_len("span destination", count, dest.len())?;
    if let Some(f) = filter.as_deref() {
        ensure_len("span filter", count, f.len())?;
    }
    for i in 0..count {
        let (start, end) = (spans[i] as usize, spans[i + 1] as usize);
        let non_empty = start < end;
        match filter.as_deref_mut() {
            Some(f) => f[i] = non_empty,
            None if !non_empty => return Err(Error::EmptySpan { span: i }),
            None => {}
        }
        if non_empty {
            dest[i] = pick(start, end) as u64;
        }
    }
    Ok(())
}

fn index_of_min<T: PartialOrd>(values: &[T], start: usize, end: usize) -> usize {
    let mut best = start;
    for p in start + 1..end {
        if values[p] < values[best] {
            best = p;
        }
    }
    best
}

fn index_of_max<T: PartialOrd>(values: &[T], start: usize, end: usize) -> usize {
    let mut best = start;
    for p in start + 1..end {
        if values[p] > values[best] {
            best = p;
        }
    }
    best
}

/// Position of the first minimum of each span.
pub fn apply_spans_index_of_min<T: PartialOrd>(
    spans: &[u64],
    values: &[T],
    dest: &mut [u64],
) -> Result<()> {
    apply_spans(spans, Some(values.len()), dest, None, |s, e| {
        index_of_min(values, s, e)
    })
}

/// Position of the first maximum of each span.
pub fn apply_spans_index_of_max<T: PartialOrd>(
    spans: &[u64],
    values: &[T],
    dest: &mut [u64],
) -> Result<()> {
    apply_spans(spans, Some(values.len()), dest, None, |s, e| {
        index_of_max(values, s, e)
    })
}

pub fn apply_spans_index_of_first(spans: &[u64], dest: &mut [u64]) -> Result<()> {
    apply_spans(spans, None, dest, None, |s, _| s)
}

pub fn apply_spans_index_of_last(spans: &[u64], dest: &mut [u64]) -> Result<()> {
    apply_spans(spans, None, dest, None, |_, e| e - 1)
}

pub fn apply_spans_index_of_min_filter<T: PartialOrd>(
    spans: &[u64],
    values: &[T],
    dest: &mut [u64],
    filter: &mut [bool],
) -> Result<()> {
    apply_spans(spans, Some(values.len()), dest, Some(filter), |s, e| {
        index_of_min(values, s, e)
    })
}

pub fn apply_spans_index_of_max_filter<T: PartialOrd>(
    spans: &[u64],
    values: &[T],
    dest: &mut [u64],
    filter: &mut [bool],
) -> Result<()> {
    apply_spans(spans, Some(values.len()), dest, Some(filter), |s, e| {
        index_of_max(values, s, e)
    })
}

pub fn apply_spans_index_of_first_filter(
    spans: &[u64],
    dest: &mut [u64],
    filter: &mut [bool],
) -> Result<()> {
    apply_spans(spans, None, dest, Some(filter), |s, _| s)
}

pub fn apply_spans_index_of_last_filter(
    spans: &[u64],
    dest: &mut [u64],
    filter: &mut [bool],
) -> Result<()> {
    apply_spans(spans, None, dest, Some(filter), |_, e| e - 1)
}
