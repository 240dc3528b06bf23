//! External sort for (index, value) column pairs.
//!
//! Columns too large to sort in memory are sorted in two passes:
//!
//! 1. **Segment sort**: every `segment_len` rows are sorted in place by value
//!    with the row index carried along ([`sort_segments`])
//! 2. **K-way merge**: the sorted segments are merged through a min-heap,
//!    each segment read `chunk_len` rows at a time ([`streaming_sort_merge`])
//!
//! The result equals a stable in-memory sort by value paired with the
//! argsort. Segment and chunk lengths are independent; neither needs to
//! divide the column length.

mod merge;
mod segment;

pub use merge::{argsort_streamed, streaming_sort_merge};
pub use segment::sort_segments;
