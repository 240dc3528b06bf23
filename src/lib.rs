//! snapshot-journal - ordered-sequence join, aggregation and journalling engine
//!
//! Building blocks for keeping an append-only history of periodic table
//! snapshots and correlating sorted datasets:
//!
//! - [`journal`]: align a new snapshot against accumulated history, keep only
//!   changed rows, and merge them in key order without touching old rows
//! - [`join`]: inner / left / outer multiset joins over sorted keys,
//!   including column-streamed variants
//! - [`spans`]: per-group position of min / max / first / last
//! - [`mapping`]: gathers through index maps that may hold [`INVALID_INDEX`]
//! - [`sort_merge`]: bounded-memory external argsort
//!
//! Everything operates on caller-owned slices or on the [`Column`] contract,
//! so large inputs can live in files ([`FileColumn`]) and be processed a
//! chunk at a time.

#![forbid(unsafe_code)]

pub mod column;
pub mod config;
pub mod error;
pub mod join;
pub mod journal;
pub mod mapping;
pub mod ordering;
pub mod sentinel;
pub mod sort_merge;
pub mod spans;

pub use column::{Column, ColumnCursor, ColumnWriter, FileColumn, FixedWidth, IndexedValues, MemColumn};
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use join::JoinMaps;
pub use journal::{JournalAlignment, JournalPlan};
pub use sentinel::{index_to_option, option_to_index, INVALID_INDEX};
