//! Engine tunables.
//!
//! Values come from defaults, a JSON document, or the environment (an
//! optional `.env` file is loaded first, then `SNAPSHOT_JOURNAL_*` variables
//! override the defaults).

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

pub const ENV_STREAM_CHUNK: &str = "SNAPSHOT_JOURNAL_STREAM_CHUNK";
pub const ENV_SEGMENT: &str = "SNAPSHOT_JOURNAL_SEGMENT";
pub const ENV_MERGE_CHUNK: &str = "SNAPSHOT_JOURNAL_MERGE_CHUNK";

/// Chunk and segment lengths used by the streamed operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rows read or written per chunk by streamed gathers and joins.
    pub stream_chunk_len: usize,
    /// Rows per independently sorted segment before the k-way merge.
    pub sort_segment_len: usize,
    /// Rows buffered per segment (and per output flush) during the merge.
    pub merge_chunk_len: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stream_chunk_len: 1 << 16,
            sort_segment_len: 1 << 22,
            merge_chunk_len: 1 << 14,
        }
    }
}

impl EngineConfig {
    pub fn with_stream_chunk_len(mut self, len: usize) -> Self {
        self.stream_chunk_len = len;
        self
    }

    pub fn with_sort_segment_len(mut self, len: usize) -> Self {
        self.sort_segment_len = len;
        self
    }

    pub fn with_merge_chunk_len(mut self, len: usize) -> Self {
        self.merge_chunk_len = len;
        self
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("stream_chunk_len", self.stream_chunk_len),
            ("sort_segment_len", self.sort_segment_len),
            ("merge_chunk_len", self.merge_chunk_len),
        ] {
            if value == 0 {
                return Err(Error::Config(format!("{name} must be > 0")));
            }
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Defaults overridden by `SNAPSHOT_JOURNAL_*` variables.
    pub fn from_env() -> Result<Self> {
        // a missing .env file is fine; variables may come from the process
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let parse = |name: &str, current: usize| -> Result<usize> {
            match lookup(name) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .map_err(|_| Error::Config(format!("{name}={raw:?} is not a row count"))),
                None => Ok(current),
            }
        };
        config.stream_chunk_len = parse(ENV_STREAM_CHUNK, config.stream_chunk_len)?;
        config.sort_segment_len = parse(ENV_SEGMENT, config.sort_segment_len)?;
        config.merge_chunk_len = parse(ENV_MERGE_CHUNK, config.merge_chunk_len)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_json_fills_missing_fields_with_defaults() {
        let config = EngineConfig::from_json_str(r#"{ "sort_segment_len": 25 }"#).unwrap();
        assert_eq!(config.sort_segment_len, 25);
        assert_eq!(
            config.merge_chunk_len,
            EngineConfig::default().merge_chunk_len
        );
    }

    #[test]
    fn test_zero_lengths_are_rejected() {
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "merge_chunk_len": 0 }"#),
            Err(Error::Config(_))
        ));
        assert!(EngineConfig::default()
            .with_stream_chunk_len(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_lookup_overrides() {
        let vars: HashMap<&str, &str> =
            [(ENV_SEGMENT, "25"), (ENV_MERGE_CHUNK, " 8 ")].into_iter().collect();
        let config =
            EngineConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap();
        assert_eq!(config.sort_segment_len, 25);
        assert_eq!(config.merge_chunk_len, 8);
        assert_eq!(
            config.stream_chunk_len,
            EngineConfig::default().stream_chunk_len
        );

        let bad = EngineConfig::from_lookup(|name| {
            (name == ENV_STREAM_CHUNK).then(|| "lots".to_string())
        });
        assert!(matches!(bad, Err(Error::Config(_))));
    }
}
