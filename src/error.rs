//! Error taxonomy for the engine.
//!
//! Every failure at this layer is a precondition violation detected before
//! any output is produced, or an I/O failure from a file-backed column.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A key sequence decreases somewhere.
    #[error("{what} is not ordered: position {position} is less than its predecessor")]
    Unordered { what: &'static str, position: usize },

    /// A sequence required to hold unique keys repeats one.
    #[error("{what} is not unique: position {position} repeats its predecessor")]
    NotUnique { what: &'static str, position: usize },

    #[error("length mismatch: {what} has {actual} entries, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A non-sentinel index map entry points outside its source.
    #[error("{what}[{position}] = {index} is out of range for a source of {len} rows")]
    IndexOutOfRange {
        what: &'static str,
        position: usize,
        index: u64,
        len: usize,
    },

    /// An entry marked valid carries the invalid sentinel.
    #[error("{what}[{position}] is marked valid but holds the invalid sentinel")]
    SentinelMisuse { what: &'static str, position: usize },

    /// A caller-allocated destination is too small.
    #[error("destination {what} holds {capacity} entries but at least {required} are required")]
    Capacity {
        what: &'static str,
        required: usize,
        capacity: usize,
    },

    #[error("offsets of {what} are malformed at row {row}")]
    MalformedOffsets { what: &'static str, row: usize },

    #[error("span {span} is empty")]
    EmptySpan { span: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn length(what: &'static str, expected: usize, actual: usize) -> Self {
        Error::LengthMismatch {
            what,
            expected,
            actual,
        }
    }
}

/// Fail with [`Error::LengthMismatch`] unless `actual == expected`.
pub(crate) fn ensure_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::length(what, expected, actual))
    }
}

/// Fail with [`Error::Capacity`] unless `capacity >= required`.
pub(crate) fn ensure_capacity(what: &'static str, required: usize, capacity: usize) -> Result<()> {
    if capacity >= required {
        Ok(())
    } else {
        Err(Error::Capacity {
            what,
            required,
            capacity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_offender() {
        let err = Error::Unordered {
            what: "left keys",
            position: 4,
        };
        assert_eq!(
            err.to_string(),
            "left keys is not ordered: position 4 is less than its predecessor"
        );

        let err = ensure_capacity("a_map", 15, 10).unwrap_err();
        assert!(err.to_string().contains("at least 15"));
    }

    #[test]
    fn test_ensure_len() {
        assert!(ensure_len("filter", 3, 3).is_ok());
        assert!(matches!(
            ensure_len("filter", 3, 2),
            Err(Error::LengthMismatch { expected: 3, actual: 2, .. })
        ));
    }
}
