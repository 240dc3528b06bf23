//! Ordering predicates over key sequences.

use crate::error::{Error, Result};

/// True iff `values` never decreases.
pub fn is_ordered<T: PartialOrd>(values: &[T]) -> bool {
    values.windows(2).all(|w| w[0] <= w[1])
}

/// True iff `values` strictly increases.
pub fn is_unique_ordered<T: PartialOrd>(values: &[T]) -> bool {
    values.windows(2).all(|w| w[0] < w[1])
}

pub(crate) fn validate_ordered<T: PartialOrd>(what: &'static str, values: &[T]) -> Result<()> {
    match values.windows(2).position(|w| w[1] < w[0]) {
        Some(i) => Err(Error::Unordered {
            what,
            position: i + 1,
        }),
        None => Ok(()),
    }
}

pub(crate) fn validate_unique_ordered<T: PartialOrd>(
    what: &'static str,
    values: &[T],
) -> Result<()> {
    validate_ordered(what, values)?;
    match values.windows(2).position(|w| w[1] == w[0]) {
        Some(i) => Err(Error::NotUnique {
            what,
            position: i + 1,
        }),
        None => Ok(()),
    }
}

/// Mark the last row of every run of equal keys.
pub fn ordered_get_last_as_filter<T: PartialEq>(keys: &[T]) -> Vec<bool> {
    let mut filter = vec![false; keys.len()];
    for i in 0..keys.len() {
        filter[i] = i + 1 == keys.len() || keys[i] != keys[i + 1];
    }
    filter
}

/// Mark the first row of every run of equal keys.
pub fn ordered_get_first_as_filter<T: PartialEq>(keys: &[T]) -> Vec<bool> {
    let mut filter = vec![false; keys.len()];
    for i in 0..keys.len() {
        filter[i] = i == 0 || keys[i] != keys[i - 1];
    }
    filter
}

/// Length of the run of values equal to `values[start]`.
#[inline]
pub(crate) fn run_length<T: PartialEq>(values: &[T], start: usize) -> usize {
    let key = &values[start];
    values[start..].iter().take_while(|v| *v == key).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_ordered() {
        assert!(is_ordered(&[1, 2, 3, 4, 5]));
        assert!(!is_ordered(&[5, 4, 3, 2, 1]));
        assert!(!is_ordered(&[1, 2, 4, 3, 5]));
        assert!(is_ordered(&[1, 1, 1, 1, 1]));
        assert!(is_ordered::<i32>(&[]));

        assert!(!is_unique_ordered(&[1, 1, 2]));
        assert!(is_unique_ordered(&["ab", "af", "be"]));
    }

    #[test]
    fn test_validate_reports_first_offender() {
        assert!(matches!(
            validate_ordered("keys", &[1, 2, 4, 3, 5]),
            Err(Error::Unordered { position: 3, .. })
        ));
        assert!(matches!(
            validate_unique_ordered("keys", &[1, 2, 2, 3]),
            Err(Error::NotUnique { position: 2, .. })
        ));
    }

    #[test]
    fn test_get_last_as_filter() {
        let keys: [&[u8]; 7] = [b"ab", b"ab", b"af", b"be", b"be", b"ez", b"ez"];
        assert_eq!(
            ordered_get_last_as_filter(&keys),
            vec![false, true, true, false, true, false, true]
        );

        let unique: [&[u8]; 4] = [b"ab", b"af", b"be", b"ez"];
        assert_eq!(ordered_get_last_as_filter(&unique), vec![true; 4]);
    }

    #[test]
    fn test_get_first_as_filter() {
        assert_eq!(
            ordered_get_first_as_filter(&[1, 1, 2, 3, 3]),
            vec![true, false, true, true, false]
        );
        assert!(ordered_get_first_as_filter::<u8>(&[]).is_empty());
    }

    #[test]
    fn test_run_length() {
        let values = [0, 0, 0, 1, 2, 2];
        assert_eq!(run_length(&values, 0), 3);
        assert_eq!(run_length(&values, 1), 2);
        assert_eq!(run_length(&values, 3), 1);
        assert_eq!(run_length(&values, 4), 2);
    }
}
