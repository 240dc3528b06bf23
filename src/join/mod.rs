//! Ordered multiset join engine.
//!
//! All joins operate on two non-decreasing key sequences and emit index
//! pairs in increasing key order. Equal-key runs produce their full cross
//! product, left run outer and right run inner. Unmatched sides are encoded
//! with [`INVALID_INDEX`](crate::sentinel::INVALID_INDEX).
//!
//! ## Sizing
//!
//! Output arrays are caller-allocated. Call the matching `*_result_size`
//! first; materializing into a shorter destination fails with
//! [`Error::Capacity`](crate::Error::Capacity) instead of truncating.
//!
//! ## Unique fast paths
//!
//! `*_left_unique` / `*_both_unique` / `*_right_unique` variants reduce to a
//! two-pointer merge and validate the uniqueness they assume.

mod inner;
mod map_to_right;
mod outer;
mod streamed;

pub use inner::{
    ordered_inner_map, ordered_inner_map_both_unique, ordered_inner_map_left_unique,
    ordered_inner_map_result_size,
};
pub use map_to_right::{ordered_map_to_right_both_unique, ordered_map_to_right_right_unique};
pub use outer::{
    ordered_left_map, ordered_left_map_result_size, ordered_outer_map_both_unique,
    ordered_outer_map_result_size_both_unique,
};
pub use streamed::{
    ordered_inner_map_both_unique_streamed, ordered_inner_map_left_unique_streamed,
    ordered_map_to_right_right_unique_streamed,
};

use crate::error::{ensure_capacity, ensure_len, Result};
use crate::sentinel::index_to_option;

/// Sequential writer over a caller-allocated pair of join maps.
pub(crate) struct PairSink<'a> {
    left: &'a mut [u64],
    right: &'a mut [u64],
    len: usize,
}

impl<'a> PairSink<'a> {
    /// Sink for exactly `required` pairs. Fails before touching either map
    /// if they are shorter.
    pub(crate) fn new(left: &'a mut [u64], right: &'a mut [u64], required: usize) -> Result<Self> {
        ensure_len("right join map", left.len(), right.len())?;
        ensure_capacity("join maps", required, left.len())?;
        Ok(Self {
            left,
            right,
            len: 0,
        })
    }

    pub(crate) fn push(&mut self, left: u64, right: u64) -> Result<()> {
        ensure_capacity("join maps", self.len + 1, self.left.len())?;
        self.left[self.len] = left;
        self.right[self.len] = right;
        self.len += 1;
        Ok(())
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }
}

/// Owned result of a join: parallel left/right index maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinMaps {
    pub left: Vec<u64>,
    pub right: Vec<u64>,
}

impl JoinMaps {
    fn with_len(len: usize) -> Self {
        Self {
            left: vec![0; len],
            right: vec![0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Pairs with the sentinel decoded as `None`.
    pub fn pairs(&self) -> impl Iterator<Item = (Option<usize>, Option<usize>)> + '_ {
        self.left
            .iter()
            .zip(&self.right)
            .map(|(&l, &r)| (index_to_option(l), index_to_option(r)))
    }
}

/// Size, allocate and materialize an inner join.
pub fn inner_join<T: Ord>(left: &[T], right: &[T]) -> Result<JoinMaps> {
    let size = ordered_inner_map_result_size(left, right)?;
    let mut maps = JoinMaps::with_len(size);
    ordered_inner_map(left, right, &mut maps.left, &mut maps.right)?;
    Ok(maps)
}

/// Size, allocate and materialize a left join.
pub fn left_join<T: Ord>(left: &[T], right: &[T]) -> Result<JoinMaps> {
    let size = ordered_left_map_result_size(left, right)?;
    let mut maps = JoinMaps::with_len(size);
    ordered_left_map(left, right, &mut maps.left, &mut maps.right)?;
    Ok(maps)
}

/// Size, allocate and materialize a full outer join of two unique key sequences.
pub fn outer_join_unique<T: Ord>(left: &[T], right: &[T]) -> Result<JoinMaps> {
    let size = ordered_outer_map_result_size_both_unique(left, right)?;
    let mut maps = JoinMaps::with_len(size);
    ordered_outer_map_both_unique(left, right, &mut maps.left, &mut maps.right)?;
    Ok(maps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_pair_sink_refuses_overflow() {
        let mut left = [0u64; 2];
        let mut right = [0u64; 2];
        let mut sink = PairSink::new(&mut left, &mut right, 2).unwrap();
        sink.push(1, 2).unwrap();
        sink.push(3, 4).unwrap();
        assert!(matches!(
            sink.push(5, 6),
            Err(Error::Capacity { required: 3, capacity: 2, .. })
        ));
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_pair_sink_checks_required_up_front() {
        let mut left = [7u64; 2];
        let mut right = [7u64; 2];
        assert!(matches!(
            PairSink::new(&mut left, &mut right, 3),
            Err(Error::Capacity { required: 3, capacity: 2, .. })
        ));
    }

    #[test]
    fn test_pair_sink_requires_equal_maps() {
        let mut left = [0u64; 2];
        let mut right = [0u64; 3];
        assert!(PairSink::new(&mut left, &mut right, 0).is_err());
    }

    #[test]
    fn test_owned_joins() {
        let a = [0, 1, 2, 2, 3];
        let b = [2, 3, 3, 4];

        let inner = inner_join(&a, &b).unwrap();
        assert_eq!(
            inner.pairs().collect::<Vec<_>>(),
            vec![
                (Some(2), Some(0)),
                (Some(3), Some(0)),
                (Some(4), Some(1)),
                (Some(4), Some(2)),
            ]
        );

        let left = left_join(&a, &b).unwrap();
        assert_eq!(left.len(), 6);
        assert_eq!(left.pairs().next(), Some((Some(0), None)));

        let outer = outer_join_unique(&[1, 3], &[2, 3]).unwrap();
        assert_eq!(
            outer.pairs().collect::<Vec<_>>(),
            vec![(Some(0), None), (None, Some(0)), (Some(1), Some(1))]
        );
    }
}
