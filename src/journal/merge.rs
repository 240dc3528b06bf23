use std::ops::Range;

use tracing::debug;

use super::JournalAlignment;
use crate::column::indexed::{row, row_len, validate_offsets};
use crate::error::{ensure_capacity, ensure_len, Error, Result};
use crate::sentinel::checked_index;

/// One contiguous piece of the merged history.
enum Piece {
    Old(Range<usize>),
    New(usize),
}

/// Emit the merged history as a sequence of pieces: each old key run
/// followed by its kept new row, new-only keys at their sorted position.
fn for_each_piece<F>(alignment: &JournalAlignment, keep: &[bool], mut emit: F) -> Result<()>
where
    F: FnMut(Piece) -> Result<()>,
{
    alignment.validate()?;
    ensure_len("keep mask", alignment.len(), keep.len())?;

    let mut cursor = 0;
    for (k, &kept) in keep.iter().enumerate() {
        if let Some(last) =
            checked_index("journal alignment old side", &alignment.old, k, alignment.old_rows)?
        {
            if last < cursor {
                return Err(Error::Unordered {
                    what: "journal alignment old side",
                    position: k,
                });
            }
            emit(Piece::Old(cursor..last + 1))?;
            cursor = last + 1;
        }
        if kept {
            match checked_index("journal alignment new side", &alignment.new, k, alignment.new_rows)? {
                Some(n) => emit(Piece::New(n))?,
                None => {
                    return Err(Error::SentinelMisuse {
                        what: "journal alignment new side",
                        position: k,
                    })
                }
            }
        }
    }
    if cursor < alignment.old_rows {
        emit(Piece::Old(cursor..alignment.old_rows))?;
    }
    Ok(())
}

/// Rows in the merged history: every old row plus every kept new row.
pub fn merge_journalled_entries_count(alignment: &JournalAlignment, keep: &[bool]) -> Result<usize> {
    ensure_len("keep mask", alignment.len(), keep.len())?;
    Ok(alignment.old_rows + keep.iter().filter(|&&k| k).count())
}

/// Merge a scalar column into `dest`, which must hold at least
/// [`merge_journalled_entries_count`] rows. Returns the rows written.
pub fn merge_journalled_entries<V: Copy>(
    alignment: &JournalAlignment,
    keep: &[bool],
    old_values: &[V],
    new_values: &[V],
    dest: &mut [V],
) -> Result<usize> {
    ensure_len("old values", alignment.old_rows, old_values.len())?;
    ensure_len("new values", alignment.new_rows, new_values.len())?;
    let total = merge_journalled_entries_count(alignment, keep)?;
    ensure_capacity("merged values", total, dest.len())?;

    let mut written = 0;
    for_each_piece(alignment, keep, |piece| {
        match piece {
            Piece::Old(range) => {
                let n = range.len();
                dest[written..written + n].copy_from_slice(&old_values[range]);
                written += n;
            }
            Piece::New(n) => {
                dest[written] = new_values[n];
                written += 1;
            }
        }
        Ok(())
    })?;
    debug!(
        old_rows = alignment.old_rows,
        kept = written - alignment.old_rows,
        "journal entries merged"
    );
    Ok(written)
}

/// Bytes in the merged indexed column: all old bytes plus the kept new rows.
pub fn merge_indexed_journalled_entries_count(
    alignment: &JournalAlignment,
    keep: &[bool],
    old_offsets: &[u64],
    new_offsets: &[u64],
) -> Result<usize> {
    alignment.validate()?;
    ensure_len("keep mask", alignment.len(), keep.len())?;
    ensure_len("old offsets", alignment.old_rows + 1, old_offsets.len())?;
    ensure_len("new offsets", alignment.new_rows + 1, new_offsets.len())?;
    validate_offsets("old offsets", old_offsets, usize::MAX)?;
    validate_offsets("new offsets", new_offsets, usize::MAX)?;

    let mut bytes = old_offsets[alignment.old_rows].saturating_sub(old_offsets[0]) as usize;
    for (k, _) in keep.iter().enumerate().filter(|(_, &kept)| kept) {
        match checked_index("journal alignment new side", &alignment.new, k, alignment.new_rows)? {
            Some(n) => bytes += row_len(new_offsets, n),
            None => {
                return Err(Error::SentinelMisuse {
                    what: "journal alignment new side",
                    position: k,
                })
            }
        }
    }
    Ok(bytes)
}

/// Merge an indexed column into caller-allocated offsets and bytes.
///
/// `dest_offsets` needs [`merge_journalled_entries_count`] + 1 entries and
/// `dest_values` [`merge_indexed_journalled_entries_count`] bytes. Returns
/// the number of rows written.
#[allow(clippy::too_many_arguments)]
pub fn merge_indexed_journalled_entries(
    alignment: &JournalAlignment,
    keep: &[bool],
    old_offsets: &[u64],
    old_values: &[u8],
    new_offsets: &[u64],
    new_values: &[u8],
    dest_offsets: &mut [u64],
    dest_values: &mut [u8],
) -> Result<usize> {
    let old_rows = validate_offsets("old offsets", old_offsets, old_values.len())?;
    let new_rows = validate_offsets("new offsets", new_offsets, new_values.len())?;
    ensure_len("old indexed rows", alignment.old_rows, old_rows)?;
    ensure_len("new indexed rows", alignment.new_rows, new_rows)?;

    let rows = merge_journalled_entries_count(alignment, keep)?;
    let bytes = merge_indexed_journalled_entries_count(alignment, keep, old_offsets, new_offsets)?;
    ensure_capacity("merged offsets", rows + 1, dest_offsets.len())?;
    ensure_capacity("merged values", bytes, dest_values.len())?;

    let mut row_count = 0;
    let mut byte_count = 0;
    dest_offsets[0] = 0;
    let mut copy_row = |content: &[u8]| {
        dest_values[byte_count..byte_count + content.len()].copy_from_slice(content);
        byte_count += content.len();
        row_count += 1;
        dest_offsets[row_count] = byte_count as u64;
    };
    for_each_piece(alignment, keep, |piece| {
        match piece {
            Piece::Old(range) => {
                for i in range {
                    copy_row(row(old_offsets, old_values, i));
                }
            }
            Piece::New(n) => copy_row(row(new_offsets, new_values, n)),
        }
        Ok(())
    })?;
    debug!(rows = row_count, bytes = byte_count, "indexed journal entries merged");
    Ok(row_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::IndexedValues;
    use crate::journal::{
        compare_indexed_rows_for_journalling, compare_rows_for_journalling,
        ordered_generate_journalling_indices,
    };

    const OLD_KEYS: [i32; 11] = [0, 0, 0, 1, 1, 2, 3, 3, 5, 5, 5];
    const OLD_VALUES: [i32; 11] = [0, 1, 2, 10, 11, 20, 30, 31, 50, 51, 52];
    const NEW_KEYS: [i32; 6] = [0, 2, 3, 4, 5, 6];

    fn merged(new_values: &[i32]) -> Vec<i32> {
        let alignment = ordered_generate_journalling_indices(&OLD_KEYS, &NEW_KEYS).unwrap();
        let keep = compare_rows_for_journalling(&alignment, &OLD_VALUES, new_values).unwrap();
        let total = merge_journalled_entries_count(&alignment, &keep).unwrap();
        let mut dest = vec![0; total];
        let written =
            merge_journalled_entries(&alignment, &keep, &OLD_VALUES, new_values, &mut dest)
                .unwrap();
        assert_eq!(written, total);
        dest
    }

    #[test]
    fn test_merge_drops_unchanged_rows() {
        assert_eq!(
            merged(&[2, 20, 31, 40, 52, 60]),
            vec![0, 1, 2, 10, 11, 20, 30, 31, 40, 50, 51, 52, 60]
        );
    }

    #[test]
    fn test_merge_keeps_every_changed_row() {
        assert_eq!(
            merged(&[3, 21, 32, 41, 53, 61]),
            vec![0, 1, 2, 3, 10, 11, 20, 21, 30, 31, 32, 41, 50, 51, 52, 53, 61]
        );
    }

    #[test]
    fn test_merge_mixed_changes() {
        assert_eq!(
            merged(&[3, 21, 32, 40, 53, 60]),
            vec![0, 1, 2, 3, 10, 11, 20, 21, 30, 31, 32, 40, 50, 51, 52, 53, 60]
        );
    }

    #[test]
    fn test_merge_rejects_bad_masks_and_destinations() {
        let alignment = ordered_generate_journalling_indices(&OLD_KEYS, &NEW_KEYS).unwrap();
        let new_values = [2, 20, 31, 40, 52, 60];

        // entry 1 has no new row to keep
        let keep = vec![true; alignment.len()];
        let mut dest = vec![0; 18];
        assert!(matches!(
            merge_journalled_entries(&alignment, &keep, &OLD_VALUES, &new_values, &mut dest),
            Err(Error::SentinelMisuse { position: 1, .. })
        ));

        let keep = vec![false, false, false, false, true, false, true];
        let mut dest = vec![0; 12];
        assert!(matches!(
            merge_journalled_entries(&alignment, &keep, &OLD_VALUES, &new_values, &mut dest),
            Err(Error::Capacity { required: 13, capacity: 12, .. })
        ));

        assert!(matches!(
            merge_journalled_entries_count(&alignment, &keep[..3]),
            Err(Error::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_merge_indexed_journalled_entries() {
        let old = IndexedValues::from_rows([
            "aa", "ab", "ac", "baa", "bab", "ca", "daa", "dab", "faa", "fab", "fac",
        ]);
        assert_eq!(old.offsets, vec![0, 2, 4, 6, 9, 12, 14, 17, 20, 23, 26, 29]);
        let new = IndexedValues::from_rows(["ad", "cb", "dac", "ea", "fad", "ga"]);
        assert_eq!(new.offsets, vec![0, 2, 4, 7, 9, 12, 14]);

        let alignment = ordered_generate_journalling_indices(
            &[b'a', b'a', b'a', b'b', b'b', b'c', b'd', b'd', b'f', b'f', b'f'],
            &[b'a', b'c', b'd', b'e', b'f', b'g'],
        )
        .unwrap();
        let keep = compare_indexed_rows_for_journalling(
            &alignment,
            &old.offsets,
            &old.values,
            &new.offsets,
            &new.values,
        )
        .unwrap();
        assert_eq!(keep, vec![true, false, true, true, true, true, true]);

        let bytes =
            merge_indexed_journalled_entries_count(&alignment, &keep, &old.offsets, &new.offsets)
                .unwrap();
        assert_eq!(bytes, 43);
        let rows = merge_journalled_entries_count(&alignment, &keep).unwrap();
        assert_eq!(rows, 17);

        let mut dest_offsets = vec![0u64; rows + 1];
        let mut dest_values = vec![0u8; bytes];
        let written = merge_indexed_journalled_entries(
            &alignment,
            &keep,
            &old.offsets,
            &old.values,
            &new.offsets,
            &new.values,
            &mut dest_offsets,
            &mut dest_values,
        )
        .unwrap();
        assert_eq!(written, 17);
        assert_eq!(
            dest_offsets,
            vec![0, 2, 4, 6, 8, 11, 14, 16, 18, 21, 24, 27, 29, 32, 35, 38, 41, 43]
        );
        assert_eq!(
            dest_values,
            b"aaabacadbaababcacbdaadabdaceafaafabfacfadga".to_vec()
        );
    }
}
