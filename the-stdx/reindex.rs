//! Reindexing helpers for ordered sequences.
//!
//! These functions operate on plain slices/vectors and know nothing about
//! selections. The list engine in `the-lib` uses them to lift, drop and
//! reorder items while it recomputes the selection on its own.

use std::{
  collections::{
    HashMap,
    HashSet,
  },
  hash::Hash,
  ops::Range,
};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReindexError {
  #[error("duplicate element at index {index} of the source sequence")]
  DuplicateInSource { index: usize },
  #[error("duplicate element at index {index} of the reordered subset")]
  DuplicateInSubset { index: usize },
  #[error("element at index {index} of the reordered subset is not in the source sequence")]
  MissingFromSource { index: usize },
}

pub type Result<T> = std::result::Result<T, ReindexError>;

/// Splits `items` into the elements outside `ranges` and the elements inside
/// them, both in their original order.
///
/// `ranges` must be sorted and non-overlapping. Bounds past the end of
/// `items` are ignored.
pub fn remove_ranges<T>(items: Vec<T>, ranges: &[Range<usize>]) -> (Vec<T>, Vec<T>) {
  let mut kept = Vec::with_capacity(items.len());
  let mut removed = Vec::new();
  let mut ranges = ranges.iter().peekable();

  for (idx, item) in items.into_iter().enumerate() {
    while ranges.next_if(|range| range.end <= idx).is_some() {}
    match ranges.peek() {
      Some(range) if range.contains(&idx) => removed.push(item),
      _ => kept.push(item),
    }
  }

  (kept, removed)
}

/// Lifts the elements at `picked` out of `items` and reinserts them, in
/// ascending position order, at slot `to`.
///
/// `to` is a slot in the sequence *before* anything is lifted (0 is before the
/// first element, `items.len()` after the last). It is converted into a splice
/// point in the shrunk sequence by discounting every picked position below it,
/// then clamped to the shrunk length.
///
/// `picked` must be sorted ascending without duplicates.
pub fn lift_and_splice<T>(items: Vec<T>, picked: &[usize], to: usize) -> Vec<T> {
  debug_assert!(picked.windows(2).all(|pair| pair[0] < pair[1]));

  let removed_before = picked.partition_point(|&idx| idx < to);
  let mut lifted = Vec::with_capacity(picked.len());
  let mut base = Vec::with_capacity(items.len());
  let mut cursor = picked.iter().peekable();

  for (idx, item) in items.into_iter().enumerate() {
    if cursor.next_if(|&&pos| pos == idx).is_some() {
      lifted.push(item);
    } else {
      base.push(item);
    }
  }

  let at = to.saturating_sub(removed_before).min(base.len());
  base.splice(at..at, lifted);
  base
}

/// Applies the order of `subset` to the positions its elements occupy in
/// `src`.
///
/// Elements of `src` that are not part of `subset` keep their positions. The
/// positions held by members of `subset` are refilled, in ascending order, by
/// the elements of `subset` in the order given.
///
/// ```ignore
/// let out = propagate_move(&['a', 'b', 'c', 'd'], &['d', 'a'])?;
/// assert_eq!(out, ['d', 'b', 'c', 'a']);
/// ```
pub fn propagate_move<T>(src: &[T], subset: &[T]) -> Result<Vec<T>>
where
  T: Clone + Eq + Hash,
{
  let mut positions = HashMap::with_capacity(src.len());
  for (index, item) in src.iter().enumerate() {
    if positions.insert(item, index).is_some() {
      return Err(ReindexError::DuplicateInSource { index });
    }
  }

  let mut seen = HashSet::with_capacity(subset.len());
  let mut slots = Vec::with_capacity(subset.len());
  for (index, item) in subset.iter().enumerate() {
    if !seen.insert(item) {
      return Err(ReindexError::DuplicateInSubset { index });
    }
    let slot = positions
      .get(item)
      .copied()
      .ok_or(ReindexError::MissingFromSource { index })?;
    slots.push(slot);
  }
  slots.sort_unstable();

  let mut out = src.to_vec();
  for (slot, item) in slots.into_iter().zip(subset) {
    out[slot] = item.clone();
  }
  Ok(out)
}

#[cfg(test)]
mod test {
  use super::*;

  fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
  }

  #[test]
  fn test_remove_ranges() {
    let (kept, removed) = remove_ranges(chars("abcdefg"), &[0..1, 3..5]);
    assert_eq!(kept, chars("bcfg"));
    assert_eq!(removed, chars("ade"));
  }

  #[test]
  fn test_remove_ranges_past_end() {
    let (kept, removed) = remove_ranges(chars("abc"), &[2..6]);
    assert_eq!(kept, chars("ab"));
    assert_eq!(removed, chars("c"));
  }

  #[test]
  fn test_remove_ranges_empty() {
    let (kept, removed) = remove_ranges(chars("abc"), &[]);
    assert_eq!(kept, chars("abc"));
    assert!(removed.is_empty());
  }

  #[test]
  fn test_lift_and_splice_block_forward() {
    // 1 2 [3 4] 5 6 | 7
    let out = lift_and_splice(chars("1234567"), &[2, 3], 6);
    assert_eq!(out, chars("1256347"));
  }

  #[test]
  fn test_lift_and_splice_block_backward() {
    let out = lift_and_splice(chars("1234567"), &[4, 5], 1);
    assert_eq!(out, chars("1562347"));
  }

  #[test]
  fn test_lift_and_splice_disjoint() {
    // 0 [1] 2 [3] 4 5 | 6
    let out = lift_and_splice(chars("0123456"), &[1, 3], 6);
    assert_eq!(out, chars("0245136"));
  }

  #[test]
  fn test_lift_and_splice_clamps() {
    let out = lift_and_splice(chars("abc"), &[0], 10);
    assert_eq!(out, chars("bca"));
  }

  #[test]
  fn test_propagate_move() {
    let src = chars("abcdefgh");
    let out = propagate_move(&src, &chars("cbahe")).unwrap();
    assert_eq!(out, chars("cbadhfge"));
  }

  #[test]
  fn test_propagate_move_empty_subset() {
    let src = vec![1, 2, 3];
    assert_eq!(propagate_move(&src, &[]).unwrap(), src);
  }

  #[test]
  fn test_propagate_move_errors() {
    let src = vec![1, 2, 3];
    assert_eq!(
      propagate_move(&src, &[2, 2]),
      Err(ReindexError::DuplicateInSubset { index: 1 })
    );
    assert_eq!(
      propagate_move(&src, &[4]),
      Err(ReindexError::MissingFromSource { index: 0 })
    );
    assert_eq!(
      propagate_move(&[1, 2, 1], &[2]),
      Err(ReindexError::DuplicateInSource { index: 2 })
    );
  }

  fn unique(mut items: Vec<u8>) -> Vec<u8> {
    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(*item));
    items
  }

  quickcheck::quickcheck! {
      fn prop_remove_ranges_partitions(items: Vec<u8>, cut: usize) -> bool {
          let len = items.len();
          let start = if len == 0 { 0 } else { cut % len };
          let end = (start + 3).min(len);
          let (kept, removed) = remove_ranges(items.clone(), &[start..end]);
          let mut rejoined = kept[..start].to_vec();
          rejoined.extend(removed);
          rejoined.extend_from_slice(&kept[start..]);
          rejoined == items
      }

      fn prop_propagate_reversal(items: Vec<u8>) -> bool {
          let src = unique(items);
          let reversed: Vec<u8> = src.iter().rev().copied().collect();
          propagate_move(&src, &reversed).unwrap() == reversed
      }

      fn prop_lift_and_splice_keeps_elements(items: Vec<u8>, to: usize) -> bool {
          let len = items.len();
          let picked: Vec<usize> = (0..len).step_by(2).collect();
          let to = if len == 0 { 0 } else { to % (len + 1) };
          let mut out = lift_and_splice(items.clone(), &picked, to);
          let mut expected = items;
          out.sort_unstable();
          expected.sort_unstable();
          out == expected
      }
  }
}
