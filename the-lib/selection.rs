//! Directional index ranges and multi-range selections over a sequence.
//!
//! This module provides [`Range`] for a single selected span of items and
//! [`Selection`] for any number of disjoint spans with one designated "main"
//! range.
//!
//! # Range Model
//!
//! A [`Range`] is the half-open interval `[from, to)` over item positions plus
//! a direction flag. The `anchor` is the end that stays fixed while the
//! selection is extended, the `head` is the end that moves.
//!
//! ```text
//! from=2, to=5, inverted=false: anchor=2, head=5   items 2, 3, 4 selected
//! from=2, to=5, inverted=true:  anchor=5, head=2   same items, extending up
//! ```
//!
//! A range always covers at least one item (`from < to`). An empty selection is
//! represented by the absence of a [`Selection`], never by an empty range.
//!
//! # Selections
//!
//! A [`Selection`] holds one or more ranges which are kept normalized:
//!
//! - Sorted by [`Range::from`]
//! - No overlapping ranges, touching ranges are merged
//! - Always at least one range, and a valid main index
//!
//! When two ranges overlap and one of them is the main range, the main range
//! wins and the other one is discarded. Touching ranges are always merged into
//! their union. Merged ranges take the direction of the main range.
//!
//! ```ignore
//! use the_lib::selection::{Range, Selection};
//!
//! let selection = Selection::with_main(
//!   [Range::new(0, 1)?, Range::new(3, 2)?, Range::new(4, 5)?],
//!   1,
//! )?;
//! assert_eq!(selection.to_string(), "0/1,3/2,4/5");
//! assert_eq!(selection.main().head(), 2);
//! ```
//!
//! # Error Handling
//!
//! Operations return [`Result<T, SelectionError>`]:
//!
//! - **InvalidRange** - `from >= to` when constructing a range
//! - **EmptySelection** - Selection must have at least one range
//! - **RangeIndexOutOfBounds** - Accessed range index doesn't exist
//! - **PickOutOfBounds** - Selection reaches past the end of a sequence

use std::fmt;

use smallvec::{
  SmallVec,
  smallvec,
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SelectionError>;

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SelectionError {
  #[error("range {from}..{to} does not span a valid range")]
  InvalidRange { from: usize, to: usize },
  #[error("selection must contain at least one range")]
  EmptySelection,
  #[error("range index {index} out of bounds for selection of length {len}")]
  RangeIndexOutOfBounds { index: usize, len: usize },
  #[error("selection ends at {max} but the sequence has {len} elements")]
  PickOutOfBounds { max: usize, len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
  from:     usize,
  to:       usize,
  inverted: bool,
}

impl Range {
  /// Creates the range `[from, to)`.
  pub fn create(from: usize, to: usize, inverted: bool) -> Result<Self> {
    if from >= to {
      return Err(SelectionError::InvalidRange { from, to });
    }
    Ok(Self::new_unchecked(from, to, inverted))
  }

  /// Creates a range from its anchor and head. The range is inverted when
  /// `head < anchor`.
  pub fn new(anchor: usize, head: usize) -> Result<Self> {
    if head < anchor {
      Self::create(head, anchor, true)
    } else {
      Self::create(anchor, head, false)
    }
  }

  /// The range covering the single item at `index`.
  #[inline]
  pub fn point(index: usize) -> Self {
    Self::new_unchecked(index, index + 1, false)
  }

  #[inline]
  pub(crate) fn new_unchecked(from: usize, to: usize, inverted: bool) -> Self {
    debug_assert!(from < to, "range {from}..{to} is empty");
    Self { from, to, inverted }
  }

  /// Start of the range
  #[inline]
  #[must_use]
  pub fn from(&self) -> usize {
    self.from
  }

  /// End of the range (exclusive)
  #[inline]
  #[must_use]
  pub fn to(&self) -> usize {
    self.to
  }

  #[inline]
  #[must_use]
  pub fn is_inverted(&self) -> bool {
    self.inverted
  }

  /// The fixed end of the range.
  #[inline]
  #[must_use]
  pub fn anchor(&self) -> usize {
    if self.inverted { self.to } else { self.from }
  }

  /// The moving end of the range.
  #[inline]
  #[must_use]
  pub fn head(&self) -> usize {
    if self.inverted { self.from } else { self.to }
  }

  /// Index of the item the head rests on.
  #[inline]
  #[must_use]
  pub fn head_index(&self) -> usize {
    if self.inverted { self.from } else { self.to - 1 }
  }

  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    self.to - self.from
  }

  /// Returns true if the range covers exactly one item.
  #[inline]
  #[must_use]
  pub fn is_single(&self) -> bool {
    self.len() == 1
  }

  /// Moves the head onto the item at `pos`, keeping the anchor item selected.
  ///
  /// The range flips direction when `pos` crosses over to the other side of
  /// the anchor.
  #[must_use]
  pub fn extend(&self, pos: usize) -> Self {
    let anchor = self.anchor();
    match (self.inverted, pos < anchor) {
      // Extending downwards past the anchor inverts the range.
      (false, true) => Self::new_unchecked(pos, anchor + 1, true),
      // The anchor item of an inverted range is `anchor - 1`.
      (true, false) => Self::new_unchecked(anchor - 1, pos + 1, false),
      (true, true) => Self::new_unchecked(pos, self.to, true),
      (false, false) => Self::new_unchecked(self.from, pos + 1, false),
    }
  }

  /// Translates both bounds by `by`, keeping the direction.
  ///
  /// # Panics
  ///
  /// Panics if the range would be moved below position zero.
  #[must_use]
  pub fn shift(&self, by: isize) -> Self {
    let from = self
      .from
      .checked_add_signed(by)
      .expect("range shifted below position zero");
    Self::new_unchecked(from, from + self.len(), self.inverted)
  }

  #[inline]
  pub fn contains(&self, pos: usize) -> bool {
    self.from <= pos && pos < self.to
  }

  /// Check if two `Ranges` overlap. Touching ranges (`(1, 4)`, `(4, 5)`) do
  /// not overlap.
  pub fn overlaps(&self, other: &Self) -> bool {
    let (first, second) = ordered(self, other);
    second.from < first.to
  }

  /// Returns true if the ranges are adjacent without overlapping.
  #[inline]
  pub fn touches(&self, other: &Self) -> bool {
    self.distance_to(other) == Some(0)
  }

  /// Number of items between the two ranges, `None` if they overlap.
  ///
  /// Touching ranges such as `(0, 1)` and `(1, 2)` are 0 apart.
  pub fn distance_to(&self, other: &Self) -> Option<usize> {
    if self.overlaps(other) {
      return None;
    }
    let (first, second) = ordered(self, other);
    Some(second.from - first.to)
  }

  /// Removes the positions covered by `other` from this range.
  ///
  /// If this is `(10, 20)` and other is `(0, 15)`, the result is `(15, 20)`.
  /// Fragments are always forward ranges.
  pub fn subtract(&self, other: &Self) -> Difference {
    if other.to <= self.from || other.from >= self.to {
      return Difference::One(*self);
    }
    if other.from <= self.from && other.to >= self.to {
      return Difference::Empty;
    }
    if other.from <= self.from {
      return Difference::One(Self::new_unchecked(other.to, self.to, false));
    }
    if other.to >= self.to {
      return Difference::One(Self::new_unchecked(self.from, other.from, false));
    }
    Difference::Two(
      Self::new_unchecked(self.from, other.from, false),
      Self::new_unchecked(other.to, self.to, false),
    )
  }

  /// Positions covered by this range, in ascending order.
  #[inline]
  pub fn positions(&self) -> std::ops::Range<usize> {
    self.from..self.to
  }
}

fn ordered<'a>(a: &'a Range, b: &'a Range) -> (&'a Range, &'a Range) {
  if a.from <= b.from { (a, b) } else { (b, a) }
}

impl fmt::Display for Range {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.anchor(), self.head())
  }
}

impl From<Range> for std::ops::Range<usize> {
  fn from(range: Range) -> Self {
    range.positions()
  }
}

/// Result of [`Range::subtract`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difference {
  /// Nothing of the range remains.
  Empty,
  One(Range),
  /// The subtracted range was strictly inside, leaving a left and a right
  /// fragment.
  Two(Range, Range),
}

impl Difference {
  pub fn into_ranges(self) -> SmallVec<[Range; 2]> {
    match self {
      Self::Empty => SmallVec::new(),
      Self::One(range) => smallvec![range],
      Self::Two(left, right) => smallvec![left, right],
    }
  }
}

/// A selection is one or more ranges plus the index of the main range.
/// INVARIANT: A selection can never be empty (always contain at least one
/// range).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
  ranges:     SmallVec<[Range; 1]>,
  main_index: usize,
}

impl Selection {
  /// Creates a selection whose main range is the last one given.
  pub fn new<I>(ranges: I) -> Result<Self>
  where
    I: IntoIterator<Item = Range>,
  {
    let ranges: SmallVec<[Range; 1]> = ranges.into_iter().collect();
    let main_index = ranges
      .len()
      .checked_sub(1)
      .ok_or(SelectionError::EmptySelection)?;
    Ok(Self::create(ranges, main_index))
  }

  pub fn with_main<I>(ranges: I, main_index: usize) -> Result<Self>
  where
    I: IntoIterator<Item = Range>,
  {
    let ranges: SmallVec<[Range; 1]> = ranges.into_iter().collect();
    if ranges.is_empty() {
      return Err(SelectionError::EmptySelection);
    }
    if main_index >= ranges.len() {
      return Err(SelectionError::RangeIndexOutOfBounds {
        index: main_index,
        len:   ranges.len(),
      });
    }
    Ok(Self::create(ranges, main_index))
  }

  /// Constructs a selection holding the single item at `index`.
  #[must_use]
  pub fn single(index: usize) -> Self {
    Self {
      ranges:     smallvec![Range::point(index)],
      main_index: 0,
    }
  }

  /// Builds a selection from item indices, merging consecutive runs into
  /// ranges. The first range is main. Returns `None` for no indices.
  pub fn from_indices<I>(indices: I) -> Option<Self>
  where
    I: IntoIterator<Item = usize>,
  {
    let mut indices: Vec<usize> = indices.into_iter().collect();
    indices.sort_unstable();
    indices.dedup();

    let mut indices = indices.into_iter();
    let first = indices.next()?;
    let (mut start, mut end) = (first, first + 1);
    let mut ranges: SmallVec<[Range; 1]> = SmallVec::new();
    for idx in indices {
      if idx == end {
        end += 1;
      } else {
        ranges.push(Range::new_unchecked(start, end, false));
        start = idx;
        end = idx + 1;
      }
    }
    ranges.push(Range::new_unchecked(start, end, false));

    Some(Self::create(ranges, 0))
  }

  /// Accepts `ranges` as they are if every range starts after the end of the
  /// previous one, otherwise normalizes them.
  pub(crate) fn create(ranges: SmallVec<[Range; 1]>, main_index: usize) -> Self {
    debug_assert!(main_index < ranges.len());
    if ranges.windows(2).any(|pair| pair[1].from <= pair[0].to) {
      Self::normalize(ranges, main_index)
    } else {
      Self { ranges, main_index }
    }
  }

  /// Sorts ranges, then merges overlapping and touching ones: `(0, 1)` and
  /// `(1, 2)` become `(0, 2)`.
  ///
  /// Exceptions: ranges overlapping the main range are replaced by it, ranges
  /// touching the main range are merged with it. The direction of the main
  /// range is kept.
  fn normalize(ranges: SmallVec<[Range; 1]>, main_index: usize) -> Self {
    let mut order: SmallVec<[(usize, Range); 1]> = ranges.into_iter().enumerate().collect();
    order.sort_by_key(|(_, range)| range.from);

    let mut main_index = order
      .iter()
      .position(|(idx, _)| *idx == main_index)
      .expect("main range survives sorting");
    let mut ranges: SmallVec<[Range; 1]> = order.into_iter().map(|(_, range)| range).collect();

    let mut i = 1;
    while i < ranges.len() {
      let range = ranges[i];
      let prev = ranges[i - 1];
      if range.from > prev.to {
        i += 1;
        continue;
      }

      let main = ranges[main_index];
      let keep_main = (i == main_index || i - 1 == main_index) && range.from < prev.to;
      let (from, to) = if keep_main {
        (main.from, main.to)
      } else {
        (prev.from, range.to.max(prev.to))
      };
      if i <= main_index {
        main_index -= 1;
      }
      ranges[i - 1] = Range::new_unchecked(from, to, main.inverted);
      ranges.remove(i);
      // NOTE: `i` stays put so the merged range is compared with its new
      // successor.
    }

    Self { ranges, main_index }
  }

  pub fn ranges(&self) -> &[Range] {
    &self.ranges
  }

  #[inline]
  pub fn main_index(&self) -> usize {
    self.main_index
  }

  #[inline]
  pub fn main(&self) -> Range {
    self.ranges[self.main_index]
  }

  /// Start of the first range.
  #[inline]
  pub fn min(&self) -> usize {
    self.ranges[0].from
  }

  /// End of the last range.
  #[inline]
  pub fn max(&self) -> usize {
    self.ranges[self.ranges.len() - 1].to
  }

  /// Number of selected items.
  #[must_use]
  pub fn size(&self) -> usize {
    self.ranges.iter().map(Range::len).sum()
  }

  /// Returns true if there is a single one-item range.
  pub fn is_single(&self) -> bool {
    self.ranges.len() == 1 && self.ranges[0].is_single()
  }

  /// Returns true if more than one item is selected.
  pub fn is_multiple(&self) -> bool {
    if self.ranges.len() == 1 {
      return !self.ranges[0].is_single();
    }
    self.ranges.len() >= 2
  }

  /// Returns true if `index` is covered by one of the ranges.
  pub fn contains(&self, index: usize) -> bool {
    self.ranges.iter().any(|range| range.contains(index))
  }

  /// Compares anchor/head pairs range by range, ignoring which range is main.
  pub fn eq_ranges(&self, other: &Self) -> bool {
    self.ranges.len() == other.ranges.len()
      && self
        .ranges
        .iter()
        .zip(other.ranges.iter())
        .all(|(a, b)| a.anchor() == b.anchor() && a.head() == b.head())
  }

  /// Every selected index, ascending.
  pub fn indices(&self) -> Vec<usize> {
    self.iter_indices().collect()
  }

  pub fn iter_indices(&self) -> impl Iterator<Item = usize> + '_ {
    self.ranges.iter().flat_map(Range::positions)
  }

  #[inline(always)]
  pub fn iter(&self) -> std::slice::Iter<'_, Range> {
    self.ranges.iter()
  }

  /// Picks the selected elements of `items`, in range order.
  pub fn pick<T: Clone>(&self, items: &[T]) -> Result<Vec<T>> {
    if self.max() > items.len() {
      return Err(SelectionError::PickOutOfBounds {
        max: self.max(),
        len: items.len(),
      });
    }
    Ok(
      self
        .ranges
        .iter()
        .flat_map(|range| items[range.positions()].iter().cloned())
        .collect(),
    )
  }

  /// Extends this selection with an extra range. When `main` is set the new
  /// range becomes the main range.
  #[must_use]
  pub fn add_range(self, range: Range, main: bool) -> Self {
    let main_index = if main { 0 } else { self.main_index + 1 };
    let mut ranges = SmallVec::with_capacity(self.ranges.len() + 1);
    ranges.push(range);
    ranges.extend(self.ranges);
    Self::create(ranges, main_index)
  }

  /// Replaces the main range.
  #[must_use]
  pub fn replace_range(mut self, range: Range) -> Self {
    self.ranges[self.main_index] = range;
    Self::create(self.ranges, self.main_index)
  }

  /// Replaces the range at `which`, then normalizes.
  pub fn replace_range_at(mut self, which: usize, range: Range) -> Result<Self> {
    let len = self.ranges.len();
    let slot = self
      .ranges
      .get_mut(which)
      .ok_or(SelectionError::RangeIndexOutOfBounds { index: which, len })?;
    *slot = range;
    Ok(Self::create(self.ranges, self.main_index))
  }

  /// Removes `index` from the selection.
  ///
  /// A range is split in two when `index` is in its middle, shortened when
  /// `index` is at its edge and dropped when it only covers `index`. Returns
  /// `None` once nothing is selected anymore. If `index` isn't selected the
  /// selection is returned as is.
  pub fn split_range(mut self, index: usize) -> Option<Self> {
    let Some(range_index) = self.ranges.iter().position(|range| range.contains(index)) else {
      return Some(self);
    };
    let range = self.ranges[range_index];

    if range.is_single() {
      if self.ranges.len() == 1 {
        return None;
      }

      // The closest remaining range becomes main.
      let before = range_index.checked_sub(1).map(|idx| self.ranges[idx]);
      let after = self.ranges.get(range_index + 1).copied();
      let main_index = match (before, after) {
        (Some(before), Some(after)) if before.distance_to(&range) < after.distance_to(&range) => {
          range_index - 1
        },
        (Some(_), Some(_)) | (None, Some(_)) => range_index,
        (Some(_), None) => range_index - 1,
        (None, None) => unreachable!("selection has more than one range"),
      };
      self.ranges.remove(range_index);
      return Some(Self::create(self.ranges, main_index));
    }

    if index != range.from && index + 1 != range.to {
      // (0, 3) split at 1 becomes the forward ranges (0, 1) and (2, 3).
      self.ranges[range_index] = Range::new_unchecked(range.from, index, false);
      self
        .ranges
        .insert(range_index + 1, Range::new_unchecked(index + 1, range.to, false));
      let main_index = if self.main_index > range_index {
        self.main_index + 1
      } else {
        self.main_index
      };
      return Some(Self::create(self.ranges, main_index));
    }

    let inverted = range.inverted;
    let shortened = if index == range.from {
      Range::new_unchecked(range.from + 1, range.to, inverted)
    } else {
      Range::new_unchecked(range.from, range.to - 1, inverted)
    };
    self.ranges[range_index] = shortened;
    Some(Self::create(self.ranges, self.main_index))
  }

  /// Translates every range by `by`, keeping the main range.
  #[must_use]
  pub fn shift(self, by: isize) -> Self {
    let ranges = self.ranges.iter().map(|range| range.shift(by)).collect();
    Self::create(ranges, self.main_index)
  }
}

impl fmt::Display for Selection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (idx, range) in self.ranges.iter().enumerate() {
      if idx > 0 {
        f.write_str(",")?;
      }
      write!(f, "{range}")?;
    }
    Ok(())
  }
}

impl<'a> IntoIterator for &'a Selection {
  type Item = &'a Range;
  type IntoIter = std::slice::Iter<'a, Range>;

  fn into_iter(self) -> std::slice::Iter<'a, Range> {
    self.ranges.iter()
  }
}

impl From<Range> for Selection {
  fn from(range: Range) -> Self {
    Self {
      ranges:     smallvec![range],
      main_index: 0,
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;

  fn r(anchor: usize, head: usize) -> Range {
    Range::new(anchor, head).unwrap()
  }

  fn sel(ranges: &[Range]) -> Selection {
    Selection::new(ranges.iter().copied()).unwrap()
  }

  fn sel_main(ranges: &[Range], main: usize) -> Selection {
    Selection::with_main(ranges.iter().copied(), main).unwrap()
  }

  #[test]
  fn test_range_create_invalid() {
    assert_eq!(
      Range::create(3, 3, false),
      Err(SelectionError::InvalidRange { from: 3, to: 3 })
    );
    assert!(Range::new(4, 4).is_err());
  }

  #[test]
  fn test_range_anchor_head() {
    let range = r(6, 4);
    assert_eq!((range.from(), range.to()), (4, 6));
    assert!(range.is_inverted());
    assert_eq!((range.anchor(), range.head()), (6, 4));
    assert_eq!(range.head_index(), 4);
    assert_eq!(r(4, 6).head_index(), 5);
  }

  #[test]
  fn test_new_empty() {
    assert_eq!(
      Selection::new(std::iter::empty()).unwrap_err(),
      SelectionError::EmptySelection
    );
    assert_eq!(
      Selection::with_main([r(0, 1)], 1).unwrap_err(),
      SelectionError::RangeIndexOutOfBounds { index: 1, len: 1 }
    );
  }

  #[test]
  fn test_stores_ranges_with_main_range() {
    let sel = sel_main(&[r(0, 1), r(3, 2), r(4, 5)], 1);
    assert_eq!(sel.main().from(), 2);
    assert_eq!(sel.main().to(), 3);
    assert_eq!(sel.main().anchor(), 3);
    assert_eq!(sel.main().head(), 2);
    assert_eq!(sel.to_string(), "0/1,3/2,4/5");
  }

  #[test]
  fn test_create_normalizes_and_merges() {
    let sel = sel(&[
      r(10, 12),
      r(6, 7),
      r(4, 5),
      r(3, 4),
      r(0, 6),
      r(7, 8),
      r(9, 13),
      r(13, 14),
    ]);
    assert_eq!(sel.to_string(), "0/8,9/14");
  }

  #[test]
  fn test_merges_adjacent_point_ranges() {
    let sel = sel(&[r(10, 12), r(12, 13), r(12, 13), r(10, 11), r(8, 10)]);
    assert_eq!(sel.to_string(), "8/13");
  }

  #[test]
  fn test_main_direction_preserved_when_merging() {
    assert_eq!(sel(&[r(0, 2), r(10, 1)]).to_string(), "10/1");
    assert_eq!(sel(&[r(3, 4), r(10, 1)]).to_string(), "10/1");
  }

  #[test]
  fn test_main_range_overwrites_overlapping() {
    assert_eq!(sel(&[r(3, 5), r(10, 4)]).to_string(), "10/4");
    assert_eq!(sel_main(&[r(3, 5), r(10, 4)], 0).to_string(), "3/5");
  }

  #[test]
  fn test_merges_non_main_but_main_overwrites() {
    let sel = sel_main(&[r(3, 5), r(10, 4), r(15, 20), r(17, 25)], 2);
    assert_eq!(sel.to_string(), "3/10,15/20");
    assert_eq!(sel.main_index(), 1);
  }

  #[test]
  fn test_merges_touching_range_with_main() {
    let sel = sel_main(&[r(3, 5), r(10, 5), r(10, 15)], 1);
    assert_eq!(sel.to_string(), "15/3");
    assert_eq!(sel.main_index(), 0);
  }

  #[test]
  fn test_split_range_in_two() {
    let sel = sel_main(&[r(0, 10)], 0).split_range(4).unwrap();
    assert_eq!(sel.to_string(), "0/4,5/10");
    assert_eq!(sel.main_index(), 0);
  }

  #[test]
  fn test_split_last_point_clears() {
    assert!(sel_main(&[r(0, 1)], 0).split_range(0).is_none());
  }

  #[test]
  fn test_split_at_edge_shortens() {
    let base = sel_main(&[r(5, 10)], 0);
    assert_eq!(base.clone().split_range(9).unwrap().to_string(), "5/9");
    assert_eq!(base.split_range(5).unwrap().to_string(), "6/10");

    let inverted = sel_main(&[r(10, 5)], 0);
    assert_eq!(inverted.clone().split_range(9).unwrap().to_string(), "9/5");
    assert_eq!(inverted.split_range(5).unwrap().to_string(), "10/6");
  }

  #[test]
  fn test_split_moves_main_to_closest_range() {
    let sel = sel(&[r(1, 3), r(5, 6), r(10, 12)]).split_range(5).unwrap();
    assert_eq!(sel.to_string(), "1/3,10/12");
    assert_eq!(sel.main_index(), 0);

    let sel = sel_main(&[r(1, 3), r(7, 8), r(9, 12)], 0).split_range(7).unwrap();
    assert_eq!(sel.to_string(), "1/3,9/12");
    assert_eq!(sel.main_index(), 1);
  }

  #[test]
  fn test_split_tie_moves_main_to_next_range() {
    let sel = sel(&[r(0, 1), r(3, 4), r(6, 7)]).split_range(3).unwrap();
    assert_eq!(sel.to_string(), "0/1,6/7");
    assert_eq!(sel.main_index(), 1);
  }

  #[test]
  fn test_split_last_range_moves_main_to_previous() {
    let sel = sel(&[r(0, 2), r(5, 6)]).split_range(5).unwrap();
    assert_eq!(sel.to_string(), "0/2");
    assert_eq!(sel.main_index(), 0);
  }

  #[test]
  fn test_split_first_range_moves_main_to_next() {
    let sel = sel_main(&[r(0, 1), r(4, 6)], 0).split_range(0).unwrap();
    assert_eq!(sel.to_string(), "4/6");
    assert_eq!(sel.main_index(), 0);
  }

  #[test]
  fn test_split_inverted_range_in_two_gives_forward_fragments() {
    let sel = Selection::from(r(10, 4)).split_range(6).unwrap();
    assert_eq!(sel.to_string(), "4/6,7/10");
    assert!(sel.ranges().iter().all(|range| !range.is_inverted()));
  }

  #[test]
  fn test_split_keeps_main_after_split_range() {
    let sel = sel_main(&[r(0, 5), r(8, 9)], 1).split_range(2).unwrap();
    assert_eq!(sel.to_string(), "0/2,3/5,8/9");
    assert_eq!(sel.main_index(), 2);
  }

  #[test]
  fn test_split_unselected_index_is_noop() {
    let sel = sel(&[r(1, 3)]);
    assert_eq!(sel.clone().split_range(7), Some(sel));
  }

  #[test]
  fn test_extend_inverts_down() {
    assert_eq!(sel(&[r(5, 6).extend(2)]).to_string(), "6/2");
    assert_eq!(sel(&[r(5, 7).extend(2)]).to_string(), "6/2");
  }

  #[test]
  fn test_extend_inverts_up() {
    assert_eq!(sel(&[r(6, 4).extend(7)]).to_string(), "5/8");
    // Inverted pos == anchor.
    assert_eq!(sel(&[r(6, 4).extend(6)]).to_string(), "5/7");
  }

  #[test]
  fn test_extend_same_direction() {
    assert_eq!(r(2, 4).extend(6).to_string(), "2/7");
    assert_eq!(r(8, 5).extend(1).to_string(), "8/1");
  }

  #[test]
  fn test_replace_range_overwrites_overlapping() {
    let sel = sel_main(&[r(5, 6), r(10, 12)], 1).replace_range(r(10, 12).extend(1));
    assert_eq!(sel.to_string(), "11/1");

    let sel2 = sel_main(&[r(1, 2), r(5, 6), r(10, 12), r(13, 14)], 0).replace_range(r(1, 11));
    assert_eq!(sel2.to_string(), "1/11,13/14");
  }

  #[test]
  fn test_replace_range_at_out_of_bounds() {
    assert_eq!(
      sel(&[r(0, 1)]).replace_range_at(3, r(4, 5)).unwrap_err(),
      SelectionError::RangeIndexOutOfBounds { index: 3, len: 1 }
    );
  }

  #[test]
  fn test_add_range() {
    let added = sel(&[r(0, 1), r(4, 5)]).add_range(r(2, 3), true);
    assert_eq!(added.to_string(), "0/1,2/3,4/5");
    assert_eq!(added.main(), r(2, 3));

    let added = sel(&[r(0, 1), r(4, 5)]).add_range(r(2, 3), false);
    assert_eq!(added.main(), r(4, 5));
  }

  #[test]
  fn test_subtract_cuts_off_end() {
    assert_eq!(r(4, 10).subtract(&r(6, 12)), Difference::One(r(4, 6)));
  }

  #[test]
  fn test_subtract_cuts_off_middle() {
    assert_eq!(r(4, 10).subtract(&r(6, 8)), Difference::Two(r(4, 6), r(8, 10)));
  }

  #[test]
  fn test_subtract_cuts_off_start() {
    assert_eq!(r(4, 10).subtract(&r(2, 6)), Difference::One(r(6, 10)));
  }

  #[test]
  fn test_subtract_inverted_gives_forward_fragments() {
    assert_eq!(
      r(10, 4).subtract(&r(6, 8)),
      Difference::Two(r(4, 6), r(8, 10))
    );
    assert_eq!(r(10, 4).subtract(&r(2, 6)), Difference::One(r(6, 10)));
    assert_eq!(r(10, 4).subtract(&r(8, 12)), Difference::One(r(4, 8)));
    // Untouched ranges come back as they are.
    assert_eq!(r(10, 4).subtract(&r(12, 14)), Difference::One(r(10, 4)));
  }

  #[test]
  fn test_subtract_full_overlap() {
    assert_eq!(r(4, 10).subtract(&r(4, 10)), Difference::Empty);
    assert_eq!(r(4, 10).subtract(&r(0, 12)), Difference::Empty);
  }

  #[test]
  fn test_subtract_no_overlap() {
    assert_eq!(r(4, 10).subtract(&r(12, 14)), Difference::One(r(4, 10)));
    assert_eq!(r(4, 10).subtract(&r(10, 14)), Difference::One(r(4, 10)));
  }

  #[test]
  fn test_distance_and_touch() {
    assert_eq!(r(0, 1).distance_to(&r(1, 2)), Some(0));
    assert!(r(0, 1).touches(&r(1, 2)));
    assert_eq!(r(5, 6).distance_to(&r(1, 3)), Some(2));
    assert_eq!(r(1, 4).distance_to(&r(3, 5)), None);
    assert!(!r(1, 4).overlaps(&r(4, 5)));
    assert!(r(4, 1).overlaps(&r(3, 5)));
  }

  #[test]
  fn test_shift() {
    assert_eq!(r(6, 4).shift(2), r(8, 6));
    assert_eq!(r(4, 6).shift(-4), r(0, 2));
  }

  #[test]
  #[should_panic]
  fn test_shift_below_zero_panics() {
    let _ = r(1, 2).shift(-2);
  }

  #[test]
  fn test_pick() {
    let items = ['a', 'b', 'c', 'd', 'e'];
    let sel = sel(&[r(0, 1), r(3, 5)]);
    assert_eq!(sel.pick(&items).unwrap(), vec!['a', 'd', 'e']);
    assert_eq!(
      sel.pick(&items[..4]).unwrap_err(),
      SelectionError::PickOutOfBounds { max: 5, len: 4 }
    );
  }

  #[test]
  fn test_queries() {
    let sel = sel(&[r(1, 3), r(5, 6)]);
    assert_eq!(sel.indices(), vec![1, 2, 5]);
    assert_eq!(sel.size(), 3);
    assert_eq!((sel.min(), sel.max()), (1, 6));
    assert!(sel.is_multiple());
    assert!(!sel.is_single());
    assert!(sel.contains(2));
    assert!(!sel.contains(3));
    assert!(Selection::single(4).is_single());
    assert!(!Selection::single(4).is_multiple());
  }

  #[test]
  fn test_eq_ranges_ignores_main() {
    let a = sel_main(&[r(0, 1), r(3, 4)], 0);
    let b = sel_main(&[r(0, 1), r(3, 4)], 1);
    assert!(a.eq_ranges(&b));
    assert_ne!(a, b);
    assert!(!a.eq_ranges(&sel(&[r(1, 0), r(3, 4)])));
  }

  #[test]
  fn test_from_indices() {
    let sel = Selection::from_indices([5, 0, 1, 2, 1, 7]).unwrap();
    assert_eq!(sel.to_string(), "0/3,5/6,7/8");
    assert_eq!(sel.main_index(), 0);
    assert!(Selection::from_indices([]).is_none());
  }

  fn arbitrary_ranges(raw: &[(u8, u8)]) -> Vec<Range> {
    raw
      .iter()
      .map(|&(start, span)| {
        let from = start as usize % 64;
        let to = from + span as usize % 8 + 1;
        Range::new_unchecked(from, to, span % 2 == 1)
      })
      .collect()
  }

  fn positions(ranges: impl IntoIterator<Item = Range>) -> Vec<usize> {
    let mut out: Vec<usize> = ranges.into_iter().flat_map(|range| range.positions()).collect();
    out.sort_unstable();
    out
  }

  quickcheck::quickcheck! {
      fn prop_normalized_sorted_and_disjoint(raw: Vec<(u8, u8)>, main: usize) -> bool {
          let ranges = arbitrary_ranges(&raw);
          if ranges.is_empty() {
              return true;
          }
          let main = main % ranges.len();
          let sel = Selection::with_main(ranges, main).unwrap();
          sel.main_index() < sel.ranges().len()
              && sel.ranges().windows(2).all(|pair| pair[0].to() < pair[1].from())
      }

      fn prop_from_indices_roundtrip(raw: Vec<u8>) -> bool {
          let indices: Vec<usize> = raw.iter().map(|&idx| idx as usize).collect();
          let mut expected = indices.clone();
          expected.sort_unstable();
          expected.dedup();
          match Selection::from_indices(indices) {
              Some(sel) => sel.indices() == expected,
              None => expected.is_empty(),
          }
      }

      fn prop_subtract_is_set_difference(a: (u8, u8), b: (u8, u8)) -> bool {
          let ranges = arbitrary_ranges(&[a, b]);
          let (a, b) = (ranges[0], ranges[1]);
          let expected: Vec<usize> =
              a.positions().filter(|pos| !b.contains(*pos)).collect();
          positions(a.subtract(&b).into_ranges()) == expected
      }

      fn prop_split_interior_keeps_remaining_length(from: u8, span: u8, at: u8) -> bool {
          let from = from as usize;
          let len = span as usize % 16 + 3;
          let index = from + 1 + at as usize % (len - 2);
          let sel = Selection::from(Range::new_unchecked(from, from + len, false));
          let split = sel.split_range(index).unwrap();
          split.ranges().len() == 2 && split.size() == len - 1 && !split.contains(index)
      }
  }
}
