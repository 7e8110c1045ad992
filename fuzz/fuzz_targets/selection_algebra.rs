#![no_main]

mod common;

use std::collections::BTreeSet;

use libfuzzer_sys::fuzz_target;

use crate::common::{
  assert_normalized,
  ranges_within,
};

const LEN: usize = 256;

fuzz_target!(|data: &[u8]| {
  let raw: Vec<(u16, u16)> = data
    .chunks_exact(4)
    .map(|chunk| {
      (
        u16::from_le_bytes([chunk[0], chunk[1]]),
        u16::from_le_bytes([chunk[2], chunk[3]]),
      )
    })
    .collect();
  let ranges = ranges_within(&raw, LEN);
  let Some((first, rest)) = ranges.split_first() else {
    return;
  };

  let all: BTreeSet<usize> = ranges.iter().flat_map(|range| range.positions()).collect();
  let Ok(selection) = the_lib::selection::Selection::new(ranges.iter().copied()) else {
    return;
  };
  assert_normalized(&selection, LEN);
  // Ranges overlapping main are replaced by it, so coverage can only shrink.
  assert!(selection.iter_indices().all(|idx| all.contains(&idx)));

  // Main range wins over whatever it overlaps.
  let main = *ranges.last().unwrap_or(first);
  assert!(
    selection.ranges().iter().any(|range| range.from() <= main.from() && main.to() <= range.to())
  );

  for range in rest {
    let difference: BTreeSet<usize> = first
      .subtract(range)
      .into_ranges()
      .iter()
      .flat_map(|range| range.positions())
      .collect();
    let expected: BTreeSet<usize> = first
      .positions()
      .filter(|pos| !range.contains(*pos))
      .collect();
    assert_eq!(difference, expected);
  }

  let index = first.from();
  if selection.contains(index)
    && let Some(split) = selection.clone().split_range(index)
  {
    assert_normalized(&split, LEN);
    assert!(!split.contains(index));
    assert_eq!(split.size() + 1, selection.size());
  }
});
