use the_lib::{
  list::List,
  options::ListOptions,
  selection::{
    Range,
    Selection,
  },
};

const MAX_ITEMS: usize = 64;
const MAX_RANGES: usize = 16;
const MAX_OPS: usize = 64;

#[derive(Debug, Clone)]
pub enum ListOp {
  Insert { index: u16 },
  RemoveFrom { ranges: Vec<(u16, u16)> },
  Move { ranges: Vec<(u16, u16)>, to: u16 },
  Select { ranges: Vec<(u16, u16)>, main: u8 },
  Clear,
}

pub struct FuzzSession {
  pub list:    List<String, String>,
  pub next_id: usize,
  pub ops:     Vec<ListOp>,
}

pub fn session_from_bytes(data: &[u8]) -> Option<FuzzSession> {
  let mut cursor = ByteCursor::new(data);
  let single = cursor.next_u8() % 4 == 0;
  let len = cursor.next_usize(MAX_ITEMS);
  let op_count = cursor.next_usize(MAX_OPS);
  let mut ops = Vec::with_capacity(op_count);
  for _ in 0..op_count {
    let op = match cursor.next_u8() % 5 {
      0 => ListOp::Insert {
        index: cursor.next_u16(),
      },
      1 => ListOp::RemoveFrom {
        ranges: cursor.next_ranges(),
      },
      2 => ListOp::Move {
        ranges: cursor.next_ranges(),
        to:     cursor.next_u16(),
      },
      3 => ListOp::Select {
        ranges: cursor.next_ranges(),
        main:   cursor.next_u8(),
      },
      _ => ListOp::Clear,
    };
    ops.push(op);
  }

  let mut options = ListOptions::default();
  if single {
    options = options.single();
  }
  let list = List::new(
    (0..len).map(|idx| idx.to_string()),
    |data: &String| data.clone(),
    options,
  )
  .ok()?;

  Some(FuzzSession {
    list,
    next_id: len,
    ops,
  })
}

/// Ranges from raw `(start, len)` pairs, clamped to `len` positions.
pub fn ranges_within(raw: &[(u16, u16)], len: usize) -> Vec<Range> {
  if len == 0 {
    return Vec::new();
  }
  raw
    .iter()
    .filter_map(|&(start, span)| {
      let from = start as usize % len;
      let to = (from + 1 + span as usize % 8).min(len);
      Range::new(from, to).ok()
    })
    .collect()
}

pub fn selection_within(raw: &[(u16, u16)], main: u8, len: usize) -> Option<Selection> {
  let ranges = ranges_within(raw, len);
  if ranges.is_empty() {
    return None;
  }
  let main = main as usize % ranges.len();
  Selection::with_main(ranges, main).ok()
}

/// Checks the invariants every selection must hold after an operation.
pub fn assert_normalized(selection: &Selection, len: usize) {
  let ranges = selection.ranges();
  assert!(!ranges.is_empty());
  assert!(selection.main_index() < ranges.len());
  for range in ranges {
    assert!(range.from() < range.to());
  }
  for pair in ranges.windows(2) {
    assert!(pair[0].to() < pair[1].from(), "ranges not disjoint: {selection}");
  }
  assert!(selection.max() <= len, "selection {selection} past end {len}");
}

struct ByteCursor<'a> {
  data: &'a [u8],
  pos:  usize,
}

impl<'a> ByteCursor<'a> {
  fn new(data: &'a [u8]) -> Self {
    Self { data, pos: 0 }
  }

  fn next_u8(&mut self) -> u8 {
    let value = self.data.get(self.pos).copied().unwrap_or(0);
    self.pos = self.pos.saturating_add(1);
    value
  }

  fn next_u16(&mut self) -> u16 {
    let lo = self.next_u8() as u16;
    let hi = self.next_u8() as u16;
    lo | (hi << 8)
  }

  fn next_usize(&mut self, max: usize) -> usize {
    if max == 0 {
      return 0;
    }
    (self.next_u16() as usize) % (max + 1)
  }

  fn next_ranges(&mut self) -> Vec<(u16, u16)> {
    let count = 1 + self.next_usize(MAX_RANGES - 1);
    (0..count)
      .map(|_| (self.next_u16(), self.next_u16()))
      .collect()
  }
}
