//! Plain-value contracts between a drag/hover gesture layer and the list.
//!
//! Pointer geometry stays with the host. It reports which item is hovered and
//! on which side; these helpers turn that into slot indices the list engine
//! understands.

use serde::{
  Deserialize,
  Serialize,
};

use crate::selection::Selection;

/// Where the pointer is relative to the hovered item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoverPos {
  Above,
  Center,
  Below,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoverData {
  pub index: usize,
  pub pos:   HoverPos,
}

/// Slot of the insertion bar for the hovered item.
pub fn find_insertion(hover: HoverData) -> usize {
  match hover.pos {
    HoverPos::Above => hover.index,
    HoverPos::Center | HoverPos::Below => hover.index + 1,
  }
}

/// Translates a raw drop slot into the index the moved selection should land
/// on.
///
/// Dropping inside a selected block, or right after it, snaps to the start of
/// that block. Slots above the whole selection are kept; slots below it are
/// moved up by every selected row that gets lifted out before them.
pub fn find_move(slot: usize, selection: Option<&Selection>) -> usize {
  let Some(selection) = selection else {
    return slot;
  };

  if let Some(range) = selection
    .iter()
    .find(|range| range.from() < slot && slot <= range.to())
  {
    return range.from();
  }

  if slot <= selection.min() {
    return slot;
  }

  let removed_before = selection.iter_indices().take_while(|&idx| idx < slot).count();
  slot - removed_before
}
