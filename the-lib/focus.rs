//! Focus abstraction for `the-lib`.
//!
//! The lib only defines the interface. Hosts that render items provide the
//! concrete implementation and map item ids to whatever they draw.

use crate::item::ItemId;

pub trait FocusController: Send + Sync {
  /// Moves focus to the item. Returns false if the item could not be found.
  fn focus(&self, id: &ItemId) -> bool;
  fn is_focused(&self, id: &ItemId) -> bool;
  /// Brings the item into view. Hosts without scrolling can ignore this.
  fn reveal(&self, _id: &ItemId) {}
}

#[derive(Debug, Default)]
pub struct NoFocus;

impl FocusController for NoFocus {
  fn focus(&self, _id: &ItemId) -> bool {
    false
  }

  fn is_focused(&self, _id: &ItemId) -> bool {
    false
  }
}
