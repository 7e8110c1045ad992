//! Ordered list of uniquely identified items with a multi-range selection.
//!
//! [`List`] owns the item sequence and the current [`Selection`] and updates
//! both together: every mutation computes the new sequence and, in the same
//! step, the selection that describes the same items afterwards. A failed
//! operation leaves both untouched and notifies nobody.
//!
//! ```ignore
//! let mut list = List::new(data, |note: &Note| note.clone(), ListOptions::default())?;
//! list.select(Selection::from_indices([0, 1]))?;
//! list.move_items(list.selection().cloned().unwrap(), 6)?;
//! ```
//!
//! Structural changes resolve items by identity. `move_items` in particular
//! rebuilds the selection from the ids that were selected before the move
//! instead of adjusting indices.

use std::{
  collections::HashSet,
  fmt,
  mem,
  sync::Arc,
};

use smallvec::SmallVec;
use the_stdx::reindex::{
  lift_and_splice,
  remove_ranges,
};
use thiserror::Error;

use crate::{
  focus::{
    FocusController,
    NoFocus,
  },
  item::{
    Identify,
    ItemFactory,
    ItemId,
    ListItem,
  },
  options::{
    ListOptions,
    SelectOptions,
  },
  selection::{
    Difference,
    Range,
    Selection,
    SelectionError,
  },
};

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ListError {
  #[error("index {index} out of bounds for list of length {len}")]
  OutOfBounds { index: usize, len: usize },
  #[error("duplicate identifier detected: '{0}'. Each item must have a unique id")]
  DuplicateId(ItemId),
  #[error("selection of {size} items is not allowed when the list is configured for single selection")]
  InvalidSelectionMode { size: usize },
  #[error("item '{0}' not found")]
  NotFound(String),
  #[error(transparent)]
  Selection(#[from] SelectionError),
}

pub type Result<T> = std::result::Result<T, ListError>;

/// Positions an operation applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Positions {
  Index(usize),
  /// `from` inclusive, `to` exclusive.
  Span(usize, usize),
  Selection(Selection),
}

impl Positions {
  fn resolve(self, len: usize) -> Result<Selection> {
    let selection = match self {
      Self::Index(index) => {
        if index >= len {
          return Err(ListError::OutOfBounds { index, len });
        }
        Selection::single(index)
      },
      Self::Span(from, to) => Selection::from(Range::create(from, to, false)?),
      Self::Selection(selection) => selection,
    };
    if selection.max() > len {
      return Err(ListError::OutOfBounds {
        index: selection.max(),
        len,
      });
    }
    Ok(selection)
  }
}

impl From<usize> for Positions {
  fn from(index: usize) -> Self {
    Self::Index(index)
  }
}

impl From<(usize, usize)> for Positions {
  fn from((from, to): (usize, usize)) -> Self {
    Self::Span(from, to)
  }
}

impl From<Selection> for Positions {
  fn from(selection: Selection) -> Self {
    Self::Selection(selection)
  }
}

/// State handed to listeners after each change.
pub struct ListSnapshot<'a, T> {
  pub items:     &'a [Arc<ListItem<T>>],
  pub selection: Option<&'a Selection>,
}

impl<T> Clone for ListSnapshot<'_, T> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<T> Copy for ListSnapshot<'_, T> {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

pub type Listener<T> = Box<dyn FnMut(ListSnapshot<'_, T>)>;

pub struct List<Y, T> {
  options:           ListOptions,
  items:             Vec<Arc<ListItem<T>>>,
  selection:         Option<Selection>,
  ids:               HashSet<ItemId>,
  factory:           ItemFactory<Y, T>,
  focus:             Arc<dyn FocusController>,
  listeners:         Vec<(SubscriptionId, Listener<T>)>,
  next_subscription: u64,
}

impl<Y, T> List<Y, T>
where
  Y: Identify,
{
  pub fn new<I, F>(data: I, builder: F, options: ListOptions) -> Result<Self>
  where
    I: IntoIterator<Item = Y>,
    F: Fn(&Y) -> T + Send + Sync + 'static,
  {
    let factory = ItemFactory::new(Box::new(builder), options.cache);
    let mut list = Self {
      options,
      items: Vec::new(),
      selection: None,
      ids: HashSet::new(),
      factory,
      focus: Arc::new(NoFocus),
      listeners: Vec::new(),
      next_subscription: 1,
    };
    let (items, ids) = list.build_items(data)?;
    list.items = items;
    list.ids = ids;
    Ok(list)
  }

  pub fn with_focus(mut self, focus: Arc<dyn FocusController>) -> Self {
    self.focus = focus;
    self
  }

  pub fn set_focus_controller(&mut self, focus: Arc<dyn FocusController>) {
    self.focus = focus;
  }

  pub fn id(&self) -> &str {
    &self.options.id
  }

  pub fn options(&self) -> &ListOptions {
    &self.options
  }

  pub fn items(&self) -> &[Arc<ListItem<T>>] {
    &self.items
  }

  pub fn selection(&self) -> Option<&Selection> {
    self.selection.as_ref()
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  /// Items covered by the current selection, in position order.
  pub fn selected(&self) -> Vec<Arc<ListItem<T>>> {
    self
      .selection
      .as_ref()
      .map(|selection| {
        selection
          .pick(&self.items)
          .expect("selection within list bounds")
      })
      .unwrap_or_default()
  }

  pub fn get_item(&self, id: &ItemId) -> Option<&Arc<ListItem<T>>> {
    self.items.iter().find(|item| item.id() == id)
  }

  /// The item the focus controller reports as focused, if any.
  pub fn focused(&self) -> Option<&Arc<ListItem<T>>> {
    self.items.iter().find(|item| self.focus.is_focused(item.id()))
  }

  pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
  where
    F: FnMut(ListSnapshot<'_, T>) + 'static,
  {
    let id = SubscriptionId(self.next_subscription);
    self.next_subscription += 1;
    self.listeners.push((id, Box::new(listener)));
    id
  }

  pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
    let before = self.listeners.len();
    self.listeners.retain(|(listener_id, _)| *listener_id != id);
    self.listeners.len() != before
  }

  fn emit(&mut self) {
    let snapshot = ListSnapshot {
      items:     &self.items,
      selection: self.selection.as_ref(),
    };
    for (_, listener) in self.listeners.iter_mut() {
      listener(snapshot);
    }
  }

  fn item_id(&self, data: &Y) -> ItemId {
    ItemId::new(&self.options.id, data.id())
  }

  fn build_items<I>(&mut self, data: I) -> Result<(Vec<Arc<ListItem<T>>>, HashSet<ItemId>)>
  where
    I: IntoIterator<Item = Y>,
  {
    let data: Vec<(ItemId, Y)> = data
      .into_iter()
      .map(|entry| (self.item_id(&entry), entry))
      .collect();
    let mut ids = HashSet::with_capacity(data.len());
    for (id, _) in &data {
      if !ids.insert(id.clone()) {
        return Err(ListError::DuplicateId(id.clone()));
      }
    }

    let mut items = Vec::with_capacity(data.len());
    let mut reused = 0;
    for (id, entry) in data {
      if self.factory.cached(&id).is_some() {
        reused += 1;
      }
      items.push(self.factory.build(id, &entry));
    }
    if self.factory.is_caching() {
      tracing::trace!(
        "list {}: {reused} of {} items reused from cache",
        self.options.id,
        items.len()
      );
    }
    Ok((items, ids))
  }

  fn build_one(&mut self, data: &Y) -> Result<Arc<ListItem<T>>> {
    let id = self.item_id(data);
    if self.ids.contains(&id) {
      return Err(ListError::DuplicateId(id));
    }
    self.ids.insert(id.clone());
    Ok(self.factory.build(id, data))
  }

  /// Replaces every item and clears the selection.
  pub fn set_data<I>(&mut self, data: I) -> Result<()>
  where
    I: IntoIterator<Item = Y>,
  {
    let (items, ids) = self.build_items(data)?;
    tracing::debug!("list {} reset with {} items", self.options.id, items.len());
    self.items = items;
    self.ids = ids;
    self.selection = None;
    self.emit();
    Ok(())
  }

  /// Adds an item to the end of the list.
  pub fn add(&mut self, data: Y) -> Result<()> {
    let item = self.build_one(&data)?;
    self.items.push(item);
    self.emit();
    Ok(())
  }

  /// Inserts an item at `index`.
  ///
  /// A selected range that straddles `index` is split around the new item,
  /// ranges at or after `index` move down with their items.
  pub fn insert(&mut self, data: Y, index: usize) -> Result<()> {
    let len = self.items.len();
    if index > len {
      return Err(ListError::OutOfBounds { index, len });
    }
    let item = self.build_one(&data)?;
    tracing::trace!("insert {} at {index}", item.id());

    self.items.insert(index, item);
    self.selection = self
      .selection
      .take()
      .map(|selection| selection_after_insert(&selection, index));
    self.emit();
    Ok(())
  }

  /// Removes the items at `positions`: an index, a `(from, to)` span or a
  /// selection.
  pub fn remove_from(&mut self, positions: impl Into<Positions>) -> Result<()> {
    let old_len = self.items.len();
    let removal = positions.into().resolve(old_len)?;
    let spans: Vec<std::ops::Range<usize>> = removal.iter().map(Range::positions).collect();

    let (items, removed) = remove_ranges(mem::take(&mut self.items), &spans);
    let focus_removed = removed.iter().any(|item| self.focus.is_focused(item.id()));
    for item in &removed {
      self.ids.remove(item.id());
    }
    tracing::trace!("removed {} items at {removal}", removed.len());

    let selection = match self.selection.take() {
      None => None,
      Some(current) if current.eq_ranges(&removal) => {
        // Removing exactly the selection clears it, except in single
        // selection mode: removing from the end selects the item above,
        // otherwise the selection stays where it is.
        if self.options.is_single() && !items.is_empty() {
          if old_len == removal.max() {
            Some(Selection::from(removal.main().shift(-1)))
          } else {
            Some(removal)
          }
        } else {
          None
        }
      },
      Some(current) => subtract_removed(&current, &removal),
    };

    if self.options.is_single()
      && focus_removed
      && let Some(item) = selection.as_ref().and_then(|sel| items.get(sel.min()))
    {
      focus_item(self.focus.as_ref(), item.id());
    }

    self.items = items;
    self.selection = selection;
    self.emit();
    Ok(())
  }

  /// Moves one item or a whole selection to slot `to`.
  ///
  /// `to` is a slot in the list as it is before the move. Moved items keep
  /// their relative order and end up contiguous. The current selection follows
  /// its items.
  pub fn move_items(&mut self, from: impl Into<Positions>, to: usize) -> Result<()> {
    let len = self.items.len();
    if to > len {
      return Err(ListError::OutOfBounds { index: to, len });
    }
    let source = from.into().resolve(len)?;

    let selected_ids: Option<HashSet<ItemId>> = self.selection.as_ref().map(|selection| {
      selection
        .iter_indices()
        .filter_map(|idx| self.items.get(idx))
        .map(|item| item.id().clone())
        .collect()
    });

    let items = lift_and_splice(self.items.clone(), &source.indices(), to);
    if items
      .iter()
      .zip(self.items.iter())
      .all(|(new, old)| new.id() == old.id())
    {
      tracing::trace!("move of {source} to {to} leaves the list unchanged");
      return Ok(());
    }

    let selection = selected_ids.and_then(|ids| {
      Selection::from_indices(
        items
          .iter()
          .enumerate()
          .filter(|(_, item)| ids.contains(item.id()))
          .map(|(idx, _)| idx),
      )
    });
    tracing::trace!("moved {source} to {to}");

    self.items = items;
    self.selection = selection;
    self.emit();
    Ok(())
  }

  /// Selects the given ranges, or clears the selection for `None`.
  pub fn select(&mut self, selection: Option<Selection>) -> Result<()> {
    self.apply_selection(selection, None)
  }

  /// Like [`Self::select`], then reveals and optionally focuses the item under
  /// the main head.
  pub fn select_with(&mut self, selection: Option<Selection>, options: SelectOptions) -> Result<()> {
    self.apply_selection(selection, Some(options))
  }

  fn apply_selection(
    &mut self,
    selection: Option<Selection>,
    options: Option<SelectOptions>,
  ) -> Result<()> {
    let Some(selection) = selection else {
      self.selection = None;
      self.emit();
      return Ok(());
    };

    self.check_selection(&selection)?;
    let head = selection.main().head_index();
    self.selection = Some(selection);
    self.emit();

    if let Some(options) = options
      && let Some(item) = self.items.get(head)
    {
      if options.scroll_into_view {
        self.focus.reveal(item.id());
      }
      if options.focus && !self.focus.is_focused(item.id()) {
        focus_item(self.focus.as_ref(), item.id());
      }
    }
    Ok(())
  }

  fn check_selection(&self, selection: &Selection) -> Result<()> {
    if selection.max() > self.items.len() {
      return Err(ListError::OutOfBounds {
        index: selection.max(),
        len:   self.items.len(),
      });
    }
    if self.options.is_single() && selection.size() > 1 {
      return Err(ListError::InvalidSelectionMode {
        size: selection.size(),
      });
    }
    Ok(())
  }

  /// Selects and focuses the item above the main head.
  pub fn up(&mut self) -> Result<()> {
    match self.navigation_head() {
      Some(head) if head > 0 => self.select_focused(head - 1),
      _ => Ok(()),
    }
  }

  /// Selects and focuses the item below the main head.
  pub fn down(&mut self) -> Result<()> {
    match self.navigation_head() {
      Some(head) if head + 1 < self.items.len() => self.select_focused(head + 1),
      _ => Ok(()),
    }
  }

  fn navigation_head(&self) -> Option<usize> {
    self.focused()?;
    self
      .selection
      .as_ref()
      .map(|selection| selection.main().head_index())
  }

  fn select_focused(&mut self, index: usize) -> Result<()> {
    self.select_with(Some(Selection::single(index)), SelectOptions {
      focus: true,
      ..SelectOptions::default()
    })
  }
}

impl<Y, T> List<Y, T>
where
  Y: Identify,
  T: Identify,
{
  pub fn get_by_content_id(&self, id: &str) -> Option<&Arc<ListItem<T>>> {
    self.items.iter().find(|item| item.content_id() == id)
  }

  /// Removes the item whose content has the given id.
  pub fn remove(&mut self, content_id: &str) -> Result<()> {
    let index = self
      .items
      .iter()
      .position(|item| item.content_id() == content_id)
      .ok_or_else(|| ListError::NotFound(content_id.to_string()))?;
    self.remove_from(index)
  }
}

impl<Y, T> fmt::Debug for List<Y, T>
where
  T: fmt::Debug,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("List")
      .field("options", &self.options)
      .field("items", &self.items)
      .field("selection", &self.selection)
      .field("listeners", &self.listeners.len())
      .finish_non_exhaustive()
  }
}

fn focus_item(focus: &dyn FocusController, id: &ItemId) {
  if !focus.focus(id) {
    tracing::warn!("failed to focus list item {id}: element not found");
  }
}

/// Selection after an item was inserted at `index`.
fn selection_after_insert(selection: &Selection, index: usize) -> Selection {
  let old_main = selection.main_index();
  let mut main_index = old_main;
  let mut ranges: SmallVec<[Range; 1]> = SmallVec::with_capacity(selection.ranges().len() + 1);

  for (idx, range) in selection.iter().enumerate() {
    if range.from() < index && index < range.to() {
      // (2, 4) with an insert at 3 becomes (2, 3) and (4, 5).
      ranges.push(Range::new_unchecked(range.from(), index, false));
      ranges.push(Range::new_unchecked(index + 1, range.to() + 1, false));
      if idx < old_main {
        main_index += 1;
      }
    } else if range.from() >= index {
      ranges.push(range.shift(1));
    } else {
      ranges.push(*range);
    }
  }

  Selection::create(ranges, main_index)
}

/// Subtracts the removed ranges from `current`, then closes the gaps they
/// leave. Returns `None` when nothing stays selected.
fn subtract_removed(current: &Selection, removal: &Selection) -> Option<Selection> {
  let mut ranges: SmallVec<[Range; 1]> = current.ranges().iter().copied().collect();
  let mut main_index = current.main_index();

  for removed in removal {
    let mut idx = 0;
    while idx < ranges.len() {
      let existing = ranges[idx];
      if !existing.overlaps(removed) {
        idx += 1;
        continue;
      }
      match existing.subtract(removed) {
        Difference::Empty => {
          ranges.remove(idx);
          if main_index >= idx {
            main_index = main_index.saturating_sub(1);
          }
        },
        Difference::One(range) => {
          ranges[idx] = range;
          idx += 1;
        },
        Difference::Two(left, right) => {
          ranges[idx] = left;
          ranges.insert(idx + 1, right);
          if main_index > idx {
            main_index += 1;
          }
          idx += 2;
        },
      }
    }
    if ranges.is_empty() {
      return None;
    }
  }

  let shifted = ranges
    .iter()
    .map(|range| {
      let before: usize = removal
        .iter()
        .filter(|removed| removed.from() < range.from())
        .map(Range::len)
        .sum();
      range.shift(-(before as isize))
    })
    .collect();
  Some(Selection::create(shifted, main_index))
}
