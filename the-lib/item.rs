//! List items and the builder cache that produces them.
//!
//! External data is mapped to list items through a builder function. Every
//! item gets an [`ItemId`] composed of the list id and the identity of the data
//! it was built from, so the same data keeps the same item across rebuilds.

use std::{
  collections::HashMap,
  fmt,
  sync::Arc,
};

/// Anything with a stable identity that does not depend on its position.
pub trait Identify {
  fn id(&self) -> &str;
}

impl Identify for String {
  fn id(&self) -> &str {
    self
  }
}

impl Identify for &str {
  fn id(&self) -> &str {
    self
  }
}

/// Identity of an item within a list: `"{list id}-{data id}"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(String);

impl ItemId {
  pub fn new(list_id: &str, data_id: &str) -> Self {
    Self(format!("{list_id}-{data_id}"))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl From<&str> for ItemId {
  fn from(id: &str) -> Self {
    Self(id.to_string())
  }
}

impl From<String> for ItemId {
  fn from(id: String) -> Self {
    Self(id)
  }
}

impl fmt::Display for ItemId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ListItem<T> {
  id:      ItemId,
  content: T,
}

impl<T> ListItem<T> {
  pub fn new(id: ItemId, content: T) -> Self {
    Self { id, content }
  }

  pub fn id(&self) -> &ItemId {
    &self.id
  }

  pub fn content(&self) -> &T {
    &self.content
  }
}

impl<T: Identify> ListItem<T> {
  /// Identity of the content, as opposed to the list-scoped [`ItemId`].
  pub fn content_id(&self) -> &str {
    self.content.id()
  }
}

pub type ItemBuilder<Y, T> = Box<dyn Fn(&Y) -> T + Send + Sync>;

/// Builds items and remembers them by id.
pub struct ItemFactory<Y, T> {
  builder: ItemBuilder<Y, T>,
  cache:   Option<HashMap<ItemId, Arc<ListItem<T>>>>,
}

impl<Y, T> ItemFactory<Y, T>
where
  Y: Identify,
{
  pub fn new(builder: ItemBuilder<Y, T>, cache: bool) -> Self {
    Self {
      builder,
      cache: cache.then(HashMap::new),
    }
  }

  pub fn is_caching(&self) -> bool {
    self.cache.is_some()
  }

  /// Returns the cached item for `id` or builds a new one from `data`.
  pub fn build(&mut self, id: ItemId, data: &Y) -> Arc<ListItem<T>> {
    let Some(cache) = self.cache.as_mut() else {
      return Arc::new(ListItem::new(id, (self.builder)(data)));
    };
    if let Some(item) = cache.get(&id) {
      return Arc::clone(item);
    }
    let item = Arc::new(ListItem::new(id.clone(), (self.builder)(data)));
    cache.insert(id, Arc::clone(&item));
    item
  }

  pub fn cached(&self, id: &ItemId) -> Option<&Arc<ListItem<T>>> {
    self.cache.as_ref().and_then(|cache| cache.get(id))
  }
}

impl<Y, T> fmt::Debug for ItemFactory<Y, T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ItemFactory")
      .field("cached", &self.cache.as_ref().map(HashMap::len))
      .finish_non_exhaustive()
  }
}
