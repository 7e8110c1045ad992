use std::sync::atomic::{
  AtomicU64,
  Ordering,
};

use serde::{
  Deserialize,
  Serialize,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptionsError {
  #[error("invalid list options: {0}")]
  Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
  #[default]
  Multi,
  Single,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListOptions {
  /// Prefix of every item id in the list.
  pub id:        String,
  /// Reuse built items for data with the same identity.
  pub cache:     bool,
  pub selection: SelectionMode,
}

impl Default for ListOptions {
  fn default() -> Self {
    static NEXT_LIST: AtomicU64 = AtomicU64::new(1);
    Self {
      id:        format!("list-{}", NEXT_LIST.fetch_add(1, Ordering::Relaxed)),
      cache:     true,
      selection: SelectionMode::Multi,
    }
  }
}

impl ListOptions {
  pub fn from_toml(source: &str) -> Result<Self, OptionsError> {
    Ok(toml::from_str(source)?)
  }

  pub fn single(mut self) -> Self {
    self.selection = SelectionMode::Single;
    self
  }

  pub fn with_id(mut self, id: impl Into<String>) -> Self {
    self.id = id.into();
    self
  }

  pub fn is_single(&self) -> bool {
    self.selection == SelectionMode::Single
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectOptions {
  pub scroll_into_view: bool,
  pub focus:            bool,
}

impl Default for SelectOptions {
  fn default() -> Self {
    Self {
      scroll_into_view: true,
      focus:            false,
    }
  }
}
