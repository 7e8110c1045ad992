//! Collapsible tree with single selection and keyboard-style navigation.
//!
//! Navigation walks the nodes a host would currently display: a node is
//! visible when every ancestor is expanded. Nodes start collapsed.

use std::sync::Arc;

use thiserror::Error;

use crate::{
  focus::{
    FocusController,
    NoFocus,
  },
  item::ItemId,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
  #[error("tree node '{0}' not found")]
  NotFound(ItemId),
  #[error("insert position {index} out of bounds for {len} children")]
  InsertOutOfBounds { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, TreeError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode<T> {
  id:        ItemId,
  content:   T,
  children:  Vec<TreeNode<T>>,
  collapsed: bool,
  level:     usize,
}

impl<T> TreeNode<T> {
  pub fn new(id: impl Into<ItemId>, content: T, level: usize) -> Self {
    Self {
      id: id.into(),
      content,
      children: Vec::new(),
      collapsed: true,
      level,
    }
  }

  #[must_use]
  pub fn with_children(mut self, children: Vec<TreeNode<T>>) -> Self {
    self.children = children;
    self
  }

  pub fn id(&self) -> &ItemId {
    &self.id
  }

  pub fn content(&self) -> &T {
    &self.content
  }

  pub fn content_mut(&mut self) -> &mut T {
    &mut self.content
  }

  pub fn children(&self) -> &[TreeNode<T>] {
    &self.children
  }

  pub fn level(&self) -> usize {
    self.level
  }

  pub fn is_collapsed(&self) -> bool {
    self.collapsed
  }

  pub fn expand(&mut self) {
    self.collapsed = false;
  }

  pub fn collapse(&mut self) {
    self.collapsed = true;
  }

  pub fn add(&mut self, node: TreeNode<T>) {
    self.children.push(node);
  }

  pub fn insert(&mut self, node: TreeNode<T>, index: usize) -> Result<()> {
    if index > self.children.len() {
      return Err(TreeError::InsertOutOfBounds {
        index,
        len: self.children.len(),
      });
    }
    self.children.insert(index, node);
    Ok(())
  }

  /// Removes a direct child or, failing that, the first matching descendant.
  pub fn remove(&mut self, id: &ItemId) -> Option<TreeNode<T>> {
    if let Some(index) = self.children.iter().position(|child| &child.id == id) {
      return Some(self.children.remove(index));
    }
    self
      .children
      .iter_mut()
      .find_map(|child| child.remove(id))
  }

  /// This node or any descendant with the given id.
  pub fn get(&self, id: &ItemId) -> Option<&TreeNode<T>> {
    if &self.id == id {
      return Some(self);
    }
    self.children.iter().find_map(|child| child.get(id))
  }

  pub fn get_mut(&mut self, id: &ItemId) -> Option<&mut TreeNode<T>> {
    if &self.id == id {
      return Some(self);
    }
    self.children.iter_mut().find_map(|child| child.get_mut(id))
  }
}

/// Visible nodes under `node` in pre-order.
///
/// Children of collapsed nodes are skipped. `node` itself is listed first when
/// `include_root` is set.
pub fn flatten_visible<T>(node: &TreeNode<T>, include_root: bool) -> Vec<&TreeNode<T>> {
  let mut nodes = Vec::new();
  if include_root {
    nodes.push(node);
  }
  push_visible_children(node, &mut nodes);
  nodes
}

fn push_visible_children<'a, T>(node: &'a TreeNode<T>, nodes: &mut Vec<&'a TreeNode<T>>) {
  if node.collapsed {
    return;
  }
  for child in &node.children {
    nodes.push(child);
    push_visible_children(child, nodes);
  }
}

pub struct Tree<T> {
  root:     TreeNode<T>,
  selected: Option<ItemId>,
  focus:    Arc<dyn FocusController>,
}

impl<T> Tree<T> {
  pub fn new(root: TreeNode<T>) -> Self {
    Self {
      root,
      selected: None,
      focus: Arc::new(NoFocus),
    }
  }

  pub fn with_focus(mut self, focus: Arc<dyn FocusController>) -> Self {
    self.focus = focus;
    self
  }

  pub fn root(&self) -> &TreeNode<T> {
    &self.root
  }

  pub fn root_mut(&mut self) -> &mut TreeNode<T> {
    &mut self.root
  }

  pub fn selected_id(&self) -> Option<&ItemId> {
    self.selected.as_ref()
  }

  pub fn selected(&self) -> Option<&TreeNode<T>> {
    self.selected.as_ref().and_then(|id| self.root.get(id))
  }

  /// Selects the node and focuses it.
  pub fn select(&mut self, id: &ItemId) -> Result<()> {
    if self.root.get(id).is_none() {
      return Err(TreeError::NotFound(id.clone()));
    }
    tracing::trace!("tree select {id}");
    self.selected = Some(id.clone());
    if !self.focus.is_focused(id) && !self.focus.focus(id) {
      tracing::warn!("failed to focus tree node {id}: element not found");
    }
    Ok(())
  }

  pub fn clear_selection(&mut self) {
    self.selected = None;
  }

  /// Selects the visible node above the selected one.
  pub fn up(&mut self) -> Result<()> {
    match self.visible_neighbour(|index, _| index.checked_sub(1)) {
      Some(id) => self.select(&id),
      None => Ok(()),
    }
  }

  /// Selects the visible node below the selected one.
  pub fn down(&mut self) -> Result<()> {
    match self.visible_neighbour(|index, len| (index + 1 < len).then_some(index + 1)) {
      Some(id) => self.select(&id),
      None => Ok(()),
    }
  }

  fn visible_neighbour(&self, step: impl Fn(usize, usize) -> Option<usize>) -> Option<ItemId> {
    let selected = self.selected.as_ref()?;
    let nodes = flatten_visible(&self.root, true);
    let index = nodes.iter().position(|node| &node.id == selected)?;
    step(index, nodes.len()).map(|next| nodes[next].id.clone())
  }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Tree<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Tree")
      .field("root", &self.root)
      .field("selected", &self.selected)
      .finish_non_exhaustive()
  }
}
