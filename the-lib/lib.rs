pub mod drag;
pub mod focus;
pub mod item;
pub mod list;
pub mod options;
pub mod selection;
pub mod tree;
