//! A small reactive UI library that renders into an in-memory node tree.
//!
//! Components are plain functions that take a [`ScopeRef`](reactive::ScopeRef) and their
//! properties and return a [`View`](view::View). Views are built with the [`builder`] API,
//! mounted with [`mount`](mount::mount) or [`render_to`], and inspected through typed
//! [`Selector`](query::Selector) queries.

pub mod builder;
pub mod component;
pub mod generic_node;
pub mod mount;
pub mod query;
pub mod reactive {
    pub use tally_reactive::*;
}
pub mod render;
pub mod view;

pub use render::{render_to, render_to_string};

/// The tally prelude.
pub mod prelude {
    pub use crate::builder::{element, ElementBuilder};
    pub use crate::component::{instantiate, Component};
    pub use crate::generic_node::{Event, GenericNode, Html, TreeNode};
    pub use crate::mount::{mount, Mounted};
    pub use crate::query::{QueryError, Selector, TEST_ATTRIBUTE};
    pub use crate::reactive::*;
    pub use crate::render::{render_to, render_to_string};
    pub use crate::view::View;
}
