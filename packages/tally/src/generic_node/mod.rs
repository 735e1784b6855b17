//! Abstraction over a rendering backend.

mod tree_node;

use std::fmt;

use crate::reactive::ScopeRef;

pub use tree_node::{Event, TreeNode};

/// Abstraction over a rendering backend.
///
/// You would probably use this trait as a trait bound when you want to accept any rendering
/// backend. For example, components are often generic over [`GenericNode`] to be able to render
/// to different backends.
///
/// Note that components are **NOT** represented by [`GenericNode`]. Instead, components are
/// _disappearing_, meaning that they are simply functions that generate [`GenericNode`]s inside a
/// new reactive context. This means that using [`GenericNode`] is only for element and text
/// nodes.
pub trait GenericNode: fmt::Debug + Clone + PartialEq + Eq + 'static {
    /// The type of the event that is passed to the event handler.
    type EventType;

    /// Create a new element node.
    fn element(tag: &str) -> Self;

    /// Create a new text node.
    fn text_node(text: &str) -> Self;

    /// Appends a child to the node's children.
    fn append_child(&self, child: &Self);

    /// Sets an attribute on a node.
    fn set_attribute(&self, name: &str, value: &str);

    /// Replaces the text of a text node, or every child of an element with a single text node.
    fn update_inner_text(&self, text: &str);

    /// Add a event handler to the event `name`.
    ///
    /// The handler is dropped when `ctx` is disposed.
    fn event<'a>(
        &self,
        ctx: ScopeRef<'a>,
        name: &str,
        handler: Box<dyn FnMut(&Self::EventType) + 'a>,
    );
}

/// Trait that is implemented by all [`GenericNode`] backends that render to HTML.
pub trait Html: GenericNode<EventType = Event> {
    /// A boolean indicating whether this node is rendered in a browser context.
    ///
    /// A value of `false` does not necessarily mean that it is not being rendered in WASM or even
    /// in the browser. It only means that it does not create DOM nodes.
    const IS_BROWSER: bool;
}
