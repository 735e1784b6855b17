//! Abstractions for representing UI fragments.

use std::fmt;
use std::rc::Rc;

use crate::generic_node::GenericNode;

/// Internal type for [`View`].
#[derive(Clone)]
pub(crate) enum ViewType<G: GenericNode> {
    /// A view node.
    Node(G),
    /// A fragment (aka. list) of nodes.
    Fragment(Rc<[View<G>]>),
}

/// Represents an UI view. Usually constructed using the builder in [`builder`](crate::builder).
#[derive(Clone)]
pub struct View<G: GenericNode> {
    pub(crate) inner: ViewType<G>,
}

impl<G: GenericNode> View<G> {
    /// Create a new [`View`] from a raw node.
    pub fn new_node(node: G) -> Self {
        Self {
            inner: ViewType::Node(node),
        }
    }

    /// Create a new [`View`] fragment from a `Vec` of [`View`]s.
    pub fn new_fragment(fragment: Vec<View<G>>) -> Self {
        Self {
            inner: ViewType::Fragment(Rc::from(fragment)),
        }
    }

    /// Create a new [`View`] with no nodes.
    pub fn empty() -> Self {
        Self::new_fragment(Vec::new())
    }

    /// Returns the node if this view is a single node.
    pub fn as_node(&self) -> Option<&G> {
        match &self.inner {
            ViewType::Node(node) => Some(node),
            ViewType::Fragment(_) => None,
        }
    }

    /// Returns the fragment if this view is a fragment.
    pub fn as_fragment(&self) -> Option<&[View<G>]> {
        match &self.inner {
            ViewType::Node(_) => None,
            ViewType::Fragment(fragment) => Some(&fragment[..]),
        }
    }

    /// Returns every node of the view in order, descending into nested fragments.
    pub fn flatten(self) -> Vec<G> {
        match self.inner {
            ViewType::Node(node) => vec![node],
            ViewType::Fragment(fragment) => fragment
                .iter()
                .flat_map(|view| view.clone().flatten())
                .collect(),
        }
    }

    /// Returns `true` if the view contains no node.
    pub fn is_empty(&self) -> bool {
        match &self.inner {
            ViewType::Node(_) => false,
            ViewType::Fragment(fragment) => fragment.iter().all(View::is_empty),
        }
    }
}

impl<G: GenericNode> Default for View<G> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<G: GenericNode> fmt::Debug for View<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            ViewType::Node(node) => fmt::Debug::fmt(node, f),
            ViewType::Fragment(fragment) => f.debug_list().entries(fragment.iter()).finish(),
        }
    }
}
