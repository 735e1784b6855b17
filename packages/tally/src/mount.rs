//! Mounting a view into a detached container, for tests and command line rendering.

use crate::generic_node::{GenericNode, TreeNode};
use crate::query::{exactly_one, QueryError, Selector};
use crate::reactive::ScopeRef;
use crate::render::render_to;
use crate::view::View;

/// A view rendered into its own container, together with the scope that keeps it reactive.
///
/// The scope is disposed on [`unmount`](Self::unmount) or when the value is dropped.
pub struct Mounted {
    container: TreeNode,
    disposer: Option<Box<dyn FnOnce()>>,
}

/// Renders the view returned by `f` into a fresh `body` container.
///
/// # Example
/// ```
/// use tally::prelude::*;
///
/// let app = mount(|ctx| element(ctx, "p").test_id("greeting").text("hi").build());
/// let greeting = app.query_one(Selector::test_id("greeting")).unwrap();
/// assert_eq!(greeting.text_content(), "hi");
/// ```
pub fn mount(f: impl FnOnce(ScopeRef<'_>) -> View<TreeNode>) -> Mounted {
    let container = TreeNode::element("body");
    let disposer = render_to(f, &container);
    Mounted {
        container,
        disposer: Some(disposer),
    }
}

impl Mounted {
    pub fn container(&self) -> &TreeNode {
        &self.container
    }

    /// See [`TreeNode::query_one`]. The container itself never matches.
    pub fn query_one(&self, selector: impl Into<Selector>) -> Result<TreeNode, QueryError> {
        let selector = selector.into();
        let found = self.query_all(selector.clone());
        exactly_one(selector, found)
    }

    /// See [`TreeNode::query_all`]. The container itself never matches.
    pub fn query_all(&self, selector: impl Into<Selector>) -> Vec<TreeNode> {
        let selector = selector.into();
        self.container
            .children()
            .iter()
            .flat_map(|child| child.query_all(selector.clone()))
            .collect()
    }

    /// HTML of the mounted nodes, without the container.
    pub fn html(&self) -> String {
        self.container.inner_html()
    }

    pub fn is_mounted(&self) -> bool {
        self.disposer.is_some()
    }

    /// Disposes the scope. Rendered nodes stay readable but stop reacting to events.
    ///
    /// Calling this more than once does nothing.
    pub fn unmount(&mut self) {
        if let Some(disposer) = self.disposer.take() {
            tracing::debug!("unmounting view");
            disposer();
        }
    }
}

impl Drop for Mounted {
    fn drop(&mut self) {
        self.unmount();
    }
}
