//! Rendering views into a [`TreeNode`] or to an HTML string.

use crate::generic_node::{GenericNode, TreeNode};
use crate::reactive::*;
use crate::view::View;

/// Render a [`View`] under a `parent` node.
///
/// Returns the disposer of the scope the view was created in. Event handlers and effects stay
/// alive until it is called.
#[must_use = "not calling the disposer function will result in a memory leak"]
pub fn render_to(
    f: impl FnOnce(ScopeRef<'_>) -> View<TreeNode>,
    parent: &TreeNode,
) -> Box<dyn FnOnce()> {
    create_scope(|ctx| {
        let nodes = f(ctx).flatten();
        tracing::debug!(nodes = nodes.len(), "mounting view");
        for node in &nodes {
            parent.append_child(node);
        }
    })
}

/// Render a [`View`] into a static HTML string.
///
/// The scope is disposed as soon as the HTML has been produced.
pub fn render_to_string(f: impl FnOnce(ScopeRef<'_>) -> View<TreeNode>) -> String {
    let mut out = String::new();
    create_scope_immediate(|ctx| {
        for node in f(ctx).flatten() {
            node.write_html(&mut out);
        }
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::element;

    #[test]
    fn render_fragment_to_string() {
        let html = render_to_string(|ctx| {
            View::new_fragment(vec![
                element(ctx, "h1").text("a & b").build(),
                element(ctx, "br").build(),
            ])
        });
        assert_eq!(html, "<h1>a &amp; b</h1><br/>");
    }

    #[test]
    fn render_to_appends_under_parent() {
        let parent = TreeNode::element("main");
        let dispose = render_to(|ctx| element(ctx, "p").text("hi").build(), &parent);
        assert_eq!(parent.inner_html(), "<p>hi</p>");
        dispose();
        // Nodes stay in place. Only the reactive scope is released.
        assert_eq!(parent.inner_html(), "<p>hi</p>");
    }
}
