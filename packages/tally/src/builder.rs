//! Builder API for constructing views without a macro.
//!
//! # Example
//! ```
//! use tally::prelude::*;
//!
//! let html = render_to_string(|ctx| {
//!     let name = ctx.create_signal("World");
//!     element(ctx, "p")
//!         .text("Hello ")
//!         .dyn_text(move || name.get().to_string())
//!         .build()
//! });
//! assert_eq!(html, "<p>Hello World</p>");
//! ```

use crate::generic_node::GenericNode;
use crate::query::TEST_ATTRIBUTE;
use crate::reactive::ScopeRef;
use crate::view::View;

/// Builds a single element node.
pub struct ElementBuilder<'a, G: GenericNode> {
    ctx: ScopeRef<'a>,
    el: G,
}

/// Starts building an element with the given tag.
pub fn element<'a, G: GenericNode>(ctx: ScopeRef<'a>, tag: &str) -> ElementBuilder<'a, G> {
    ElementBuilder {
        ctx,
        el: G::element(tag),
    }
}

impl<'a, G: GenericNode> ElementBuilder<'a, G> {
    /// Sets an attribute.
    pub fn attr(self, name: &str, value: impl AsRef<str>) -> Self {
        self.el.set_attribute(name, value.as_ref());
        self
    }

    /// Tags the element so that it can be found with [`Selector::test_id`](crate::query::Selector::test_id).
    pub fn test_id(self, id: impl AsRef<str>) -> Self {
        self.attr(TEST_ATTRIBUTE, id)
    }

    /// Appends a static text node.
    pub fn text(self, text: &str) -> Self {
        self.el.append_child(&G::text_node(text));
        self
    }

    /// Appends a text node whose content is recomputed whenever a signal read by `f` changes.
    pub fn dyn_text(self, mut f: impl FnMut() -> String + 'a) -> Self {
        let node = G::text_node("");
        self.el.append_child(&node);
        self.ctx.create_effect(move || node.update_inner_text(&f()));
        self
    }

    /// Appends every node of `view`.
    pub fn child(self, view: View<G>) -> Self {
        for node in view.flatten() {
            self.el.append_child(&node);
        }
        self
    }

    /// Registers an event handler. The handler lives as long as the builder's scope.
    pub fn on(self, event: &str, handler: impl FnMut(&G::EventType) + 'a) -> Self {
        self.el.event(self.ctx, event, Box::new(handler));
        self
    }

    /// Returns the underlying node.
    pub fn node(&self) -> &G {
        &self.el
    }

    pub fn build(self) -> View<G> {
        View::new_node(self.el)
    }
}
