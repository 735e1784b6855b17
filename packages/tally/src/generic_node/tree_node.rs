//! In-memory rendering backend.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::generic_node::{GenericNode, Html};
use crate::reactive::ScopeRef;

/// Elements that never have children and are rendered without a closing tag.
static VOID_ELEMENTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    vec![
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
        "source", "track", "wbr",
    ]
    .into_iter()
    .collect()
});

/// An event dispatched on a [`TreeNode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    name: String,
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The event type, e.g. `"click"`.
    pub fn name(&self) -> &str {
        &self.name
    }
}

type EventHandler = Box<dyn FnMut(&Event)>;

/// Holds a handler until the scope that registered it is disposed.
///
/// The handler is moved out of the slot while it runs, so it may dispose its own scope.
struct ListenerSlot {
    handler: RefCell<Option<EventHandler>>,
    disposed: Cell<bool>,
}

impl ListenerSlot {
    /// Runs the handler if it is still live. Returns whether it ran.
    fn call(&self, event: &Event) -> bool {
        let handler = self.handler.borrow_mut().take();
        match handler {
            Some(mut handler) => {
                handler(event);
                if !self.disposed.get() {
                    *self.handler.borrow_mut() = Some(handler);
                }
                true
            }
            None => false,
        }
    }

    fn dispose(&self) {
        self.disposed.set(true);
        self.handler.borrow_mut().take();
    }
}

struct Listener {
    name: String,
    slot: Rc<ListenerSlot>,
}

enum NodeKind {
    Element {
        tag: String,
        attributes: IndexMap<String, String>,
        children: Vec<TreeNode>,
    },
    Text(String),
}

struct NodeData {
    kind: NodeKind,
    listeners: Vec<Listener>,
}

/// A node of an in-memory rendered tree.
///
/// `TreeNode` is a cheap handle: cloning it yields another handle to the same node, and two
/// handles compare equal only if they point to the same node.
#[derive(Clone)]
pub struct TreeNode(Rc<RefCell<NodeData>>);

impl TreeNode {
    fn new(kind: NodeKind) -> Self {
        Self(Rc::new(RefCell::new(NodeData {
            kind,
            listeners: Vec::new(),
        })))
    }

    /// The tag name, or `None` for a text node.
    pub fn tag(&self) -> Option<String> {
        match &self.0.borrow().kind {
            NodeKind::Element { tag, .. } => Some(tag.clone()),
            NodeKind::Text(_) => None,
        }
    }

    /// The value of the attribute `name`, if set.
    pub fn attribute(&self, name: &str) -> Option<String> {
        match &self.0.borrow().kind {
            NodeKind::Element { attributes, .. } => attributes.get(name).cloned(),
            NodeKind::Text(_) => None,
        }
    }

    /// The direct children of this node. Text nodes have none.
    pub fn children(&self) -> Vec<TreeNode> {
        match &self.0.borrow().kind {
            NodeKind::Element { children, .. } => children.clone(),
            NodeKind::Text(_) => Vec::new(),
        }
    }

    /// The concatenated text of this node and all of its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) {
        match &self.0.borrow().kind {
            NodeKind::Element { children, .. } => {
                for child in children {
                    child.write_text(out);
                }
            }
            NodeKind::Text(text) => out.push_str(text),
        }
    }

    /// Runs every live listener registered for the event's name and returns how many ran.
    pub fn dispatch(&self, event: &Event) -> usize {
        // Collect first so that handlers are free to mutate this node.
        let handlers: Vec<_> = self
            .0
            .borrow()
            .listeners
            .iter()
            .filter(|listener| listener.name == event.name())
            .map(|listener| listener.slot.clone())
            .collect();

        let ran = handlers.iter().filter(|slot| slot.call(event)).count();
        tracing::debug!(event = event.name(), listeners = ran, "dispatched event");
        ran
    }

    /// Dispatches a `click` event.
    pub fn click(&self) -> usize {
        self.dispatch(&Event::new("click"))
    }

    /// Renders this node, including its own tag, to HTML.
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    /// Renders the children of this node to HTML.
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in self.children() {
            child.write_html(&mut out);
        }
        out
    }

    pub(crate) fn write_html(&self, out: &mut String) {
        match &self.0.borrow().kind {
            NodeKind::Element {
                tag,
                attributes,
                children,
            } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    html_escape::encode_double_quoted_attribute_to_string(value, out);
                    out.push('"');
                }

                if VOID_ELEMENTS.contains(tag.as_str()) {
                    debug_assert!(children.is_empty(), "void element with children");
                    out.push_str("/>");
                } else {
                    out.push('>');
                    for child in children {
                        child.write_html(out);
                    }
                    out.push_str("</");
                    out.push_str(tag);
                    out.push('>');
                }
            }
            NodeKind::Text(text) => {
                html_escape::encode_text_to_string(text, out);
            }
        }
    }
}

impl PartialEq for TreeNode {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for TreeNode {}

impl fmt::Debug for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TreeNode").field(&self.outer_html()).finish()
    }
}

impl GenericNode for TreeNode {
    type EventType = Event;

    fn element(tag: &str) -> Self {
        Self::new(NodeKind::Element {
            tag: tag.to_owned(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        })
    }

    fn text_node(text: &str) -> Self {
        Self::new(NodeKind::Text(text.to_owned()))
    }

    fn append_child(&self, child: &Self) {
        match &mut self.0.borrow_mut().kind {
            NodeKind::Element { children, .. } => children.push(child.clone()),
            NodeKind::Text(_) => tracing::warn!("cannot append a child to a text node"),
        }
    }

    fn set_attribute(&self, name: &str, value: &str) {
        match &mut self.0.borrow_mut().kind {
            NodeKind::Element { attributes, .. } => {
                attributes.insert(name.to_owned(), value.to_owned());
            }
            NodeKind::Text(_) => tracing::warn!(name, "cannot set an attribute on a text node"),
        }
    }

    fn update_inner_text(&self, text: &str) {
        match &mut self.0.borrow_mut().kind {
            NodeKind::Element { children, .. } => {
                *children = vec![TreeNode::text_node(text)];
            }
            NodeKind::Text(current) => {
                current.clear();
                current.push_str(text);
            }
        }
    }

    fn event<'a>(&self, ctx: ScopeRef<'a>, name: &str, handler: Box<dyn FnMut(&Event) + 'a>) {
        // SAFETY: The cleanup registered below drops the handler when `ctx` is disposed. Scopes
        // run their cleanups before freeing their signals, so the handler never outlives anything
        // it borrows from `ctx`.
        let handler = unsafe {
            std::mem::transmute::<Box<dyn FnMut(&Event) + 'a>, Box<dyn FnMut(&Event) + 'static>>(
                handler,
            )
        };
        let slot = Rc::new(ListenerSlot {
            handler: RefCell::new(Some(handler)),
            disposed: Cell::new(false),
        });
        self.0.borrow_mut().listeners.push(Listener {
            name: name.to_owned(),
            slot: slot.clone(),
        });
        ctx.on_cleanup(move || slot.dispose());
    }
}

impl Html for TreeNode {
    const IS_BROWSER: bool = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::*;

    #[test]
    fn text_content_concatenates_descendants() {
        let p = TreeNode::element("p");
        p.append_child(&TreeNode::text_node("Value: "));
        let span = TreeNode::element("span");
        span.append_child(&TreeNode::text_node("3"));
        p.append_child(&span);

        assert_eq!(p.text_content(), "Value: 3");
        assert_eq!(p.children().len(), 2);
        assert_eq!(span.tag().as_deref(), Some("span"));
    }

    #[test]
    fn update_inner_text_replaces_children() {
        let p = TreeNode::element("p");
        p.append_child(&TreeNode::element("br"));
        p.update_inner_text("hello");
        assert_eq!(p.outer_html(), "<p>hello</p>");

        let text = TreeNode::text_node("a");
        text.update_inner_text("b");
        assert_eq!(text.text_content(), "b");
    }

    #[test]
    fn html_is_escaped() {
        let div = TreeNode::element("div");
        div.set_attribute("title", "\"quoted\"");
        div.append_child(&TreeNode::text_node("1 < 2 & 3"));
        div.append_child(&TreeNode::element("input"));

        assert_eq!(
            div.outer_html(),
            "<div title=\"&quot;quoted&quot;\">1 &lt; 2 &amp; 3<input/></div>"
        );
    }

    #[test]
    fn identity_equality() {
        let a = TreeNode::element("div");
        let b = TreeNode::element("div");
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn listeners_are_dropped_with_their_scope() {
        let clicks = Rc::new(Cell::new(0));
        let button = TreeNode::element("button");

        let disposer = create_scope(|ctx| {
            let clicks = clicks.clone();
            button.event(
                ctx,
                "click",
                Box::new(move |_: &Event| clicks.set(clicks.get() + 1)),
            );
        });

        assert_eq!(button.click(), 1);
        assert_eq!(button.dispatch(&Event::new("input")), 0);
        assert_eq!(clicks.get(), 1);

        disposer();
        assert_eq!(button.click(), 0);
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn handler_can_dispose_its_own_scope() {
        let clicks = Rc::new(Cell::new(0));
        let button = TreeNode::element("button");

        create_scope_immediate(|ctx| {
            let dispose_child: Rc<RefCell<Option<Box<dyn FnOnce() + '_>>>> = Default::default();
            let disposer = ctx.create_child_scope(|child| {
                let clicks = clicks.clone();
                let dispose_child = dispose_child.clone();
                button.event(
                    child,
                    "click",
                    Box::new(move |_: &Event| {
                        clicks.set(clicks.get() + 1);
                        if let Some(dispose) = dispose_child.borrow_mut().take() {
                            dispose();
                        }
                    }),
                );
            });
            *dispose_child.borrow_mut() = Some(disposer);

            assert_eq!(button.click(), 1);
            assert_eq!(clicks.get(), 1);
            // The handler went away with its scope.
            assert_eq!(button.click(), 0);
            assert_eq!(clicks.get(), 1);
        });
    }
}
