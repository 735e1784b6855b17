//! Typed lookups over a rendered [`TreeNode`] tree.

use std::fmt;

use thiserror::Error;

use crate::generic_node::TreeNode;

/// Attribute used to tag nodes for tests and automation.
pub const TEST_ATTRIBUTE: &str = "data-test";

/// Describes which nodes a query matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Elements with the given tag name.
    Tag(String),
    /// Elements whose attribute `name` equals `value`.
    Attribute { name: String, value: String },
}

impl Selector {
    pub fn tag(tag: impl Into<String>) -> Self {
        Self::Tag(tag.into())
    }

    pub fn attribute(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Attribute {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Elements tagged with [`TEST_ATTRIBUTE`] set to `id`.
    pub fn test_id(id: impl AsRef<str>) -> Self {
        Self::attribute(TEST_ATTRIBUTE, id.as_ref())
    }

    pub fn matches(&self, node: &TreeNode) -> bool {
        match self {
            Selector::Tag(tag) => node.tag().as_deref() == Some(tag.as_str()),
            Selector::Attribute { name, value } => {
                node.attribute(name).as_deref() == Some(value.as_str())
            }
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Tag(tag) => f.write_str(tag),
            Selector::Attribute { name, value } => write!(f, "[{}='{}']", name, value),
        }
    }
}

/// Error returned by [`TreeNode::query_one`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("no node matches `{selector}`")]
    NotFound { selector: Selector },
    #[error("{count} nodes match `{selector}`, expected exactly one")]
    Ambiguous { selector: Selector, count: usize },
}

impl TreeNode {
    /// Every node matching `selector`, this node included, in document order.
    pub fn query_all(&self, selector: impl Into<Selector>) -> Vec<TreeNode> {
        let selector = selector.into();
        let mut found = Vec::new();
        self.collect_matches(&selector, &mut found);
        found
    }

    /// The only node matching `selector`.
    ///
    /// Fails if no node or more than one node matches.
    pub fn query_one(&self, selector: impl Into<Selector>) -> Result<TreeNode, QueryError> {
        let selector = selector.into();
        let found = self.query_all(selector.clone());
        exactly_one(selector, found)
    }

    fn collect_matches(&self, selector: &Selector, found: &mut Vec<TreeNode>) {
        if selector.matches(self) {
            found.push(self.clone());
        }
        for child in self.children() {
            child.collect_matches(selector, found);
        }
    }
}

pub(crate) fn exactly_one(
    selector: Selector,
    mut found: Vec<TreeNode>,
) -> Result<TreeNode, QueryError> {
    match found.len() {
        0 => Err(QueryError::NotFound { selector }),
        1 => Ok(found.remove(0)),
        count => Err(QueryError::Ambiguous { selector, count }),
    }
}
