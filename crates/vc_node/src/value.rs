use alloc::string::String;
use core::fmt;

use crate::{DataNode, NodeLocation};

// -----------------------------------------------------------------------------
// ValueNode

/// A scalar node.
///
/// `content == None` is the explicit null state and is distinct from an empty
/// string. Null is only ever set by whoever builds the node; the text `"null"`
/// or `"~"` is ordinary content here.
///
/// Equality compares content only.
///
/// ```
/// use vc_node::ValueNode;
///
/// assert_ne!(ValueNode::null(), ValueNode::new(""));
/// assert_eq!(ValueNode::new("1").with_tag("int"), ValueNode::new("1"));
/// assert!(!ValueNode::new("null").is_null());
/// ```
#[derive(Clone, Default)]
pub struct ValueNode {
    content: Option<String>,
    tag: Option<String>,
    location: Option<NodeLocation>,
}

impl ValueNode {
    #[inline]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tag: None,
            location: None,
        }
    }

    /// Creates the explicit null scalar.
    #[inline]
    pub const fn null() -> Self {
        Self {
            content: None,
            tag: None,
            location: None,
        }
    }

    #[inline]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    #[inline]
    pub fn into_content(self) -> Option<String> {
        self.content
    }

    #[inline]
    pub fn set_content(&mut self, content: Option<String>) {
        self.content = content;
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        self.content.is_none()
    }

    #[inline]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    #[inline]
    pub fn set_tag(&mut self, tag: Option<String>) {
        self.tag = tag;
    }

    #[inline]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    #[inline]
    pub const fn location(&self) -> Option<NodeLocation> {
        self.location
    }

    #[inline]
    pub fn set_location(&mut self, location: Option<NodeLocation>) {
        self.location = location;
    }

    #[inline]
    pub fn with_location(mut self, location: NodeLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Returns a copy of `self` unless `baseline` is a scalar with equal content.
    pub fn except(&self, baseline: &DataNode) -> Option<ValueNode> {
        match baseline {
            DataNode::Value(base) if base == self => None,
            _ => Some(self.clone()),
        }
    }
}

impl PartialEq for ValueNode {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.content == other.content
    }
}

impl Eq for ValueNode {}

impl From<&str> for ValueNode {
    #[inline]
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ValueNode {
    #[inline]
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for ValueNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("ValueNode");
        s.field("content", &self.content);
        if let Some(tag) = &self.tag {
            s.field("tag", tag);
        }
        if let Some(location) = &self.location {
            s.field("location", location);
        }
        s.finish()
    }
}

/// Scalars that would read back differently unquoted get double quotes.
fn needs_quotes(content: &str) -> bool {
    content.is_empty()
        || content == "~"
        || content.starts_with(char::is_whitespace)
        || content.ends_with(char::is_whitespace)
        || content.contains(|c: char| matches!(c, ':' | ',' | '[' | ']' | '{' | '}' | '#' | '"' | '\n'))
}

impl fmt::Display for ValueNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tag) = &self.tag {
            write!(f, "!{tag} ")?;
        }
        match &self.content {
            None => f.write_str("~"),
            Some(content) if needs_quotes(content) => write!(f, "{content:?}"),
            Some(content) => f.write_str(content),
        }
    }
}
