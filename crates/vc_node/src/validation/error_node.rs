use alloc::string::String;
use core::fmt;

use crate::{DataNode, NodeLocation};

// -----------------------------------------------------------------------------
// ErrorNode

/// A failed position in a validation tree.
///
/// Holds a copy of the offending node, so its source location is available
/// for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorNode {
    pub node: DataNode,
    pub reason: String,
    /// Reported even when an enclosing alternative validated successfully.
    pub always_relevant: bool,
}

impl ErrorNode {
    pub fn new(node: impl Into<DataNode>, reason: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            reason: reason.into(),
            always_relevant: false,
        }
    }

    #[inline]
    pub fn always_relevant(mut self) -> Self {
        self.always_relevant = true;
        self
    }

    #[inline]
    pub const fn location(&self) -> Option<NodeLocation> {
        self.node.location()
    }
}

impl fmt::Display for ErrorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location() {
            Some(location) => write!(f, "{} at {location} (node: {})", self.reason, self.node),
            None => write!(f, "{} (node: {})", self.reason, self.node),
        }
    }
}

// -----------------------------------------------------------------------------
// ReportedError

/// An [`ErrorNode`] together with its path from the root of the tree,
/// such as `items[2].name`.
#[derive(Debug, Clone)]
pub struct ReportedError<'a> {
    pub path: String,
    pub error: &'a ErrorNode,
}

impl fmt::Display for ReportedError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "<root>: {}", self.error)
        } else {
            write!(f, "{}: {}", self.path, self.error)
        }
    }
}
