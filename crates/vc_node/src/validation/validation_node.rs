use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use super::{ErrorNode, ReportedError};
use crate::{DataNode, NodeKind};

// -----------------------------------------------------------------------------
// ValidationNode

/// The validation result for one node, shaped like the node that was checked.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationNode {
    Value,
    Mapping(ValidatedMapping),
    Sequence(ValidatedSequence),
    Error(ErrorNode),
}

impl ValidationNode {
    /// Shorthand for an [`ErrorNode`] result.
    #[inline]
    pub fn error(node: impl Into<DataNode>, reason: impl Into<String>) -> Self {
        Self::Error(ErrorNode::new(node, reason))
    }

    /// The node kind this result stands for; `None` for an error.
    pub const fn kind(&self) -> Option<NodeKind> {
        match self {
            Self::Value => Some(NodeKind::Value),
            Self::Mapping(_) => Some(NodeKind::Mapping),
            Self::Sequence(_) => Some(NodeKind::Sequence),
            Self::Error(_) => None,
        }
    }

    /// Whether this result may stand for a node of `kind`.
    ///
    /// An error may replace a node of any kind.
    #[inline]
    pub fn matches_kind(&self, kind: NodeKind) -> bool {
        self.kind().is_none_or(|k| k == kind)
    }

    #[inline]
    pub const fn as_error(&self) -> Option<&ErrorNode> {
        match self {
            Self::Error(error) => Some(error),
            _ => None,
        }
    }

    /// `true` if this node or any descendant is an [`ErrorNode`].
    pub fn has_errors(&self) -> bool {
        match self {
            Self::Value => false,
            Self::Error(_) => true,
            Self::Mapping(map) => map.children.iter().any(|(_, child)| child.has_errors()),
            Self::Sequence(seq) => seq.children.iter().any(ValidationNode::has_errors),
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    /// Every error in the tree with its path, in document order.
    ///
    /// ```
    /// use vc_node::DataNode;
    /// use vc_node::validation::{ValidatedMapping, ValidatedSequence, ValidationNode};
    ///
    /// let mut items = ValidatedSequence::default();
    /// items.push(ValidationNode::Value);
    /// items.push(ValidationNode::error(DataNode::value("x"), "not a number"));
    ///
    /// let mut root = ValidatedMapping::default();
    /// root.push("items", items.into());
    ///
    /// let tree = ValidationNode::from(root);
    /// let errors = tree.errors();
    /// assert_eq!(errors.len(), 1);
    /// assert_eq!(errors[0].path, "items[1]");
    /// ```
    pub fn errors(&self) -> Vec<ReportedError<'_>> {
        let mut errors = Vec::new();
        let mut path = String::new();
        self.collect_errors(&mut path, &mut errors);
        errors
    }

    fn collect_errors<'a>(&'a self, path: &mut String, out: &mut Vec<ReportedError<'a>>) {
        match self {
            Self::Value => {}
            Self::Error(error) => out.push(ReportedError {
                path: path.clone(),
                error,
            }),
            Self::Mapping(map) => {
                for (key, child) in &map.children {
                    let len = path.len();
                    if !path.is_empty() {
                        path.push('.');
                    }
                    path.push_str(key);
                    child.collect_errors(path, out);
                    path.truncate(len);
                }
            }
            Self::Sequence(seq) => {
                for (index, child) in seq.children.iter().enumerate() {
                    let len = path.len();
                    let _ = write!(path, "[{index}]");
                    child.collect_errors(path, out);
                    path.truncate(len);
                }
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Containers

/// Per-key results of a validated mapping, in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidatedMapping {
    pub children: Vec<(String, ValidationNode)>,
}

impl ValidatedMapping {
    #[inline]
    pub fn push(&mut self, key: impl Into<String>, child: ValidationNode) {
        self.children.push((key.into(), child));
    }

    pub fn get(&self, key: &str) -> Option<&ValidationNode> {
        self.children
            .iter()
            .find_map(|(k, child)| (k == key).then_some(child))
    }
}

/// Per-item results of a validated sequence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidatedSequence {
    pub children: Vec<ValidationNode>,
}

impl ValidatedSequence {
    #[inline]
    pub fn push(&mut self, child: ValidationNode) {
        self.children.push(child);
    }
}

impl From<ErrorNode> for ValidationNode {
    #[inline]
    fn from(error: ErrorNode) -> Self {
        Self::Error(error)
    }
}

impl From<ValidatedMapping> for ValidationNode {
    #[inline]
    fn from(map: ValidatedMapping) -> Self {
        Self::Mapping(map)
    }
}

impl From<ValidatedSequence> for ValidationNode {
    #[inline]
    fn from(seq: ValidatedSequence) -> Self {
        Self::Sequence(seq)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{ValidatedMapping, ValidatedSequence, ValidationNode};
    use crate::validation::ErrorNode;
    use crate::{DataNode, NodeKind, NodeLocation, ValueNode};
    use alloc::string::ToString;

    #[test]
    fn nested_paths_in_document_order() {
        let bad = ValueNode::new("x").with_location(NodeLocation::new(4, 9));

        let mut inner = ValidatedMapping::default();
        inner.push("name", ValidationNode::error(bad, "expected a number"));

        let mut items = ValidatedSequence::default();
        items.push(ValidationNode::Value);
        items.push(inner.into());

        let mut root = ValidatedMapping::default();
        root.push("first", ValidationNode::error(DataNode::null(), "null"));
        root.push("items", items.into());
        root.push("ok", ValidationNode::Value);

        let tree = ValidationNode::from(root);
        assert!(tree.has_errors());

        let errors = tree.errors();
        let paths: alloc::vec::Vec<_> = errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["first", "items[1].name"]);
        assert_eq!(
            errors[1].to_string(),
            "items[1].name: expected a number at 4:9 (node: x)"
        );
    }

    #[test]
    fn root_error_path() {
        let tree = ValidationNode::error(DataNode::value("v"), "bad");
        assert_eq!(tree.errors()[0].to_string(), "<root>: bad (node: v)");
    }

    #[test]
    fn empty_trees_are_valid() {
        assert!(ValidationNode::Value.is_valid());
        assert!(ValidationNode::from(ValidatedMapping::default()).is_valid());
        assert!(ValidationNode::from(ValidatedSequence::default()).is_valid());
    }

    #[test]
    fn kind_matching() {
        assert!(ValidationNode::Value.matches_kind(NodeKind::Value));
        assert!(!ValidationNode::Value.matches_kind(NodeKind::Mapping));
        let error: ValidationNode = ErrorNode::new(DataNode::null(), "e").into();
        for kind in NodeKind::ALL {
            assert!(error.matches_kind(kind));
        }
    }
}
