use alloc::string::String;
use core::fmt;

use crate::{MappingNode, NodeKind, NodeLocation, SequenceNode, ValueNode};

// -----------------------------------------------------------------------------
// DataNode

/// A node of the document tree.
///
/// Trees are plain owned values: [`copy`](Self::copy) is a deep clone and no
/// two nodes ever share sub-structure.
#[derive(Clone, PartialEq, Eq)]
pub enum DataNode {
    Value(ValueNode),
    Mapping(MappingNode),
    Sequence(SequenceNode),
}

impl DataNode {
    /// A scalar with the given content.
    #[inline]
    pub fn value(content: impl Into<String>) -> Self {
        Self::Value(ValueNode::new(content))
    }

    /// The explicit null scalar.
    #[inline]
    pub const fn null() -> Self {
        Self::Value(ValueNode::null())
    }

    #[inline]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Value(_) => NodeKind::Value,
            Self::Mapping(_) => NodeKind::Mapping,
            Self::Sequence(_) => NodeKind::Sequence,
        }
    }

    /// Returns `true` only for a null scalar.
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Value(v) if v.is_null())
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Value(node) => node.tag(),
            Self::Mapping(node) => node.tag(),
            Self::Sequence(node) => node.tag(),
        }
    }

    pub fn set_tag(&mut self, tag: Option<String>) {
        match self {
            Self::Value(node) => node.set_tag(tag),
            Self::Mapping(node) => node.set_tag(tag),
            Self::Sequence(node) => node.set_tag(tag),
        }
    }

    pub const fn location(&self) -> Option<NodeLocation> {
        match self {
            Self::Value(node) => node.location(),
            Self::Mapping(node) => node.location(),
            Self::Sequence(node) => node.location(),
        }
    }

    pub fn set_location(&mut self, location: Option<NodeLocation>) {
        match self {
            Self::Value(node) => node.set_location(location),
            Self::Mapping(node) => node.set_location(location),
            Self::Sequence(node) => node.set_location(location),
        }
    }

    #[inline]
    pub const fn as_value(&self) -> Option<&ValueNode> {
        match self {
            Self::Value(node) => Some(node),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_mapping(&self) -> Option<&MappingNode> {
        match self {
            Self::Mapping(node) => Some(node),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_sequence(&self) -> Option<&SequenceNode> {
        match self {
            Self::Sequence(node) => Some(node),
            _ => None,
        }
    }

    #[inline]
    pub fn as_mapping_mut(&mut self) -> Option<&mut MappingNode> {
        match self {
            Self::Mapping(node) => Some(node),
            _ => None,
        }
    }

    #[inline]
    pub fn as_sequence_mut(&mut self) -> Option<&mut SequenceNode> {
        match self {
            Self::Sequence(node) => Some(node),
            _ => None,
        }
    }

    /// Deep, independent copy of this tree.
    #[inline]
    pub fn copy(&self) -> DataNode {
        self.clone()
    }

    /// The part of `self` that is new or different relative to `baseline`.
    ///
    /// - Scalars and sequences compare as a whole and return a full copy when
    ///   they differ.
    /// - Mappings recurse per key and drop keys without a residual difference.
    /// - A node of a different kind than `baseline` returns a full copy.
    ///
    /// Returns `None` when nothing differs, so `n.except(&n)` is always `None`.
    ///
    /// ```
    /// use vc_node::{DataNode, MappingNode};
    ///
    /// let parent: MappingNode = [("a", "1"), ("b", "x")].into_iter().collect();
    /// let child: MappingNode = [("a", "2"), ("b", "x")].into_iter().collect();
    ///
    /// let diff = DataNode::from(child).except(&parent.into()).unwrap();
    /// let expected: MappingNode = [("a", "2")].into_iter().collect();
    /// assert_eq!(diff, DataNode::from(expected));
    /// ```
    pub fn except(&self, baseline: &DataNode) -> Option<DataNode> {
        match self {
            Self::Value(node) => node.except(baseline).map(Self::Value),
            Self::Mapping(node) => node.except(baseline).map(Self::Mapping),
            Self::Sequence(node) => node.except(baseline).map(Self::Sequence),
        }
    }

    /// Returns `self` with `parent` merged underneath it.
    ///
    /// Only mapping pairs merge: every parent key is present in the result and
    /// the child's value wins for keys both declare. For any other pairing the
    /// child replaces the parent entirely.
    ///
    /// ```
    /// use vc_node::{DataNode, MappingNode};
    ///
    /// let child: MappingNode = [("a", "2")].into_iter().collect();
    /// let parent: MappingNode = [("a", "1"), ("b", "x")].into_iter().collect();
    ///
    /// let merged = DataNode::from(child).push_inheritance(&parent.into());
    /// let expected: MappingNode = [("a", "2"), ("b", "x")].into_iter().collect();
    /// assert_eq!(merged, DataNode::from(expected));
    /// ```
    pub fn push_inheritance(&self, parent: &DataNode) -> DataNode {
        match (self, parent) {
            (Self::Mapping(child), Self::Mapping(parent)) => {
                let mut merged = child.clone();
                merged.push_inheritance(parent);
                Self::Mapping(merged)
            }
            _ => self.copy(),
        }
    }
}

// -----------------------------------------------------------------------------
// Conversions

impl From<ValueNode> for DataNode {
    #[inline]
    fn from(node: ValueNode) -> Self {
        Self::Value(node)
    }
}

impl From<MappingNode> for DataNode {
    #[inline]
    fn from(node: MappingNode) -> Self {
        Self::Mapping(node)
    }
}

impl From<SequenceNode> for DataNode {
    #[inline]
    fn from(node: SequenceNode) -> Self {
        Self::Sequence(node)
    }
}

impl From<&str> for DataNode {
    #[inline]
    fn from(content: &str) -> Self {
        Self::value(content)
    }
}

impl From<String> for DataNode {
    #[inline]
    fn from(content: String) -> Self {
        Self::value(content)
    }
}

// -----------------------------------------------------------------------------
// Formatting

impl fmt::Debug for DataNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(node) => fmt::Debug::fmt(node, f),
            Self::Mapping(node) => fmt::Debug::fmt(node, f),
            Self::Sequence(node) => fmt::Debug::fmt(node, f),
        }
    }
}

impl fmt::Display for DataNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(node) => fmt::Display::fmt(node, f),
            Self::Mapping(node) => fmt::Display::fmt(node, f),
            Self::Sequence(node) => fmt::Display::fmt(node, f),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::{DataNode, MappingNode, NodeKind, SequenceNode, ValueNode};
    use alloc::vec;

    fn map(entries: &[(&str, DataNode)]) -> DataNode {
        entries
            .iter()
            .map(|(k, v)| (*k, v.clone()))
            .collect::<MappingNode>()
            .into()
    }

    fn seq(items: &[&str]) -> DataNode {
        items.iter().copied().collect::<SequenceNode>().into()
    }

    fn sample() -> DataNode {
        map(&[
            ("name", "tree".into()),
            ("empty", "".into()),
            ("nothing", DataNode::null()),
            ("tags", seq(&["a", "b"])),
            ("nested", map(&[("x", "1".into()), ("y", "2".into())])),
        ])
    }

    #[test]
    fn null_is_not_empty() {
        assert!(DataNode::null().is_null());
        assert!(!DataNode::value("").is_null());
        assert!(!DataNode::value("null").is_null());
        assert_ne!(DataNode::null(), DataNode::value(""));
    }

    #[test]
    fn tag_and_location_ignored_by_equality() {
        let plain = DataNode::value("1");
        let tagged: DataNode = ValueNode::new("1")
            .with_tag("int")
            .with_location(crate::NodeLocation::new(3, 4))
            .into();
        assert_eq!(plain, tagged);
        assert_eq!(tagged.tag(), Some("int"));
        assert_eq!(tagged.kind(), NodeKind::Value);
    }

    #[test]
    fn except_self_is_none() {
        let node = sample();
        assert_eq!(node.copy().except(&node), None);
        assert_eq!(DataNode::null().except(&DataNode::null()), None);
        assert_eq!(seq(&[]).except(&seq(&[])), None);
    }

    #[test]
    fn copy_is_independent() {
        let source = sample();
        let mut copy = source.copy();
        copy.as_mapping_mut()
            .unwrap()
            .get_mut("nested")
            .unwrap()
            .as_mapping_mut()
            .unwrap()
            .insert("x", "changed");
        assert_eq!(
            source.as_mapping().unwrap()["nested"].as_mapping().unwrap()["x"],
            DataNode::value("1")
        );
        assert_ne!(source, copy);
    }

    #[test]
    fn except_value_ignores_tag() {
        let base: DataNode = ValueNode::new("a").with_tag("t").into();
        assert_eq!(DataNode::value("a").except(&base), None);
        assert_eq!(DataNode::value("b").except(&base), Some(DataNode::value("b")));
        assert_eq!(DataNode::null().except(&DataNode::value("")), Some(DataNode::null()));
    }

    #[test]
    fn except_sequence_is_whole() {
        let base = seq(&["a", "b"]);
        let derived = seq(&["a", "c"]);
        assert_eq!(derived.except(&base), Some(derived.clone()));
    }

    #[test]
    fn except_kind_mismatch_copies() {
        let derived = map(&[("a", "1".into())]);
        assert_eq!(derived.except(&DataNode::value("a")), Some(derived.clone()));
        assert_eq!(seq(&["a"]).except(&derived), Some(seq(&["a"])));
    }

    #[test]
    fn except_mapping_recurses() {
        let base = map(&[
            ("a", "1".into()),
            ("only_base", "z".into()),
            ("nested", map(&[("x", "1".into()), ("y", "2".into())])),
        ]);
        let derived = map(&[
            ("a", "1".into()),
            ("new", "n".into()),
            ("nested", map(&[("x", "1".into()), ("y", "3".into())])),
        ]);
        let expected = map(&[
            ("new", "n".into()),
            ("nested", map(&[("y", "3".into())])),
        ]);
        assert_eq!(derived.except(&base), Some(expected));
    }

    #[test]
    fn push_inheritance_child_wins() {
        let child = map(&[("a", "2".into())]);
        let parent = map(&[("a", "1".into()), ("b", "x".into())]);
        let merged = child.push_inheritance(&parent);
        assert_eq!(merged, map(&[("a", "2".into()), ("b", "x".into())]));

        let keys: vec::Vec<_> = merged.as_mapping().unwrap().keys().collect();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn push_inheritance_merges_nested_only() {
        let child = map(&[
            ("nested", map(&[("x", "child".into())])),
            ("list", seq(&["c"])),
        ]);
        let parent = map(&[
            ("nested", map(&[("x", "parent".into()), ("y", "parent".into())])),
            ("list", seq(&["p1", "p2"])),
        ]);
        let merged = child.push_inheritance(&parent);
        let expected = map(&[
            ("nested", map(&[("x", "child".into()), ("y", "parent".into())])),
            ("list", seq(&["c"])),
        ]);
        assert_eq!(merged, expected);
    }

    #[test]
    fn push_inheritance_non_mapping_child_wins() {
        let parent = map(&[("a", "1".into())]);
        assert_eq!(DataNode::value("v").push_inheritance(&parent), DataNode::value("v"));
        assert_eq!(parent.push_inheritance(&DataNode::value("v")), parent);
    }

    #[test]
    fn except_then_inherit_restores() {
        let base = map(&[
            ("a", "1".into()),
            ("b", "2".into()),
            ("nested", map(&[("x", "1".into()), ("y", "2".into())])),
        ]);
        let derived = map(&[
            ("a", "1".into()),
            ("b", "changed".into()),
            ("c", "added".into()),
            ("nested", map(&[("x", "1".into()), ("y", "3".into()), ("z", "4".into())])),
        ]);

        let diff = derived
            .except(&base)
            .unwrap_or_else(|| MappingNode::new().into());
        assert_eq!(diff.push_inheritance(&base), derived);

        let unchanged = base.copy();
        let diff = unchanged
            .except(&base)
            .unwrap_or_else(|| MappingNode::new().into());
        assert_eq!(diff.push_inheritance(&base), unchanged);
    }
}
