use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Index;

use crate::{DataNode, NodeLocation};

// -----------------------------------------------------------------------------
// SequenceNode

/// An ordered list of nodes, compared element-wise.
#[derive(Clone, Default)]
pub struct SequenceNode {
    items: Vec<DataNode>,
    tag: Option<String>,
    location: Option<NodeLocation>,
}

impl SequenceNode {
    #[inline]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            tag: None,
            location: None,
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            tag: None,
            location: None,
        }
    }

    #[inline]
    pub fn push(&mut self, item: impl Into<DataNode>) {
        self.items.push(item.into());
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&DataNode> {
        self.items.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut DataNode> {
        self.items.get_mut(index)
    }

    #[inline]
    pub fn items(&self) -> &[DataNode] {
        &self.items
    }

    #[inline]
    pub fn into_items(self) -> Vec<DataNode> {
        self.items
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, DataNode> {
        self.items.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
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

    /// Sequences are diffed as a whole: any difference yields a full copy.
    pub fn except(&self, baseline: &DataNode) -> Option<SequenceNode> {
        match baseline {
            DataNode::Sequence(base) if base == self => None,
            _ => Some(self.clone()),
        }
    }
}

impl PartialEq for SequenceNode {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for SequenceNode {}

impl Index<usize> for SequenceNode {
    type Output = DataNode;

    #[inline]
    fn index(&self, index: usize) -> &DataNode {
        &self.items[index]
    }
}

impl<N: Into<DataNode>> FromIterator<N> for SequenceNode {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Into::into).collect(),
            tag: None,
            location: None,
        }
    }
}

impl<N: Into<DataNode>> Extend<N> for SequenceNode {
    fn extend<I: IntoIterator<Item = N>>(&mut self, iter: I) {
        self.items.extend(iter.into_iter().map(Into::into));
    }
}

impl IntoIterator for SequenceNode {
    type Item = DataNode;
    type IntoIter = alloc::vec::IntoIter<DataNode>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a SequenceNode {
    type Item = &'a DataNode;
    type IntoIter = core::slice::Iter<'a, DataNode>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Debug for SequenceNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.items).finish()
    }
}

impl fmt::Display for SequenceNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tag) = &self.tag {
            write!(f, "!{tag} ")?;
        }
        f.write_str("[")?;
        for (index, item) in self.items.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            fmt::Display::fmt(item, f)?;
        }
        f.write_str("]")
    }
}
