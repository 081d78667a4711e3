use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::hash::BuildHasher;
use core::mem;
use core::ops::Index;

use hashbrown::HashTable;
use vc_utils::hash::FixedHashState;

use crate::{DataNode, NodeLocation};

// -----------------------------------------------------------------------------
// MappingNode

/// String-keyed entries in insertion order.
///
/// Entries live in a `Vec`; a side table of indices hashed by key gives
/// constant-time lookup. Replacing the value of an existing key keeps its
/// position.
///
/// Equality ignores order: two mappings are equal when they hold the same keys
/// with equal values.
///
/// ```
/// use vc_node::{DataNode, MappingNode};
///
/// let mut map = MappingNode::new();
/// map.insert("b", "2");
/// map.insert("a", "1");
/// map.insert("b", "3");
///
/// let keys: Vec<_> = map.keys().collect();
/// assert_eq!(keys, ["b", "a"]);
/// assert_eq!(map["b"], DataNode::value("3"));
/// ```
#[derive(Clone, Default)]
pub struct MappingNode {
    entries: Vec<(String, DataNode)>,
    indices: HashTable<usize>,
    tag: Option<String>,
    location: Option<NodeLocation>,
}

#[inline]
fn hash_key(key: &str) -> u64 {
    FixedHashState.hash_one(key)
}

impl MappingNode {
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            indices: HashTable::new(),
            tag: None,
            location: None,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            indices: HashTable::with_capacity(capacity),
            tag: None,
            location: None,
        }
    }

    fn find(&self, key: &str) -> Option<usize> {
        let entries = &self.entries;
        self.indices
            .find(hash_key(key), |&index| entries[index].0 == key)
            .copied()
    }

    /// Inserts `value` under `key`, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<DataNode>) -> Option<DataNode> {
        let key = key.into();
        let value = value.into();

        if let Some(index) = self.find(&key) {
            return Some(mem::replace(&mut self.entries[index].1, value));
        }

        let hash = hash_key(&key);
        let index = self.entries.len();
        self.entries.push((key, value));
        let entries = &self.entries;
        self.indices
            .insert_unique(hash, index, |&i| hash_key(&entries[i].0));
        None
    }

    /// Removes `key`, shifting later entries down to keep the order.
    pub fn remove(&mut self, key: &str) -> Option<DataNode> {
        let entries = &self.entries;
        let removed = match self
            .indices
            .find_entry(hash_key(key), |&index| entries[index].0 == key)
        {
            Ok(entry) => entry.remove().0,
            Err(_) => return None,
        };

        let (_, value) = self.entries.remove(removed);
        for index in self.indices.iter_mut() {
            if *index > removed {
                *index -= 1;
            }
        }
        Some(value)
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&DataNode> {
        self.find(key).map(|index| &self.entries[index].1)
    }

    #[inline]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut DataNode> {
        self.find(key).map(|index| &mut self.entries[index].1)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&String, &DataNode)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = &DataNode> {
        self.entries.iter().map(|(_, v)| v)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
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

    /// An empty mapping with the same tag and location as `self`.
    fn empty_like(&self) -> Self {
        Self {
            tag: self.tag.clone(),
            location: self.location,
            ..Self::new()
        }
    }

    /// Keeps only what `self` adds to or overrides in `baseline`.
    ///
    /// Keys missing from `baseline` are copied whole, shared keys are diffed
    /// recursively, and keys only `baseline` has are not represented. Returns
    /// `None` when nothing remains. A non-mapping baseline yields a full copy.
    pub fn except(&self, baseline: &DataNode) -> Option<MappingNode> {
        let DataNode::Mapping(base) = baseline else {
            return Some(self.clone());
        };

        let mut result = self.empty_like();
        for (key, value) in &self.entries {
            let diff = match base.get(key) {
                Some(base_value) => value.except(base_value),
                None => Some(value.copy()),
            };
            if let Some(diff) = diff {
                result.insert(key.clone(), diff);
            }
        }

        if result.is_empty() { None } else { Some(result) }
    }

    /// Merges `parent` into `self`; keys already in `self` win.
    ///
    /// Keys only the parent declares are appended after the child's own keys.
    /// When both sides hold a mapping under the same key they are merged
    /// recursively, any other pair keeps the child's node untouched.
    pub fn push_inheritance(&mut self, parent: &MappingNode) {
        for (key, parent_value) in &parent.entries {
            match self.get_mut(key) {
                Some(DataNode::Mapping(child)) => {
                    if let DataNode::Mapping(parent_map) = parent_value {
                        child.push_inheritance(parent_map);
                    }
                }
                Some(_) => {}
                None => {
                    self.insert(key.clone(), parent_value.copy());
                }
            }
        }
    }
}

impl PartialEq for MappingNode {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl Eq for MappingNode {}

impl Index<&str> for MappingNode {
    type Output = DataNode;

    /// # Panics
    ///
    /// Panics if `key` is absent.
    #[inline]
    fn index(&self, key: &str) -> &DataNode {
        match self.get(key) {
            Some(node) => node,
            None => panic!("key `{key}` not found in mapping"),
        }
    }
}

impl<K: Into<String>, V: Into<DataNode>> FromIterator<(K, V)> for MappingNode {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = MappingNode::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>, V: Into<DataNode>> Extend<(K, V)> for MappingNode {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl IntoIterator for MappingNode {
    type Item = (String, DataNode);
    type IntoIter = alloc::vec::IntoIter<(String, DataNode)>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl fmt::Debug for MappingNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl fmt::Display for MappingNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tag) = &self.tag {
            write!(f, "!{tag} ")?;
        }
        f.write_str("{")?;
        for (index, (key, value)) in self.entries.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        f.write_str("}")
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::MappingNode;
    use crate::DataNode;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    #[test]
    fn remove_keeps_order_and_lookup() {
        let mut map: MappingNode = [("a", "1"), ("b", "2"), ("c", "3"), ("d", "4")]
            .into_iter()
            .collect();

        assert_eq!(map.remove("b"), Some(DataNode::value("2")));
        assert_eq!(map.remove("b"), None);

        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, ["a", "c", "d"]);
        assert_eq!(map.get("c"), Some(&DataNode::value("3")));
        assert_eq!(map.get("d"), Some(&DataNode::value("4")));

        map.insert("b", "5");
        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, ["a", "c", "d", "b"]);
    }

    #[test]
    fn many_inserts_rehash() {
        let mut map = MappingNode::new();
        for i in 0..200 {
            map.insert(i.to_string(), i.to_string());
        }
        for i in 0..200 {
            assert_eq!(map[i.to_string().as_str()], DataNode::value(i.to_string()));
        }
        assert_eq!(map.len(), 200);
    }

    #[test]
    fn equality_ignores_order() {
        let a: MappingNode = [("x", "1"), ("y", "2")].into_iter().collect();
        let b: MappingNode = [("y", "2"), ("x", "1")].into_iter().collect();
        let c: MappingNode = [("y", "2"), ("x", "0")].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn display_flow_style() {
        let inner: MappingNode = [("k", "v w")].into_iter().collect();
        let mut map = MappingNode::new().with_tag("type:Foo");
        map.insert("a", "");
        map.insert("b", DataNode::null());
        map.insert("c", inner);
        assert_eq!(map.to_string(), r#"!type:Foo {a: "", b: ~, c: {k: v w}}"#);
    }
}
