use serde_core::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::{DataNode, MappingNode, SequenceNode, ValueNode};

impl Serialize for ValueNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.content() {
            Some(content) => serializer.serialize_str(content),
            None => serializer.serialize_unit(),
        }
    }
}

impl Serialize for MappingNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for SequenceNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for item in self.iter() {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

impl Serialize for DataNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DataNode::Value(node) => node.serialize(serializer),
            DataNode::Mapping(node) => node.serialize(serializer),
            DataNode::Sequence(node) => node.serialize(serializer),
        }
    }
}
