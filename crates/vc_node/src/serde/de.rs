use alloc::string::{String, ToString};
use core::fmt;

use serde_core::de::{Deserialize, Deserializer, Error, MapAccess, SeqAccess, Visitor};

use crate::{DataNode, MappingNode, SequenceNode};

// -----------------------------------------------------------------------------
// DataNode

struct DataNodeVisitor;

impl<'de> Visitor<'de> for DataNodeVisitor {
    type Value = DataNode;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a scalar, sequence or mapping")
    }

    fn visit_bool<E: Error>(self, v: bool) -> Result<DataNode, E> {
        Ok(DataNode::value(if v { "true" } else { "false" }))
    }

    fn visit_i64<E: Error>(self, v: i64) -> Result<DataNode, E> {
        Ok(DataNode::value(v.to_string()))
    }

    fn visit_i128<E: Error>(self, v: i128) -> Result<DataNode, E> {
        Ok(DataNode::value(v.to_string()))
    }

    fn visit_u64<E: Error>(self, v: u64) -> Result<DataNode, E> {
        Ok(DataNode::value(v.to_string()))
    }

    fn visit_u128<E: Error>(self, v: u128) -> Result<DataNode, E> {
        Ok(DataNode::value(v.to_string()))
    }

    // Widening to f64 first would print `0.1_f32` as `0.10000000149011612`.
    fn visit_f32<E: Error>(self, v: f32) -> Result<DataNode, E> {
        Ok(DataNode::value(v.to_string()))
    }

    fn visit_f64<E: Error>(self, v: f64) -> Result<DataNode, E> {
        Ok(DataNode::value(v.to_string()))
    }

    fn visit_char<E: Error>(self, v: char) -> Result<DataNode, E> {
        Ok(DataNode::value(v.to_string()))
    }

    fn visit_str<E: Error>(self, v: &str) -> Result<DataNode, E> {
        Ok(DataNode::value(v))
    }

    fn visit_string<E: Error>(self, v: String) -> Result<DataNode, E> {
        Ok(DataNode::value(v))
    }

    fn visit_unit<E: Error>(self) -> Result<DataNode, E> {
        Ok(DataNode::null())
    }

    fn visit_none<E: Error>(self) -> Result<DataNode, E> {
        Ok(DataNode::null())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<DataNode, D::Error> {
        DataNode::deserialize(deserializer)
    }

    fn visit_newtype_struct<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> Result<DataNode, D::Error> {
        DataNode::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<DataNode, A::Error> {
        let mut node = SequenceNode::with_capacity(seq.size_hint().unwrap_or_default());
        while let Some(item) = seq.next_element::<DataNode>()? {
            node.push(item);
        }
        Ok(node.into())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<DataNode, A::Error> {
        let mut node = MappingNode::with_capacity(map.size_hint().unwrap_or_default());
        while let Some(key) = map.next_key::<DataNode>()? {
            let key = match key {
                DataNode::Value(value) => match value.into_content() {
                    Some(key) => key,
                    None => return Err(Error::custom("mapping keys must not be null")),
                },
                other => {
                    return Err(Error::custom(format_args!(
                        "mapping keys must be scalars, found a {}",
                        other.kind()
                    )));
                }
            };
            let value = map.next_value::<DataNode>()?;
            if node.insert(key.clone(), value).is_some() {
                return Err(Error::custom(format_args!("duplicate mapping key `{key}`")));
            }
        }
        Ok(node.into())
    }
}

impl<'de> Deserialize<'de> for DataNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DataNodeVisitor)
    }
}
