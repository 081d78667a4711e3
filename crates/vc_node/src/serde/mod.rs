//! Bridges the node tree to the serde data model.
//!
//! Any serde format can stand in for the parser: scalars arrive as their text
//! form, unit and `None` arrive as the null scalar. Tags and locations are not
//! part of the serde model and are dropped in both directions.

mod de;
mod ser;

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::{DataNode, MappingNode, SequenceNode};
    use alloc::string::String;

    #[test]
    fn json_scalars_become_text() {
        let node: DataNode = serde_json::from_str(
            r#"{"name": "tree", "count": 3, "ratio": 0.5, "neg": -2, "ok": true, "none": null}"#,
        )
        .unwrap();

        let map = node.as_mapping().unwrap();
        assert_eq!(map["name"], DataNode::value("tree"));
        assert_eq!(map["count"], DataNode::value("3"));
        assert_eq!(map["ratio"], DataNode::value("0.5"));
        assert_eq!(map["neg"], DataNode::value("-2"));
        assert_eq!(map["ok"], DataNode::value("true"));
        assert!(map["none"].is_null());

        let keys: alloc::vec::Vec<_> = map.keys().collect();
        assert_eq!(keys, ["name", "count", "ratio", "neg", "ok", "none"]);
    }

    #[test]
    fn json_nested() {
        let node: DataNode = serde_json::from_str(r#"{"items": [{"a": "1"}, [], "x"]}"#).unwrap();
        let items = node.as_mapping().unwrap()["items"].as_sequence().unwrap();
        assert_eq!(items.len(), 3);
        assert!(items[0].as_mapping().is_some());
        assert!(items[1].as_sequence().unwrap().is_empty());
        assert_eq!(items[2], DataNode::value("x"));
    }

    #[test]
    fn json_write() {
        let mut map = MappingNode::new();
        map.insert("a", "1");
        map.insert("b", DataNode::null());
        map.insert("c", ["x", "y"].into_iter().collect::<SequenceNode>());

        let text = serde_json::to_string(&DataNode::from(map)).unwrap();
        assert_eq!(text, r#"{"a":"1","b":null,"c":["x","y"]}"#);
    }

    #[test]
    fn json_rejects_non_scalar_keys() {
        // serde_json only produces string keys, so feed a map key through ron.
        let result = ron::from_str::<DataNode>(r#"{["a"]: "1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn ron_round_trip() {
        let source = r#"{"name": "x", "tags": ["a", "b"], "unit": ()}"#;
        let node: DataNode = ron::from_str(source).unwrap();
        assert!(node.as_mapping().unwrap()["unit"].is_null());

        let text: String = ron::to_string(&node).unwrap();
        let back: DataNode = ron::from_str(&text).unwrap();
        assert_eq!(node, back);
    }

    #[test]
    fn f32_keeps_short_form() {
        use serde_core::de::{IntoDeserializer, value::Error};
        let de = IntoDeserializer::<Error>::into_deserializer(0.1_f32);
        let node: DataNode = serde_core::Deserialize::deserialize(de).unwrap();
        assert_eq!(node, DataNode::value("0.1"));
    }
}
