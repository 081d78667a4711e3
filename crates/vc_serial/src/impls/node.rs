use vc_node::{DataNode, MappingNode, SequenceNode, ValueNode};

use crate::registry::{Serializable, SerializerRegistry, TypeSerializers};

// Node types never reach their codecs: the session passes them through before
// any lookup. The entries only make them visible in the registry.

impl Serializable for DataNode {
    #[inline]
    fn serializers() -> TypeSerializers<Self> {
        TypeSerializers::new().nullable()
    }
}

impl Serializable for ValueNode {
    #[inline]
    fn serializers() -> TypeSerializers<Self> {
        TypeSerializers::new().nullable()
    }
}

impl Serializable for MappingNode {
    #[inline]
    fn serializers() -> TypeSerializers<Self> {
        TypeSerializers::new()
    }
}

impl Serializable for SequenceNode {
    #[inline]
    fn serializers() -> TypeSerializers<Self> {
        TypeSerializers::new()
    }
}

pub(super) fn register(registry: &mut SerializerRegistry) {
    registry.register::<DataNode>();
    registry.register::<ValueNode>();
    registry.register::<MappingNode>();
    registry.register::<SequenceNode>();
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use vc_node::{DataNode, MappingNode, SequenceNode, ValueNode};

    use crate::SerializationManager;

    #[test]
    fn nodes_pass_through() {
        let mut manager = SerializationManager::new();
        manager.initialize();

        let node: DataNode = MappingNode::from_iter([
            ("name", DataNode::value("a")),
            ("tags", SequenceNode::from_iter(["x", "y"]).into()),
        ])
        .into();

        assert_eq!(manager.read_value::<DataNode>(&node), Ok(node.clone()));
        assert_eq!(manager.write_value(&node, false), Ok(node.clone()));
        assert!(manager.read_value::<MappingNode>(&node).is_ok());
        assert!(manager.read_value::<SequenceNode>(&node).is_err());
        assert_eq!(
            manager.read_value::<ValueNode>(&DataNode::null()),
            Ok(ValueNode::null())
        );

        let report = manager.validate_node::<DataNode>(&node);
        assert!(report.is_valid());
        assert!(manager.validate_node::<SequenceNode>(&node).has_errors());
    }
}
