use alloc::boxed::Box;
use alloc::sync::Arc;
use core::marker::PhantomData;

use vc_node::DataNode;
use vc_node::validation::ValidationNode;

use super::any_kind;
use crate::codec::{NodeType, TypeCopier, TypeReader, TypeValidator, TypeWriter};
use crate::error::Result;
use crate::manager::Session;
use crate::registry::{Serializable, SerializerRegistry, TypeSerializers};

// -----------------------------------------------------------------------------
// Box

/// Stored exactly like the boxed value. Nulls reach the inner type, which
/// decides whether to accept them.
struct BoxCodec<T>(PhantomData<fn() -> T>);

impl<T: Serializable, N: NodeType> TypeReader<Box<T>, N> for BoxCodec<T> {
    fn read(&self, session: &Session<'_>, node: &N, existing: Option<Box<T>>) -> Result<Box<T>> {
        match existing {
            Some(mut existing) => {
                // Reuses the allocation.
                let value = session.read_as::<T, N>(node, None)?;
                *existing = value;
                Ok(existing)
            }
            None => session.read_as::<T, N>(node, None).map(Box::new),
        }
    }
}

impl<T: Serializable, N: NodeType> TypeValidator<Box<T>, N> for BoxCodec<T> {
    #[inline]
    fn validate(&self, session: &Session<'_>, node: &N) -> ValidationNode {
        session.validate_as::<T, N>(node)
    }
}

impl<T: Serializable> TypeWriter<Box<T>> for BoxCodec<T> {
    #[inline]
    fn write(&self, session: &Session<'_>, value: &Box<T>, always_write: bool) -> Result<DataNode> {
        session.write::<T>(value, always_write)
    }
}

impl<T: Serializable> TypeCopier<Box<T>> for BoxCodec<T> {
    fn create_copy(&self, session: &Session<'_>, source: &Box<T>) -> Result<Box<T>> {
        session.create_copy::<T>(source).map(Box::new)
    }

    fn copy_to(&self, session: &Session<'_>, source: &Box<T>, target: &mut Box<T>) -> Result<()> {
        session.copy_to::<T>(source, target)
    }
}

impl<T: Serializable> Serializable for Box<T> {
    fn serializers() -> TypeSerializers<Self> {
        any_kind(BoxCodec::<T>(PhantomData)).nullable()
    }

    fn register_dependencies(registry: &mut SerializerRegistry) {
        registry.register::<T>();
    }
}

// -----------------------------------------------------------------------------
// Arc

/// Stored like the shared value. Copies share the allocation instead of
/// duplicating it.
struct ArcCodec<T>(PhantomData<fn() -> T>);

impl<T: Serializable, N: NodeType> TypeReader<Arc<T>, N> for ArcCodec<T> {
    #[inline]
    fn read(&self, session: &Session<'_>, node: &N, _: Option<Arc<T>>) -> Result<Arc<T>> {
        session.read_as::<T, N>(node, None).map(Arc::new)
    }
}

impl<T: Serializable, N: NodeType> TypeValidator<Arc<T>, N> for ArcCodec<T> {
    #[inline]
    fn validate(&self, session: &Session<'_>, node: &N) -> ValidationNode {
        session.validate_as::<T, N>(node)
    }
}

impl<T: Serializable> TypeWriter<Arc<T>> for ArcCodec<T> {
    #[inline]
    fn write(&self, session: &Session<'_>, value: &Arc<T>, always_write: bool) -> Result<DataNode> {
        session.write::<T>(value, always_write)
    }
}

impl<T: Serializable> TypeCopier<Arc<T>> for ArcCodec<T> {
    #[inline]
    fn create_copy(&self, _: &Session<'_>, source: &Arc<T>) -> Result<Arc<T>> {
        Ok(Arc::clone(source))
    }
}

impl<T: Serializable> Serializable for Arc<T> {
    fn serializers() -> TypeSerializers<Self> {
        any_kind(ArcCodec::<T>(PhantomData)).nullable()
    }

    fn register_dependencies(registry: &mut SerializerRegistry) {
        registry.register::<T>();
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::sync::Arc;

    use vc_node::DataNode;

    use crate::{SerializationError, SerializationManager};

    #[test]
    fn box_is_transparent() {
        let mut manager = SerializationManager::new();
        manager.initialize();

        let node = DataNode::value("12");
        let value: Box<u16> = manager.read_value(&node).unwrap();
        assert_eq!(*value, 12);
        assert_eq!(manager.write_value(&value, false), Ok(node));

        let mut target = Box::new(0_u16);
        manager.copy_to(&value, &mut target, false).unwrap();
        assert_eq!(*target, 12);
    }

    #[test]
    fn arc_copy_shares() {
        let mut manager = SerializationManager::new();
        manager.initialize();

        let value: Arc<String> = manager.read_value(&DataNode::value("shared")).unwrap();
        let copy = manager.create_copy(&value, false).unwrap();
        assert!(Arc::ptr_eq(&value, &copy));
    }

    #[test]
    fn boxed_option_keeps_null() {
        let mut manager = SerializationManager::new();
        manager.initialize();

        let node = manager.write_value(&Box::new(None::<i32>), false).unwrap();
        assert_eq!(node, DataNode::null());

        let value: Box<Option<i32>> = manager.read_value(&node).unwrap();
        assert_eq!(value, Box::new(None));
        assert!(manager.validate_node::<Box<Option<i32>>>(&node).is_valid());
    }

    #[test]
    fn shared_option_keeps_null() {
        let mut manager = SerializationManager::new();
        manager.initialize();

        let node = manager.write_value(&Arc::new(None::<String>), false).unwrap();
        assert_eq!(node, DataNode::null());

        let value: Arc<Option<String>> = manager.read_value(&node).unwrap();
        assert_eq!(*value, None);
        assert!(manager.validate_node::<Arc<Option<String>>>(&node).is_valid());
    }

    #[test]
    fn null_is_still_rejected_by_the_inner_type() {
        let mut manager = SerializationManager::new();
        manager.initialize();

        let result = manager.read_value::<Box<i32>>(&DataNode::null());
        assert!(matches!(result, Err(SerializationError::NullNotAllowed { .. })));
        assert!(!manager.validate_node::<Box<i32>>(&DataNode::null()).is_valid());
    }
}
