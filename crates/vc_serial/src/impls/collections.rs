use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::hash::BuildHasher;
use core::marker::PhantomData;
use std::collections::HashMap as StdHashMap;

use vc_node::validation::{ValidatedMapping, ValidatedSequence, ValidationNode};
use vc_node::{DataNode, MappingNode, SequenceNode};
use vc_utils::hash::hashbrown::HashMap as HashbrownMap;

use super::any_kind;
use crate::codec::{NodeType, TypeCopier, TypeReader, TypeValidator, TypeWriter};
use crate::error::Result;
use crate::manager::Session;
use crate::registry::{Serializable, SerializerRegistry, TypeSerializers};

// -----------------------------------------------------------------------------
// Option

/// `None` is the null node; `Some` is read and written as the inner value.
struct OptionCodec<T>(PhantomData<fn() -> T>);

impl<T: Serializable, N: NodeType> TypeReader<Option<T>, N> for OptionCodec<T> {
    fn read(&self, session: &Session<'_>, node: &N, existing: Option<Option<T>>) -> Result<Option<T>> {
        if node.is_null() {
            return Ok(None);
        }
        session.read_as::<T, N>(node, existing.flatten()).map(Some)
    }
}

impl<T: Serializable, N: NodeType> TypeValidator<Option<T>, N> for OptionCodec<T> {
    fn validate(&self, session: &Session<'_>, node: &N) -> ValidationNode {
        if node.is_null() {
            return ValidationNode::Value;
        }
        session.validate_as::<T, N>(node)
    }
}

impl<T: Serializable> TypeWriter<Option<T>> for OptionCodec<T> {
    fn write(&self, session: &Session<'_>, value: &Option<T>, always_write: bool) -> Result<DataNode> {
        match value {
            Some(value) => session.write(value, always_write),
            None => Ok(DataNode::null()),
        }
    }
}

impl<T: Serializable> TypeCopier<Option<T>> for OptionCodec<T> {
    fn create_copy(&self, session: &Session<'_>, source: &Option<T>) -> Result<Option<T>> {
        source.as_ref().map(|value| session.create_copy(value)).transpose()
    }

    fn copy_to(&self, session: &Session<'_>, source: &Option<T>, target: &mut Option<T>) -> Result<()> {
        match (source, target.as_mut()) {
            (Some(source), Some(target)) => session.copy_to(source, target),
            _ => {
                *target = self.create_copy(session, source)?;
                Ok(())
            }
        }
    }
}

impl<T: Serializable> Serializable for Option<T> {
    fn serializers() -> TypeSerializers<Self> {
        any_kind(OptionCodec::<T>(PhantomData)).nullable()
    }

    fn register_dependencies(registry: &mut SerializerRegistry) {
        registry.register::<T>();
    }
}

// -----------------------------------------------------------------------------
// Vec

/// A sequence node, one item per element.
struct VecCodec<T>(PhantomData<fn() -> T>);

impl<T: Serializable> TypeReader<Vec<T>, SequenceNode> for VecCodec<T> {
    fn read(&self, session: &Session<'_>, node: &SequenceNode, existing: Option<Vec<T>>) -> Result<Vec<T>> {
        let mut items = existing.unwrap_or_default();
        items.clear();
        items.reserve(node.len());
        for item in node.iter() {
            items.push(session.read(item, None)?);
        }
        Ok(items)
    }
}

impl<T: Serializable> TypeValidator<Vec<T>, SequenceNode> for VecCodec<T> {
    fn validate(&self, session: &Session<'_>, node: &SequenceNode) -> ValidationNode {
        let mut result = ValidatedSequence::default();
        for item in node.iter() {
            result.push(session.validate::<T>(item));
        }
        result.into()
    }
}

impl<T: Serializable> TypeWriter<Vec<T>> for VecCodec<T> {
    fn write(&self, session: &Session<'_>, value: &Vec<T>, always_write: bool) -> Result<DataNode> {
        let mut sequence = SequenceNode::with_capacity(value.len());
        for item in value {
            sequence.push(session.write(item, always_write)?);
        }
        Ok(sequence.into())
    }
}

impl<T: Serializable> TypeCopier<Vec<T>> for VecCodec<T> {
    fn create_copy(&self, session: &Session<'_>, source: &Vec<T>) -> Result<Vec<T>> {
        source.iter().map(|item| session.create_copy(item)).collect()
    }

    /// Copies into the existing elements first, then appends the rest.
    fn copy_to(&self, session: &Session<'_>, source: &Vec<T>, target: &mut Vec<T>) -> Result<()> {
        target.truncate(source.len());
        for (source, target) in source.iter().zip(target.iter_mut()) {
            session.copy_to(source, target)?;
        }
        let reused = target.len();
        target.reserve(source.len() - reused);
        for item in &source[reused..] {
            target.push(session.create_copy(item)?);
        }
        Ok(())
    }
}

impl<T: Serializable> Serializable for Vec<T> {
    fn serializers() -> TypeSerializers<Self> {
        TypeSerializers::new()
            .with_reader::<SequenceNode>(VecCodec::<T>(PhantomData))
            .with_validator::<SequenceNode>(VecCodec::<T>(PhantomData))
            .with_writer(VecCodec::<T>(PhantomData))
            .with_copier(VecCodec::<T>(PhantomData))
    }

    fn register_dependencies(registry: &mut SerializerRegistry) {
        registry.register::<T>();
    }
}

// -----------------------------------------------------------------------------
// String-keyed maps

/// A map stored as a mapping node.
trait StringMap: Default + Send + Sync + 'static {
    type Value: Serializable;

    fn clear_entries(&mut self);

    fn insert_entry(&mut self, key: String, value: Self::Value);

    fn entry_count(&self) -> usize;

    fn entries(&self) -> impl Iterator<Item = (&String, &Self::Value)>;
}

struct MapCodec<M>(PhantomData<fn() -> M>);

impl<M: StringMap> TypeReader<M, MappingNode> for MapCodec<M> {
    fn read(&self, session: &Session<'_>, node: &MappingNode, existing: Option<M>) -> Result<M> {
        let mut map = existing.unwrap_or_default();
        map.clear_entries();
        for (key, child) in node.iter() {
            map.insert_entry(key.clone(), session.read(child, None)?);
        }
        Ok(map)
    }
}

impl<M: StringMap> TypeValidator<M, MappingNode> for MapCodec<M> {
    fn validate(&self, session: &Session<'_>, node: &MappingNode) -> ValidationNode {
        let mut result = ValidatedMapping::default();
        for (key, child) in node.iter() {
            result.push(key.as_str(), session.validate::<M::Value>(child));
        }
        result.into()
    }
}

impl<M: StringMap> TypeWriter<M> for MapCodec<M> {
    fn write(&self, session: &Session<'_>, value: &M, always_write: bool) -> Result<DataNode> {
        let mut mapping = MappingNode::with_capacity(value.entry_count());
        for (key, item) in value.entries() {
            mapping.insert(key.as_str(), session.write(item, always_write)?);
        }
        Ok(mapping.into())
    }
}

impl<M: StringMap> TypeCopier<M> for MapCodec<M> {
    fn create_copy(&self, session: &Session<'_>, source: &M) -> Result<M> {
        let mut map = M::default();
        for (key, item) in source.entries() {
            map.insert_entry(key.clone(), session.create_copy(item)?);
        }
        Ok(map)
    }
}

fn map_serializers<M: StringMap>() -> TypeSerializers<M> {
    TypeSerializers::new()
        .with_reader::<MappingNode>(MapCodec::<M>(PhantomData))
        .with_validator::<MappingNode>(MapCodec::<M>(PhantomData))
        .with_writer(MapCodec::<M>(PhantomData))
        .with_copier(MapCodec::<M>(PhantomData))
}

macro_rules! impl_string_map {
    ($map:ident $(, $state:ident: $bound:ident)?) => {
        impl<V: Serializable $(, $state: $bound + Default + Send + Sync + 'static)?> StringMap
            for $map<String, V $(, $state)?>
        {
            type Value = V;

            #[inline]
            fn clear_entries(&mut self) {
                self.clear();
            }

            #[inline]
            fn insert_entry(&mut self, key: String, value: V) {
                self.insert(key, value);
            }

            #[inline]
            fn entry_count(&self) -> usize {
                self.len()
            }

            #[inline]
            fn entries(&self) -> impl Iterator<Item = (&String, &V)> {
                self.iter()
            }
        }

        impl<V: Serializable $(, $state: $bound + Default + Send + Sync + 'static)?> Serializable
            for $map<String, V $(, $state)?>
        {
            #[inline]
            fn serializers() -> TypeSerializers<Self> {
                map_serializers::<Self>()
            }

            fn register_dependencies(registry: &mut SerializerRegistry) {
                registry.register::<V>();
            }
        }
    };
}

impl_string_map!(BTreeMap);
impl_string_map!(HashbrownMap, S: BuildHasher);
impl_string_map!(StdHashMap, S: BuildHasher);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use vc_node::{DataNode, MappingNode, SequenceNode};
    use vc_utils::HashMap;

    use crate::SerializationManager;

    fn manager() -> SerializationManager {
        let mut manager = SerializationManager::new();
        manager.initialize();
        manager
    }

    #[test]
    fn option_maps_null_to_none() {
        let manager = manager();
        assert_eq!(manager.read_value::<Option<i32>>(&DataNode::null()), Ok(None));
        assert_eq!(manager.read_value::<Option<i32>>(&DataNode::value("3")), Ok(Some(3)));
        assert_eq!(manager.write_value(&None::<i32>, false), Ok(DataNode::null()));
        assert!(manager.validate_node::<Option<i32>>(&DataNode::null()).is_valid());
        assert!(manager.validate_node::<i32>(&DataNode::null()).has_errors());
    }

    #[test]
    fn vec_reads_every_item() {
        let manager = manager();
        let node: DataNode = SequenceNode::from_iter(["1", "2", "x"]).into();
        assert!(manager.read_value::<Vec<i32>>(&node).is_err());

        let report = manager.validate_node::<Vec<i32>>(&node);
        let errors = report.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "[2]");

        let node: DataNode = SequenceNode::from_iter(["1", "2"]).into();
        assert_eq!(manager.read_value::<Vec<i32>>(&node), Ok(vec![1, 2]));
    }

    #[test]
    fn vec_copy_reuses_target() {
        let manager = manager();
        let source = vec![String::from("a"), String::from("b")];
        let mut target = vec![String::from("x"), String::from("y"), String::from("z")];

        manager.copy_to(&source, &mut target, false).unwrap();
        assert_eq!(target, source);

        let mut target = Vec::new();
        manager.copy_to(&source, &mut target, false).unwrap();
        assert_eq!(target, source);
    }

    #[test]
    fn string_maps() {
        let manager = manager();
        let node: DataNode = MappingNode::from_iter([("b", "2"), ("a", "1")]).into();

        let ordered: BTreeMap<String, u8> = manager.read_value(&node).unwrap();
        assert_eq!(ordered.len(), 2);
        assert_eq!(manager.write_value(&ordered, false), Ok(node.clone()));

        let hashed: HashMap<String, u8> = manager.read_value(&node).unwrap();
        assert_eq!(hashed.get("b"), Some(&2));

        let copied = manager.create_copy(&hashed, false).unwrap();
        assert_eq!(copied, hashed);

        assert!(manager.validate_node::<BTreeMap<String, u8>>(&DataNode::value("1")).has_errors());
    }
}
