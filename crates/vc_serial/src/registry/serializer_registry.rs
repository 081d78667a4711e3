use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::{Any, TypeId};
use core::fmt;

use vc_node::NodeKind;
use vc_utils::{HashMap, TypeIdMap};

use crate::codec::{ErasedInstantiator, ErasedTypeReader, ErasedValue};
use crate::registry::TypeSerializers;

// -----------------------------------------------------------------------------
// Serializable

/// A type the [`SerializationManager`](crate::SerializationManager) can handle.
///
/// `serializers` is called once, the first time the type is used or
/// registered; the result is cached in the registry.
///
/// Usually implemented through `#[derive(DataDefinition)]`,
/// `#[derive(DataEnum)]` or [`impl_serializable_by_definition!`](crate::impl_serializable_by_definition).
pub trait Serializable: Send + Sync + Sized + 'static {
    fn serializers() -> TypeSerializers<Self>;

    /// Registers the types this type's codecs read or write.
    ///
    /// Field types of a data definition are registered automatically and do
    /// not need to be listed here.
    fn register_dependencies(_registry: &mut SerializerRegistry) {}
}

// -----------------------------------------------------------------------------
// SerializerRegistry

/// Registered serializers, keyed by [`TypeId`].
///
/// Besides the typed entries built from [`Serializable`], the registry holds
/// erased readers keyed by `(TypeId, NodeKind)` and erased instantiators for
/// types that are only known at runtime.
///
/// A registry can also be handed to a call as a
/// [`SerializationContext`](crate::SerializationContext), in which case its
/// codecs take precedence over the manager's.
///
/// # Examples
///
/// ```
/// use vc_serial::SerializerRegistry;
///
/// let mut registry = SerializerRegistry::new();
/// registry.register::<Vec<Option<i32>>>();
///
/// // Dependencies are registered too.
/// assert!(registry.contains::<Option<i32>>());
/// assert!(registry.contains::<i32>());
/// ```
#[derive(Default)]
pub struct SerializerRegistry {
    types: TypeIdMap<Box<dyn Any + Send + Sync>>,
    erased_readers: HashMap<(TypeId, NodeKind), Arc<dyn ErasedTypeReader>>,
    instantiators: TypeIdMap<ErasedInstantiator>,
}

impl SerializerRegistry {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` and its dependencies if it is not registered yet.
    ///
    /// The entry is inserted before dependencies are visited, so recursive
    /// type graphs terminate.
    #[inline]
    pub fn register<T: Serializable>(&mut self) {
        self.get_or_register::<T>();
    }

    pub(crate) fn get_or_register<T: Serializable>(&mut self) -> Arc<TypeSerializers<T>> {
        if let Some(existing) = self.get_shared::<T>() {
            return existing;
        }

        let serializers = Arc::new(T::serializers());
        self.types
            .insert(TypeId::of::<T>(), Box::new(Arc::clone(&serializers)));

        if let Some(definition) = &serializers.definition {
            definition.register_dependencies(self);
        }
        T::register_dependencies(self);

        log::trace!("registered serializers for `{}`", serializers.type_name);
        serializers
    }

    /// Inserts `serializers` for `T`, replacing any previous entry.
    ///
    /// Unlike [`register`](Self::register) this does not require `T: Serializable`,
    /// which lets contexts carry codecs for any type.
    pub fn insert<T: Send + Sync + 'static>(&mut self, serializers: TypeSerializers<T>) {
        self.types
            .insert(TypeId::of::<T>(), Box::new(Arc::new(serializers)));
    }

    /// Mutable access to the entry of `T`, registering it first if needed.
    ///
    /// Used to add or replace individual codecs at runtime. Entries already
    /// handed out to running calls are not affected.
    pub fn serializers_mut<T: Serializable>(&mut self) -> &mut TypeSerializers<T> {
        self.register::<T>();
        self.entry_mut::<T>()
            .unwrap_or_else(|| unreachable!("`register` inserts under the type's own id"))
    }

    fn entry_mut<T: Send + Sync + 'static>(&mut self) -> Option<&mut TypeSerializers<T>> {
        self.types
            .get_mut(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_mut::<Arc<TypeSerializers<T>>>())
            .map(Arc::make_mut)
    }

    #[inline]
    pub fn contains<T: 'static>(&self) -> bool {
        self.types.contains_type::<T>()
    }

    #[inline]
    pub fn contains_id(&self, type_id: TypeId) -> bool {
        self.types.contains(&type_id)
    }

    pub fn get<T: 'static>(&self) -> Option<&TypeSerializers<T>> {
        self.types
            .get_type::<T>()
            .and_then(|entry| entry.downcast_ref::<Arc<TypeSerializers<T>>>())
            .map(|serializers| &**serializers)
    }

    pub(crate) fn get_shared<T: 'static>(&self) -> Option<Arc<TypeSerializers<T>>> {
        self.types
            .get_type::<T>()
            .and_then(|entry| entry.downcast_ref::<Arc<TypeSerializers<T>>>())
            .cloned()
    }

    /// Registers a reader for the type behind `type_id` and nodes of `kind`.
    ///
    /// Consulted after the typed readers of that type.
    pub fn set_erased_reader(
        &mut self,
        type_id: TypeId,
        kind: NodeKind,
        reader: Arc<dyn ErasedTypeReader>,
    ) {
        self.erased_readers.insert((type_id, kind), reader);
    }

    #[inline]
    pub fn erased_reader(&self, type_id: TypeId, kind: NodeKind) -> Option<&Arc<dyn ErasedTypeReader>> {
        self.erased_readers.get(&(type_id, kind))
    }

    /// Registers a function creating blank instances of the type behind `type_id`.
    ///
    /// Takes precedence over the constructor of the type's data definition.
    #[inline]
    pub fn set_erased_instantiator(&mut self, type_id: TypeId, instantiator: ErasedInstantiator) {
        self.instantiators.insert(type_id, instantiator);
    }

    /// Typed form of [`set_erased_instantiator`](Self::set_erased_instantiator).
    pub fn set_instantiator<T: Send + Sync + 'static>(&mut self, instantiator: fn() -> T) {
        let erased: ErasedInstantiator = Arc::new(move || -> ErasedValue { Box::new(instantiator()) });
        self.instantiators.insert(TypeId::of::<T>(), erased);
    }

    #[inline]
    pub fn instantiator(&self, type_id: TypeId) -> Option<&ErasedInstantiator> {
        self.instantiators.get(&type_id)
    }

    /// Number of typed entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.erased_readers.is_empty() && self.instantiators.is_empty()
    }

    /// Drops every entry, erased readers and instantiators included.
    pub fn clear(&mut self) {
        self.types.clear();
        self.erased_readers.clear();
        self.instantiators.clear();
    }
}

impl fmt::Debug for SerializerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializerRegistry")
            .field("types", &self.types.len())
            .field("erased_readers", &self.erased_readers.len())
            .field("instantiators", &self.instantiators.len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Serializable, SerializerRegistry};
    use crate::TypeSerializers;
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::any::TypeId;

    struct Node {
        _children: Vec<Node>,
    }

    impl Serializable for Node {
        fn serializers() -> TypeSerializers<Self> {
            TypeSerializers::new()
        }

        fn register_dependencies(registry: &mut SerializerRegistry) {
            registry.register::<Vec<Node>>();
            registry.register::<Node>();
        }
    }

    #[test]
    fn recursive_dependencies_terminate() {
        let mut registry = SerializerRegistry::new();
        registry.register::<Node>();
        assert!(registry.contains::<Node>());
        assert!(registry.contains::<Vec<Node>>());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn register_is_idempotent() {
        let mut registry = SerializerRegistry::new();
        registry.register::<Option<String>>();
        let len = registry.len();
        registry.register::<Option<String>>();
        assert_eq!(registry.len(), len);
        assert!(registry.get::<Option<String>>().unwrap().is_nullable());
        assert!(!registry.get::<String>().unwrap().is_nullable());
    }

    #[test]
    fn serializers_mut_is_copy_on_write() {
        let mut registry = SerializerRegistry::new();
        registry.register::<i32>();
        let before = registry.get_shared::<i32>().unwrap();

        registry.serializers_mut::<i32>().set_definition(
            crate::DefinitionBuilder::<i32>::with_default().build(),
        );

        assert!(before.definition().is_none());
        assert!(registry.get::<i32>().unwrap().definition().is_some());
    }

    #[test]
    fn instantiators_and_clear() {
        let mut registry = SerializerRegistry::new();
        registry.set_instantiator::<String>(|| String::from("blank"));

        let make = registry.instantiator(TypeId::of::<String>()).unwrap();
        let value: Box<String> = make().downcast().unwrap();
        assert_eq!(*value, "blank");

        registry.clear();
        assert!(registry.is_empty());
    }
}
