use alloc::sync::Arc;
use core::any::TypeId;
use core::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use vc_node::validation::ValidationNode;
use vc_node::{DataNode, NodeKind};

use super::{ManagerConfig, SerializationContext, Session};
use crate::codec::{ErasedInstantiator, ErasedTypeReader};
use crate::error::Result;
use crate::registry::{Serializable, SerializerRegistry, TypeSerializers};

// -----------------------------------------------------------------------------
// SerializationManager

/// Entry point for reading, writing, validating and copying values.
///
/// Must be [`initialize`](Self::initialize)d exactly once before use; every
/// other operation panics on an uninitialized manager.
///
/// # Examples
///
/// ```
/// use vc_node::{DataNode, SequenceNode};
/// use vc_serial::SerializationManager;
///
/// let mut manager = SerializationManager::new();
/// manager.initialize();
///
/// let node = manager.write_value(&String::from("ABC"), false).unwrap();
/// assert_eq!(node, DataNode::value("ABC"));
/// assert_eq!(manager.read_value::<String>(&node).unwrap(), "ABC");
///
/// let node: DataNode = SequenceNode::from_iter(["1", "2"]).into();
/// let numbers: Vec<i32> = manager.read_value(&node).unwrap();
/// assert_eq!(numbers, [1, 2]);
/// ```
pub struct SerializationManager {
    registry: RwLock<SerializerRegistry>,
    config: ManagerConfig,
    initialized: bool,
}

impl SerializationManager {
    /// An uninitialized manager with an empty registry.
    #[inline]
    pub fn new() -> Self {
        Self::with_registry(SerializerRegistry::new())
    }

    /// An uninitialized manager starting from `registry`.
    ///
    /// Entries already in the registry take precedence over the built-ins
    /// registered by [`initialize`](Self::initialize).
    pub fn with_registry(registry: SerializerRegistry) -> Self {
        Self {
            registry: RwLock::new(registry),
            config: ManagerConfig::default(),
            initialized: false,
        }
    }

    #[inline]
    pub fn with_config(mut self, config: ManagerConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Registers the built-in codecs and every auto-registered type.
    ///
    /// # Panics
    ///
    /// If the manager is already initialized.
    #[track_caller]
    pub fn initialize(&mut self) {
        assert!(!self.initialized, "SerializationManager is already initialized");

        let registry = self.registry_mut();
        crate::impls::register_builtins(registry);
        #[cfg(feature = "auto_register")]
        if !registry.auto_register() {
            log::warn!("link-time registration is unavailable on this platform");
        }

        log::debug!("serialization manager initialized with {} types", registry.len());
        self.initialized = true;
    }

    /// Drops every cached entry and returns to the uninitialized state.
    ///
    /// Used to reload content: call [`initialize`](Self::initialize) again
    /// afterwards.
    pub fn reset(&mut self) {
        let registry = self.registry_mut();
        let count = registry.len();
        registry.clear();

        log::debug!("serialization manager reset, dropped {count} types");
        self.initialized = false;
    }

    /// Shared access to the registry.
    ///
    /// The guard blocks lazy registration on other threads; drop it before
    /// calling into the manager.
    pub fn registry(&self) -> RwLockReadGuard<'_, SerializerRegistry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    pub fn registry_mut(&mut self) -> &mut SerializerRegistry {
        self.registry.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    // -------------------------------------------------------------------------
    // Registry access

    #[track_caller]
    #[inline]
    fn assert_initialized(&self) {
        assert!(
            self.initialized,
            "SerializationManager must be initialized before use"
        );
    }

    /// The entry of `T`, built and registered on first use.
    pub(crate) fn serializers<T: Serializable>(&self) -> Arc<TypeSerializers<T>> {
        if let Some(serializers) = self.registry().get_shared::<T>() {
            return serializers;
        }

        // A racing thread may have registered `T` in between; `get_or_register`
        // then returns its entry.
        self.registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_register::<T>()
    }

    pub(crate) fn erased_reader(&self, type_id: TypeId, kind: NodeKind) -> Option<Arc<dyn ErasedTypeReader>> {
        self.registry().erased_reader(type_id, kind).cloned()
    }

    pub(crate) fn instantiator(&self, type_id: TypeId) -> Option<ErasedInstantiator> {
        self.registry().instantiator(type_id).cloned()
    }

    #[track_caller]
    fn session<'a>(&'a self, context: Option<&'a dyn SerializationContext>, skip_hook: bool) -> Session<'a> {
        self.assert_initialized();
        Session::new(self, context, skip_hook)
    }

    // -------------------------------------------------------------------------
    // Read

    #[track_caller]
    pub fn read_value<T: Serializable>(&self, node: &DataNode) -> Result<T> {
        self.session(None, false).read(node, None)
    }

    #[track_caller]
    pub fn read_value_with<T: Serializable>(
        &self,
        node: &DataNode,
        context: Option<&dyn SerializationContext>,
        skip_hook: bool,
    ) -> Result<T> {
        self.session(context, skip_hook).read(node, None)
    }

    /// Reads into `existing` instead of creating a new instance where the
    /// codec supports it. Fields absent from `node` keep their values.
    #[track_caller]
    pub fn read_value_into<T: Serializable>(&self, node: &DataNode, existing: T) -> Result<T> {
        self.session(None, false).read(node, Some(existing))
    }

    /// Like [`read_value`](Self::read_value), returning `None` on failure.
    #[track_caller]
    pub fn try_read_value<T: Serializable>(&self, node: &DataNode) -> Option<T> {
        match self.read_value(node) {
            Ok(value) => Some(value),
            Err(error) => {
                log::debug!("try_read_value::<{}> failed: {error}", core::any::type_name::<T>());
                None
            }
        }
    }

    // -------------------------------------------------------------------------
    // Write

    /// Writes `value`. Fields equal to their defaults are omitted unless
    /// `always_write` is set.
    #[track_caller]
    pub fn write_value<T: Serializable>(&self, value: &T, always_write: bool) -> Result<DataNode> {
        self.session(None, false).write(value, always_write)
    }

    #[track_caller]
    pub fn write_value_with<T: Serializable>(
        &self,
        value: &T,
        always_write: bool,
        context: Option<&dyn SerializationContext>,
    ) -> Result<DataNode> {
        self.session(context, false).write(value, always_write)
    }

    // -------------------------------------------------------------------------
    // Validate

    /// Checks that `node` could be read as a `T` without reading it.
    #[track_caller]
    pub fn validate_node<T: Serializable>(&self, node: &DataNode) -> ValidationNode {
        self.session(None, false).validate::<T>(node)
    }

    #[track_caller]
    pub fn validate_node_with<T: Serializable>(
        &self,
        node: &DataNode,
        context: Option<&dyn SerializationContext>,
    ) -> ValidationNode {
        self.session(context, false).validate::<T>(node)
    }

    // -------------------------------------------------------------------------
    // Copy

    /// Copies `source` into `target`, or into a new instance if `target` is `None`.
    #[track_caller]
    pub fn copy<T: Serializable>(&self, source: &T, target: Option<T>, skip_hook: bool) -> Result<T> {
        self.copy_with(source, target, skip_hook, None)
    }

    #[track_caller]
    pub fn copy_with<T: Serializable>(
        &self,
        source: &T,
        target: Option<T>,
        skip_hook: bool,
        context: Option<&dyn SerializationContext>,
    ) -> Result<T> {
        let session = self.session(context, skip_hook);
        match target {
            Some(mut target) => {
                session.copy_to(source, &mut target)?;
                Ok(target)
            }
            None => session.create_copy(source),
        }
    }

    /// Overwrites `target` with a copy of `source`, reusing its allocations
    /// where the codec can.
    #[track_caller]
    pub fn copy_to<T: Serializable>(&self, source: &T, target: &mut T, skip_hook: bool) -> Result<()> {
        self.session(None, skip_hook).copy_to(source, target)
    }

    #[track_caller]
    pub fn copy_to_with<T: Serializable>(
        &self,
        source: &T,
        target: &mut T,
        skip_hook: bool,
        context: Option<&dyn SerializationContext>,
    ) -> Result<()> {
        self.session(context, skip_hook).copy_to(source, target)
    }

    /// Returns a copy of `source` in a newly created instance.
    #[track_caller]
    pub fn create_copy<T: Serializable>(&self, source: &T, skip_hook: bool) -> Result<T> {
        self.session(None, skip_hook).create_copy(source)
    }

    #[track_caller]
    pub fn create_copy_with<T: Serializable>(
        &self,
        source: &T,
        skip_hook: bool,
        context: Option<&dyn SerializationContext>,
    ) -> Result<T> {
        self.session(context, skip_hook).create_copy(source)
    }
}

impl Default for SerializationManager {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SerializationManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializationManager")
            .field("registry", &*self.registry())
            .field("config", &self.config)
            .field("initialized", &self.initialized)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
