use alloc::boxed::Box;
use core::any::{TypeId, type_name};
use core::fmt;

use bitflags::bitflags;
use vc_node::DataNode;
use vc_node::validation::ValidationNode;

use crate::error::Result;
use crate::manager::Session;
use crate::registry::{Serializable, SerializerRegistry};

// -----------------------------------------------------------------------------
// FieldFlags

bitflags! {
    /// Per-field options of a [`DataDefinition`](super::DataDefinition).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FieldFlags: u8 {
        /// Reading fails if the key is absent.
        const REQUIRED = 1 << 0;
        /// Copies assign a clone of the value instead of copying it through
        /// its serializers.
        const BY_REFERENCE = 1 << 1;
        /// Written even when equal to the default.
        const ALWAYS_WRITE = 1 << 2;
    }
}

// -----------------------------------------------------------------------------
// FieldOps

/// Type-erased access to one field of `T`.
pub(crate) trait FieldOps<T>: Send + Sync {
    fn read(&self, session: &Session<'_>, node: &DataNode, target: &mut T) -> Result<()>;

    fn write(&self, session: &Session<'_>, source: &T, always_write: bool) -> Result<DataNode>;

    fn validate(&self, session: &Session<'_>, node: &DataNode) -> ValidationNode;

    fn copy(&self, session: &Session<'_>, source: &T, target: &mut T) -> Result<()>;

    fn is_default(&self, session: &Session<'_>, value: &T, default: &T) -> bool;

    fn register(&self, registry: &mut SerializerRegistry);
}

pub(crate) struct Accessor<T, F> {
    pub get: fn(&T) -> &F,
    pub get_mut: fn(&mut T) -> &mut F,
    pub eq: Option<fn(&F, &F) -> bool>,
    pub clone: Option<fn(&F) -> F>,
}

impl<T: 'static, F: Serializable> FieldOps<T> for Accessor<T, F> {
    fn read(&self, session: &Session<'_>, node: &DataNode, target: &mut T) -> Result<()> {
        *(self.get_mut)(target) = session.read::<F>(node, None)?;
        Ok(())
    }

    fn write(&self, session: &Session<'_>, source: &T, always_write: bool) -> Result<DataNode> {
        session.write::<F>((self.get)(source), always_write)
    }

    fn validate(&self, session: &Session<'_>, node: &DataNode) -> ValidationNode {
        session.validate::<F>(node)
    }

    fn copy(&self, session: &Session<'_>, source: &T, target: &mut T) -> Result<()> {
        let value = (self.get)(source);
        match self.clone {
            Some(clone) => {
                *(self.get_mut)(target) = clone(value);
                Ok(())
            }
            None => session.copy_to::<F>(value, (self.get_mut)(target)),
        }
    }

    fn is_default(&self, session: &Session<'_>, value: &T, default: &T) -> bool {
        let (value, default) = ((self.get)(value), (self.get)(default));
        match self.eq {
            Some(eq) => eq(value, default),
            // Without `PartialEq`, values are equal when they write the same node.
            None => match (session.write(value, true), session.write(default, true)) {
                (Ok(a), Ok(b)) => a == b,
                _ => false,
            },
        }
    }

    fn register(&self, registry: &mut SerializerRegistry) {
        registry.register::<F>();
    }
}

// -----------------------------------------------------------------------------
// FieldSpec

/// One field of a [`DataDefinition`](super::DataDefinition).
pub struct FieldSpec<T> {
    pub(crate) key: &'static str,
    pub(crate) flags: FieldFlags,
    pub(crate) type_name: &'static str,
    pub(crate) type_id: TypeId,
    pub(crate) ops: Box<dyn FieldOps<T>>,
}

impl<T> FieldSpec<T> {
    /// The mapping key the field is stored under.
    #[inline]
    pub fn key(&self) -> &'static str {
        self.key
    }

    #[inline]
    pub fn flags(&self) -> FieldFlags {
        self.flags
    }

    #[inline]
    pub fn is_required(&self) -> bool {
        self.flags.contains(FieldFlags::REQUIRED)
    }

    #[inline]
    pub fn is_by_reference(&self) -> bool {
        self.flags.contains(FieldFlags::BY_REFERENCE)
    }

    /// Name of the field's type.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Whether `value` holds the same field value as `default`.
    #[inline]
    pub fn is_default(&self, session: &Session<'_>, value: &T, default: &T) -> bool {
        self.ops.is_default(session, value, default)
    }

    /// Written even when equal to its default.
    pub(crate) fn always_written(&self) -> bool {
        self.flags
            .intersects(FieldFlags::REQUIRED | FieldFlags::ALWAYS_WRITE)
    }
}

impl<T> fmt::Debug for FieldSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("key", &self.key)
            .field("flags", &self.flags)
            .field("type_name", &self.type_name)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// FieldConfig

/// Options for a field added with
/// [`DefinitionBuilder::field_with`](super::DefinitionBuilder::field_with).
pub struct FieldConfig<F> {
    pub(crate) flags: FieldFlags,
    pub(crate) eq: Option<fn(&F, &F) -> bool>,
    pub(crate) clone: Option<fn(&F) -> F>,
}

impl<F> FieldConfig<F> {
    pub(crate) fn new() -> Self {
        Self {
            flags: FieldFlags::empty(),
            eq: None,
            clone: None,
        }
    }

    #[inline]
    pub fn required(mut self) -> Self {
        self.flags |= FieldFlags::REQUIRED;
        self
    }

    #[inline]
    pub fn always_write(mut self) -> Self {
        self.flags |= FieldFlags::ALWAYS_WRITE;
        self
    }

    /// Copy this field by cloning it. For an `Arc` this shares the allocation.
    #[inline]
    pub fn by_reference(mut self) -> Self
    where
        F: Clone,
    {
        self.flags |= FieldFlags::BY_REFERENCE;
        self.clone = Some(<F as Clone>::clone);
        self
    }

    /// Detect default values with `PartialEq` instead of comparing written nodes.
    #[inline]
    pub fn compare_eq(mut self) -> Self
    where
        F: PartialEq,
    {
        self.eq = Some(<F as PartialEq>::eq);
        self
    }
}

pub(crate) fn field_type<F: 'static>() -> (&'static str, TypeId) {
    (type_name::<F>(), TypeId::of::<F>())
}
