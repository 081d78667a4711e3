//! Per-type codec interfaces.
//!
//! A codec implements any subset of reading, validating, writing and copying
//! for one type. Readers and validators are bound to the node shape they
//! accept through [`NodeType`]; a type may have one of each per shape, and the
//! shape of the node actually being processed picks among them.

use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::Any;

use vc_node::validation::ValidationNode;
use vc_node::{DataNode, MappingNode, NodeKind, SequenceNode, ValueNode};

use crate::error::Result;
use crate::manager::Session;
use crate::registry::TypeSerializers;

// -----------------------------------------------------------------------------
// NodeType

mod sealed {
    pub trait Sealed {}

    impl Sealed for vc_node::ValueNode {}
    impl Sealed for vc_node::MappingNode {}
    impl Sealed for vc_node::SequenceNode {}
}

/// One of the three concrete node shapes.
///
/// Implemented for [`ValueNode`], [`MappingNode`] and [`SequenceNode`] only.
pub trait NodeType: sealed::Sealed + Clone + Send + Sync + 'static {
    const KIND: NodeKind;

    /// Borrows `node` as `Self` if it has this shape.
    fn cast(node: &DataNode) -> Option<&Self>;

    fn to_data_node(&self) -> DataNode;

    /// `true` only for the null scalar.
    fn is_null(&self) -> bool;

    fn as_mapping(&self) -> Option<&MappingNode>;

    #[doc(hidden)]
    fn reader<T>(serializers: &TypeSerializers<T>) -> Option<&Arc<dyn TypeReader<T, Self>>>;

    #[doc(hidden)]
    fn set_reader<T>(serializers: &mut TypeSerializers<T>, reader: Arc<dyn TypeReader<T, Self>>);

    #[doc(hidden)]
    fn validator<T>(serializers: &TypeSerializers<T>) -> Option<&Arc<dyn TypeValidator<T, Self>>>;

    #[doc(hidden)]
    fn set_validator<T>(
        serializers: &mut TypeSerializers<T>,
        validator: Arc<dyn TypeValidator<T, Self>>,
    );
}

macro_rules! impl_node_type {
    (
        $node:ident, $kind:ident, $reader:ident, $validator:ident,
        is_null: |$n:ident| $is_null:expr,
        as_mapping: |$m:ident| $as_mapping:expr $(,)?
    ) => {
        impl NodeType for $node {
            const KIND: NodeKind = NodeKind::$kind;

            #[inline]
            fn cast(node: &DataNode) -> Option<&Self> {
                match node {
                    DataNode::$kind(node) => Some(node),
                    _ => None,
                }
            }

            #[inline]
            fn to_data_node(&self) -> DataNode {
                DataNode::$kind(self.clone())
            }

            #[inline]
            fn is_null(&self) -> bool {
                let $n = self;
                $is_null
            }

            #[inline]
            fn as_mapping(&self) -> Option<&MappingNode> {
                let $m = self;
                $as_mapping
            }

            #[inline]
            fn reader<T>(s: &TypeSerializers<T>) -> Option<&Arc<dyn TypeReader<T, Self>>> {
                s.$reader.as_ref()
            }

            #[inline]
            fn set_reader<T>(s: &mut TypeSerializers<T>, reader: Arc<dyn TypeReader<T, Self>>) {
                s.$reader = Some(reader);
            }

            #[inline]
            fn validator<T>(s: &TypeSerializers<T>) -> Option<&Arc<dyn TypeValidator<T, Self>>> {
                s.$validator.as_ref()
            }

            #[inline]
            fn set_validator<T>(
                s: &mut TypeSerializers<T>,
                validator: Arc<dyn TypeValidator<T, Self>>,
            ) {
                s.$validator = Some(validator);
            }
        }
    };
}

impl_node_type!(
    ValueNode, Value, value_reader, value_validator,
    is_null: |node| node.is_null(),
    as_mapping: |_node| None,
);

impl_node_type!(
    MappingNode, Mapping, mapping_reader, mapping_validator,
    is_null: |_node| false,
    as_mapping: |node| Some(node),
);

impl_node_type!(
    SequenceNode, Sequence, sequence_reader, sequence_validator,
    is_null: |_node| false,
    as_mapping: |_node| None,
);

// -----------------------------------------------------------------------------
// Codec traits

/// Reads a `T` from a node of shape `N`.
///
/// `existing`, when given, is an instance the caller wants populated instead
/// of allocating a new one. Readers are free to ignore it.
pub trait TypeReader<T, N: NodeType>: Send + Sync + 'static {
    fn read(&self, session: &Session<'_>, node: &N, existing: Option<T>) -> Result<T>;
}

/// Checks that a node of shape `N` could be read as a `T`.
///
/// Must not panic. The returned tree must either be an error or have the same
/// shape as `node`.
pub trait TypeValidator<T, N: NodeType>: Send + Sync + 'static {
    fn validate(&self, session: &Session<'_>, node: &N) -> ValidationNode;
}

/// Writes a `T` to a node.
///
/// `always_write` asks nested definitions to emit fields equal to their defaults.
pub trait TypeWriter<T>: Send + Sync + 'static {
    fn write(&self, session: &Session<'_>, value: &T, always_write: bool) -> Result<DataNode>;
}

/// Copies a `T` without going through nodes.
pub trait TypeCopier<T>: Send + Sync + 'static {
    fn create_copy(&self, session: &Session<'_>, source: &T) -> Result<T>;

    /// Overwrites `target` with a copy of `source`, reusing its allocations
    /// where the codec can.
    fn copy_to(&self, session: &Session<'_>, source: &T, target: &mut T) -> Result<()> {
        *target = self.create_copy(session, source)?;
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Erased codecs

/// A value produced by an erased reader or instantiator.
pub type ErasedValue = Box<dyn Any + Send + Sync>;

/// A reader registered by [`TypeId`](core::any::TypeId) for types the
/// registering code cannot name statically.
///
/// Returning `Ok(None)` or a value of the wrong type is a codec bug and is
/// reported as a contract violation.
pub trait ErasedTypeReader: Send + Sync + 'static {
    fn read(&self, session: &Session<'_>, node: &DataNode) -> Result<Option<ErasedValue>>;
}

/// Creates blank instances of one type for the data definition engine.
pub type ErasedInstantiator = Arc<dyn Fn() -> ErasedValue + Send + Sync>;
