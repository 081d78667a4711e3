//! Codecs for primitives, standard containers and node types.
//!
//! Scalars and node types are registered by
//! [`SerializationManager::initialize`](crate::SerializationManager::initialize);
//! generic containers register on first use.

// -----------------------------------------------------------------------------
// Modules

mod collections;
mod enums;
mod node;
mod pointer;
mod scalar;

// -----------------------------------------------------------------------------
// Exports

pub use enums::{DataEnum, enum_serializers};

use alloc::sync::Arc;

use vc_node::{MappingNode, SequenceNode, ValueNode};

use crate::codec::{TypeCopier, TypeReader, TypeValidator, TypeWriter};
use crate::registry::{SerializerRegistry, TypeSerializers};

/// Serializers sharing one codec for every node kind.
fn any_kind<T, C>(codec: C) -> TypeSerializers<T>
where
    T: 'static,
    C: TypeReader<T, ValueNode>
        + TypeReader<T, MappingNode>
        + TypeReader<T, SequenceNode>
        + TypeValidator<T, ValueNode>
        + TypeValidator<T, MappingNode>
        + TypeValidator<T, SequenceNode>
        + TypeWriter<T>
        + TypeCopier<T>,
{
    let codec = Arc::new(codec);
    let mut serializers = TypeSerializers::new();
    serializers.set_reader::<ValueNode>(codec.clone());
    serializers.set_reader::<MappingNode>(codec.clone());
    serializers.set_reader::<SequenceNode>(codec.clone());
    serializers.set_validator::<ValueNode>(codec.clone());
    serializers.set_validator::<MappingNode>(codec.clone());
    serializers.set_validator::<SequenceNode>(codec.clone());
    serializers.set_writer(codec.clone());
    serializers.set_copier(codec);
    serializers
}

/// Registers every non-generic built-in type.
pub(crate) fn register_builtins(registry: &mut SerializerRegistry) {
    scalar::register(registry);
    node::register(registry);
}
