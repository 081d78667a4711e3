//! Node types are handled without any codec: reading one returns the node,
//! writing one returns it, copying clones it.

use core::any::{Any, TypeId};

use vc_node::validation::{ValidatedMapping, ValidatedSequence, ValidationNode};
use vc_node::{DataNode, MappingNode, SequenceNode, ValueNode};

use crate::codec::NodeType;

#[inline]
fn is<A: 'static, B: 'static>() -> bool {
    TypeId::of::<A>() == TypeId::of::<B>()
}

/// Moves `value` out as a `T` if both are the same type.
fn cast<S: 'static, T: 'static>(value: S) -> Option<T> {
    let mut slot = Some(value);
    (&mut slot as &mut dyn Any)
        .downcast_mut::<Option<T>>()
        .and_then(Option::take)
}

pub(crate) fn read<T: 'static, N: NodeType>(node: &N) -> Option<T> {
    if is::<T, N>() {
        cast(node.clone())
    } else if is::<T, DataNode>() {
        cast(node.to_data_node())
    } else {
        None
    }
}

pub(crate) fn validate<T: 'static, N: NodeType>(node: &N) -> Option<ValidationNode> {
    (is::<T, N>() || is::<T, DataNode>()).then(|| accept_typed(node))
}

pub(crate) fn write<T: 'static>(value: &T) -> Option<DataNode> {
    let any = value as &dyn Any;
    if let Some(node) = any.downcast_ref::<DataNode>() {
        Some(node.copy())
    } else if let Some(node) = any.downcast_ref::<ValueNode>() {
        Some(node.clone().into())
    } else if let Some(node) = any.downcast_ref::<MappingNode>() {
        Some(node.clone().into())
    } else {
        any.downcast_ref::<SequenceNode>()
            .map(|node| node.clone().into())
    }
}

pub(crate) fn clone<T: 'static>(value: &T) -> Option<T> {
    let any = value as &dyn Any;
    if let Some(node) = any.downcast_ref::<DataNode>() {
        cast(node.copy())
    } else if let Some(node) = any.downcast_ref::<ValueNode>() {
        cast(node.clone())
    } else if let Some(node) = any.downcast_ref::<MappingNode>() {
        cast(node.clone())
    } else if let Some(node) = any.downcast_ref::<SequenceNode>() {
        cast(node.clone())
    } else {
        None
    }
}

// -----------------------------------------------------------------------------
// Accepting validation trees

/// A validation tree shaped like `node` with no errors.
pub(crate) fn accept(node: &DataNode) -> ValidationNode {
    match node {
        DataNode::Value(_) => ValidationNode::Value,
        DataNode::Mapping(mapping) => accept_mapping(mapping),
        DataNode::Sequence(sequence) => accept_sequence(sequence),
    }
}

pub(crate) fn accept_typed<N: NodeType>(node: &N) -> ValidationNode {
    let any = node as &dyn Any;
    if let Some(mapping) = any.downcast_ref::<MappingNode>() {
        accept_mapping(mapping)
    } else if let Some(sequence) = any.downcast_ref::<SequenceNode>() {
        accept_sequence(sequence)
    } else {
        ValidationNode::Value
    }
}

fn accept_mapping(mapping: &MappingNode) -> ValidationNode {
    let mut result = ValidatedMapping::default();
    for (key, child) in mapping.iter() {
        result.push(key.as_str(), accept(child));
    }
    result.into()
}

fn accept_sequence(sequence: &SequenceNode) -> ValidationNode {
    let mut result = ValidatedSequence::default();
    for item in sequence.iter() {
        result.push(accept(item));
    }
    result.into()
}

// -----------------------------------------------------------------------------
// Tests
