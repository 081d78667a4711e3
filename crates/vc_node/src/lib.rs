//! The document tree exchanged between parsers and the serialization layer.
//!
//! A [`DataNode`] is one of three shapes:
//!
//! - [`ValueNode`]: a scalar whose content is either text or an explicit null.
//! - [`MappingNode`]: string keys in insertion order.
//! - [`SequenceNode`]: an ordered list of nodes.
//!
//! Every node may carry a type tag (`!type:Foo` in YAML) and the source
//! position the parser found it at. Neither takes part in equality.
//!
//! Besides deep copies, nodes support the two operations content inheritance
//! is built on: [`DataNode::except`] computes what a node adds relative to a
//! baseline, and [`DataNode::push_inheritance`] merges a parent back in.
//!
//! The [`validation`] module holds the result tree produced when a document
//! is checked against a type without reading it.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// No STD Support

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod kind;
mod mapping;
mod node;
mod sequence;
mod serde;
mod value;

pub mod validation;

// -----------------------------------------------------------------------------
// Top-level exports

pub use kind::{NodeKind, NodeLocation};
pub use mapping::MappingNode;
pub use node::DataNode;
pub use sequence::SequenceNode;
pub use value::ValueNode;
