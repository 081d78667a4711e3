//! Conversion between typed values and [`vc_node`] document trees.
//!
//! The entry point is [`SerializationManager`]: it reads values from
//! [`DataNode`](vc_node::DataNode)s, writes them back, validates trees without
//! instantiating anything and copies values in place.
//!
//! Every type is handled through its [`TypeSerializers`], built once from
//! [`Serializable`] and cached in a [`SerializerRegistry`]:
//!
//! - custom codecs ([`TypeReader`], [`TypeWriter`], [`TypeValidator`],
//!   [`TypeCopier`]) keyed by the node kind they accept;
//! - a [`DataDefinition`] field table covering whatever the codecs do not,
//!   usually generated by `#[derive(DataDefinition)]`.
//!
//! # Examples
//!
//! ```
//! use vc_node::{DataNode, MappingNode};
//! use vc_serial::{DataDefinition, SerializationManager};
//!
//! #[derive(DataDefinition, Default, PartialEq, Debug)]
//! struct Item {
//!     #[data(required)]
//!     name: String,
//!     count: u32,
//! }
//!
//! let mut manager = SerializationManager::new();
//! manager.initialize();
//!
//! let node: DataNode = MappingNode::from_iter([("name", DataNode::value("apple"))]).into();
//! let item: Item = manager.read_value(&node).unwrap();
//! assert_eq!(item, Item { name: "apple".into(), count: 0 });
//!
//! // Fields equal to their default are omitted.
//! assert_eq!(manager.write_value(&item, false).unwrap(), node);
//! ```
//!
//! Unlike the other crates in the workspace this one always links `std`: the
//! manager and the definition cache are guarded by `std::sync` locks.
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Derive output names `vc_serial`, so the crate must be reachable under that
// name from its own tests.
extern crate self as vc_serial;

// -----------------------------------------------------------------------------
// Allocation

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod codec;
mod error;

pub mod definition;
pub mod impls;
pub mod manager;
pub mod registry;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use codec::{ErasedInstantiator, ErasedTypeReader, ErasedValue, NodeType};
pub use codec::{TypeCopier, TypeReader, TypeValidator, TypeWriter};
pub use definition::{DataDefinition, DefinitionBuilder, Describe};
pub use definition::{FieldConfig, FieldFlags, FieldSpec};
pub use error::{Result, SerializationError};
pub use impls::{DataEnum, enum_serializers};
pub use manager::{ManagerConfig, SerializationContext, SerializationManager, Session};
pub use registry::{Serializable, SerializerRegistry, TypeSerializers};

pub use vc_serial_derive::{DataDefinition, DataEnum};

#[doc(hidden)]
pub mod __macro_exports {
    #[cfg(feature = "auto_register")]
    pub use crate::registry::AutoRegistration;
    #[cfg(feature = "auto_register")]
    pub use inventory;
}

// -----------------------------------------------------------------------------
// Macros

/// Registers types during [`SerializationManager::initialize`].
///
/// Generic types must be listed with concrete parameters. Without the
/// `auto_register` feature this expands to nothing.
///
/// # Examples
///
/// ```
/// use vc_serial::{DefinitionBuilder, Describe, auto_register, impl_serializable_by_definition};
///
/// #[derive(Default)]
/// struct Marker;
///
/// impl Describe for Marker {
///     fn describe() -> DefinitionBuilder<Self> {
///         DefinitionBuilder::with_default()
///     }
/// }
///
/// impl_serializable_by_definition!(Marker);
/// auto_register!(Marker, Vec<Marker>);
/// ```
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! auto_register {
    ($($ty:ty),+ $(,)?) => {
        $(
            $crate::__macro_exports::inventory::submit! {
                $crate::__macro_exports::AutoRegistration::of::<$ty>()
            }
        )+
    };
}

/// Registers types during [`SerializationManager::initialize`].
///
/// Generic types must be listed with concrete parameters. Without the
/// `auto_register` feature this expands to nothing.
#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! auto_register {
    ($($ty:ty),+ $(,)?) => {};
}
