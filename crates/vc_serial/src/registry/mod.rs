//! Per-type serializer entries and the registry holding them.
//!
//! - [`TypeSerializers`]: the codecs and data definition of one type.
//! - [`Serializable`]: how a type produces its `TypeSerializers`.
//! - [`SerializerRegistry`]: `TypeId`-keyed storage, plus erased readers and
//!   instantiators for runtime-only types.
//!
//! ## auto_register
//!
//! With the `auto_register` feature, types submitted through
//! [`auto_register!`](crate::auto_register) are collected with the
//! [`inventory`] crate and registered by
//! [`SerializerRegistry::auto_register`], which the manager calls during
//! initialization.
//!
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

#[cfg(feature = "auto_register")]
mod auto_register;
mod serializer_registry;
mod type_serializers;

// -----------------------------------------------------------------------------
// Exports

#[cfg(feature = "auto_register")]
pub use auto_register::AutoRegistration;
pub use serializer_registry::{Serializable, SerializerRegistry};
pub use type_serializers::TypeSerializers;
