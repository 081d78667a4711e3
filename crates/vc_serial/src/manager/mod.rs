//! The [`SerializationManager`] façade and the per-call [`Session`].
//!
//! The manager owns a [`SerializerRegistry`](crate::SerializerRegistry) behind a
//! lock. Calls take `&self` and hold the lock only while looking up or
//! building the entry of one type, never while a codec runs, so codecs may
//! recurse freely through their [`Session`].

// -----------------------------------------------------------------------------
// Modules

mod config;
mod context;
mod passthrough;
mod serialization_manager;
mod session;

// -----------------------------------------------------------------------------
// Exports

pub use config::ManagerConfig;
pub use context::SerializationContext;
pub use serialization_manager::SerializationManager;
pub use session::Session;
