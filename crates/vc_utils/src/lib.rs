//! Small shared utilities: deterministic hash containers and a map keyed by [`TypeId`].
//!
//! [`TypeId`]: core::any::TypeId
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// No STD Support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod typeid_map;

pub mod hash;

// -----------------------------------------------------------------------------
// Top-level exports

pub use hash::{HashMap, HashSet};
pub use typeid_map::TypeIdMap;
