//! Results of checking a node tree against a type without reading it.
//!
//! A [`ValidationNode`] mirrors the shape of the checked [`DataNode`]. Every
//! position that failed holds an [`ErrorNode`] instead, so a single pass can
//! report every problem in a document.
//!
//! [`DataNode`]: crate::DataNode

// -----------------------------------------------------------------------------
// Modules

mod error_node;
mod validation_node;

// -----------------------------------------------------------------------------
// Exports

pub use error_node::{ErrorNode, ReportedError};
pub use validation_node::{ValidatedMapping, ValidatedSequence, ValidationNode};
