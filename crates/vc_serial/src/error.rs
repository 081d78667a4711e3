use alloc::boxed::Box;
use alloc::string::String;

use thiserror::Error;
use vc_node::NodeKind;

// -----------------------------------------------------------------------------
// SerializationError

/// Failure of a read, write or copy.
///
/// Validation problems are not errors; they are reported as
/// [`ErrorNode`](vc_node::validation::ErrorNode)s inside the validation tree.
///
/// Four kinds indicate a bug in a codec or registration rather than bad input,
/// see [`is_contract_violation`](Self::is_contract_violation).
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SerializationError {
    #[error("required field `{field}` of `{type_name}` is missing")]
    MissingRequiredField {
        type_name: &'static str,
        field: &'static str,
    },

    #[error("`{type_name}` is not nullable, found a null value")]
    NullNotAllowed { type_name: &'static str },

    #[error("reader for `{type_name}` returned null")]
    ReadReturnedNull { type_name: &'static str },

    #[error("instantiator did not return a `{expected}`")]
    WrongInstanceType { expected: &'static str },

    #[error("validator for `{type_name}` returned a {found} result for a {expected} node")]
    WrongValidationNodeType {
        type_name: &'static str,
        expected: NodeKind,
        found: &'static str,
    },

    #[error("`{type_name}` has no copier and no data definition")]
    MissingCopyImplementation { type_name: &'static str },

    #[error("no codec reads `{type_name}` from a {kind} node")]
    NoReader {
        type_name: &'static str,
        kind: NodeKind,
    },

    #[error("no codec writes `{type_name}`")]
    NoWriter { type_name: &'static str },

    #[error("`{type_name}` has no constructor or instantiator")]
    MissingInstantiator { type_name: &'static str },

    #[error("invalid `{type_name}` value {content:?}: {reason}")]
    InvalidValue {
        type_name: &'static str,
        content: String,
        reason: String,
    },

    #[error("in field `{field}` of `{type_name}`: {source}")]
    Field {
        type_name: &'static str,
        field: &'static str,
        #[source]
        source: Box<SerializationError>,
    },
}

impl SerializationError {
    /// Wraps `self` with the field it occurred in.
    #[inline]
    pub fn in_field(self, type_name: &'static str, field: &'static str) -> Self {
        Self::Field {
            type_name,
            field,
            source: Box::new(self),
        }
    }

    /// The innermost error below any [`Field`](Self::Field) wrappers.
    pub fn root_cause(&self) -> &SerializationError {
        let mut error = self;
        while let Self::Field { source, .. } = error {
            error = source;
        }
        error
    }

    /// `true` for failures caused by a faulty codec or registration.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self.root_cause(),
            Self::ReadReturnedNull { .. }
                | Self::WrongInstanceType { .. }
                | Self::WrongValidationNodeType { .. }
                | Self::MissingCopyImplementation { .. }
        )
    }

    #[cold]
    #[inline(never)]
    pub fn handle_error(&self) -> ! {
        panic!("{self}")
    }
}

/// `Result` alias used throughout this crate.
pub type Result<T, E = SerializationError> = core::result::Result<T, E>;

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::SerializationError;
    use alloc::string::ToString;

    #[test]
    fn field_context_chain() {
        let error = SerializationError::MissingRequiredField {
            type_name: "Inner",
            field: "id",
        }
        .in_field("Outer", "inner");

        assert_eq!(
            error.to_string(),
            "in field `inner` of `Outer`: required field `id` of `Inner` is missing"
        );
        assert!(matches!(
            error.root_cause(),
            SerializationError::MissingRequiredField { field: "id", .. }
        ));
        assert!(!error.is_contract_violation());
    }

    #[test]
    fn contract_violations() {
        let nested = SerializationError::MissingCopyImplementation { type_name: "Handle" }
            .in_field("Owner", "handle");
        assert!(nested.is_contract_violation());
        assert!(
            !SerializationError::NullNotAllowed { type_name: "i32" }.is_contract_violation()
        );
    }

    #[test]
    #[should_panic(expected = "reader for `Foo` returned null")]
    fn handle_error_panics() {
        SerializationError::ReadReturnedNull { type_name: "Foo" }.handle_error();
    }
}
