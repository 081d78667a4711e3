use alloc::format;
use alloc::string::ToString;
use alloc::sync::Arc;
use core::any::{TypeId, type_name};

use vc_node::validation::{ErrorNode, ValidationNode};
use vc_node::{DataNode, MappingNode, NodeKind, SequenceNode, ValueNode};

use super::{SerializationContext, SerializationManager, passthrough};
use crate::codec::{ErasedInstantiator, ErasedTypeReader, NodeType};
use crate::definition::{copy_fields, read_fields, validate_fields, write_fields};
use crate::error::{Result, SerializationError};
use crate::registry::{Serializable, TypeSerializers};

// -----------------------------------------------------------------------------
// Session

/// The state of one manager call, handed to every codec it reaches.
///
/// Codecs use it to recurse into nested values so the call's context and hook
/// setting apply all the way down.
///
/// Every operation resolves in the same order:
///
/// 1. Node types pass through untouched.
/// 2. A codec in the call's context.
/// 3. A codec registered with the manager.
/// 4. An erased reader (reads only).
/// 5. The type's data definition.
#[derive(Clone, Copy)]
pub struct Session<'a> {
    manager: &'a SerializationManager,
    context: Option<&'a dyn SerializationContext>,
    skip_hook: bool,
}

impl<'a> Session<'a> {
    #[inline]
    pub(crate) fn new(
        manager: &'a SerializationManager,
        context: Option<&'a dyn SerializationContext>,
        skip_hook: bool,
    ) -> Self {
        Self {
            manager,
            context,
            skip_hook,
        }
    }

    #[inline]
    pub fn manager(&self) -> &'a SerializationManager {
        self.manager
    }

    #[inline]
    pub fn context(&self) -> Option<&'a dyn SerializationContext> {
        self.context
    }

    /// Whether post-read hooks are suppressed for this call.
    #[inline]
    pub fn skip_hook(&self) -> bool {
        self.skip_hook
    }

    // -------------------------------------------------------------------------
    // Lookup

    fn context_serializers<T: 'static>(&self) -> Option<&'a TypeSerializers<T>> {
        self.context.and_then(|ctx| ctx.serializers().get::<T>())
    }

    fn erased_reader(&self, type_id: TypeId, kind: NodeKind) -> Option<Arc<dyn ErasedTypeReader>> {
        self.context
            .and_then(|ctx| ctx.serializers().erased_reader(type_id, kind).cloned())
            .or_else(|| self.manager.erased_reader(type_id, kind))
    }

    fn instantiator(&self, type_id: TypeId) -> Option<ErasedInstantiator> {
        self.context
            .and_then(|ctx| ctx.serializers().instantiator(type_id).cloned())
            .or_else(|| self.manager.instantiator(type_id))
    }

    fn has_reader<T: Serializable, N: NodeType>(&self, serializers: &TypeSerializers<T>) -> bool {
        self.context_serializers::<T>()
            .is_some_and(|s| s.reader::<N>().is_some())
            || serializers.reader::<N>().is_some()
            || self.erased_reader(TypeId::of::<T>(), N::KIND).is_some()
    }

    /// Panics in strict mode, otherwise logs and hands the error back.
    fn violation(&self, error: SerializationError) -> SerializationError {
        if self.manager.config().strict_contracts {
            error.handle_error();
        }
        log::error!("serializer contract violated: {error}");
        error
    }

    // -------------------------------------------------------------------------
    // Read

    /// Reads a `T` from `node`, dispatching on the node's shape.
    pub fn read<T: Serializable>(&self, node: &DataNode, existing: Option<T>) -> Result<T> {
        match node {
            DataNode::Value(node) => self.read_as::<T, ValueNode>(node, existing),
            DataNode::Mapping(node) => self.read_as::<T, MappingNode>(node, existing),
            DataNode::Sequence(node) => self.read_as::<T, SequenceNode>(node, existing),
        }
    }

    pub fn read_as<T: Serializable, N: NodeType>(&self, node: &N, existing: Option<T>) -> Result<T> {
        if let Some(value) = passthrough::read::<T, N>(node) {
            return Ok(value);
        }

        let serializers = self.manager.serializers::<T>();
        if node.is_null() && !serializers.is_nullable() {
            return Err(SerializationError::NullNotAllowed {
                type_name: serializers.type_name(),
            });
        }

        if let Some(reader) = self.context_serializers::<T>().and_then(|s| s.reader::<N>()) {
            return reader.read(self, node, existing);
        }
        if let Some(reader) = serializers.reader::<N>() {
            return reader.read(self, node, existing);
        }
        if let Some(reader) = self.erased_reader(TypeId::of::<T>(), N::KIND) {
            return self.read_erased(&*reader, &node.to_data_node(), serializers.type_name());
        }
        if let (Some(definition), Some(mapping)) = (serializers.definition(), node.as_mapping()) {
            return read_fields(self, definition, mapping, existing);
        }

        Err(SerializationError::NoReader {
            type_name: serializers.type_name(),
            kind: N::KIND,
        })
    }

    fn read_erased<T: 'static>(
        &self,
        reader: &dyn ErasedTypeReader,
        node: &DataNode,
        type_name: &'static str,
    ) -> Result<T> {
        match reader.read(self, node)? {
            None => Err(self.violation(SerializationError::ReadReturnedNull { type_name })),
            Some(value) => value
                .downcast::<T>()
                .map(|value| *value)
                .map_err(|_| self.violation(SerializationError::WrongInstanceType { expected: type_name })),
        }
    }

    // -------------------------------------------------------------------------
    // Write

    pub fn write<T: Serializable>(&self, value: &T, always_write: bool) -> Result<DataNode> {
        if let Some(node) = passthrough::write(value) {
            return Ok(node);
        }

        if let Some(writer) = self.context_serializers::<T>().and_then(TypeSerializers::writer) {
            return writer.write(self, value, always_write);
        }

        let serializers = self.manager.serializers::<T>();
        if let Some(writer) = serializers.writer() {
            return writer.write(self, value, always_write);
        }
        if let Some(definition) = serializers.definition() {
            return write_fields(self, definition, value, always_write);
        }

        Err(SerializationError::NoWriter {
            type_name: serializers.type_name(),
        })
    }

    // -------------------------------------------------------------------------
    // Validate

    /// Checks that `node` could be read as a `T`. Never panics on bad data.
    pub fn validate<T: Serializable>(&self, node: &DataNode) -> ValidationNode {
        match node {
            DataNode::Value(node) => self.validate_as::<T, ValueNode>(node),
            DataNode::Mapping(node) => self.validate_as::<T, MappingNode>(node),
            DataNode::Sequence(node) => self.validate_as::<T, SequenceNode>(node),
        }
    }

    pub fn validate_as<T: Serializable, N: NodeType>(&self, node: &N) -> ValidationNode {
        if let Some(result) = passthrough::validate::<T, N>(node) {
            return result;
        }

        let serializers = self.manager.serializers::<T>();
        let type_name = serializers.type_name();
        if node.is_null() && !serializers.is_nullable() {
            return ValidationNode::error(node.to_data_node(), format!("`{type_name}` is not nullable"));
        }

        if let Some(validator) = self.context_serializers::<T>().and_then(|s| s.validator::<N>()) {
            return self.checked(validator.validate(self, node), node, type_name);
        }
        if let Some(validator) = serializers.validator::<N>() {
            return self.checked(validator.validate(self, node), node, type_name);
        }
        if let (Some(definition), Some(mapping)) = (serializers.definition(), node.as_mapping()) {
            return validate_fields(self, definition, mapping);
        }
        if self.has_reader::<T, N>(&serializers) {
            return passthrough::accept_typed(node);
        }

        let reason = if serializers.definition().is_some() {
            format!("expected a mapping for `{type_name}`, found a {}", N::KIND)
        } else {
            format!("no codec reads `{type_name}` from a {} node", N::KIND)
        };
        ValidationNode::error(node.to_data_node(), reason)
    }

    /// Replaces a validator result of the wrong shape with an error.
    fn checked<N: NodeType>(&self, result: ValidationNode, node: &N, type_name: &'static str) -> ValidationNode {
        let found = match result.kind() {
            None => return result,
            Some(kind) if kind == N::KIND => return result,
            Some(kind) => kind.name(),
        };

        let error = self.violation(SerializationError::WrongValidationNodeType {
            type_name,
            expected: N::KIND,
            found,
        });
        ErrorNode::new(node.to_data_node(), error.to_string())
            .always_relevant()
            .into()
    }

    // -------------------------------------------------------------------------
    // Copy

    /// Overwrites `target` with a deep copy of `source`.
    pub fn copy_to<T: Serializable>(&self, source: &T, target: &mut T) -> Result<()> {
        if let Some(copy) = passthrough::clone(source) {
            *target = copy;
            return Ok(());
        }

        if let Some(copier) = self.context_serializers::<T>().and_then(TypeSerializers::copier) {
            return copier.copy_to(self, source, target);
        }

        let serializers = self.manager.serializers::<T>();
        if let Some(copier) = serializers.copier() {
            return copier.copy_to(self, source, target);
        }
        if let Some(definition) = serializers.definition() {
            return copy_fields(self, definition, source, target);
        }

        Err(self.violation(SerializationError::MissingCopyImplementation {
            type_name: serializers.type_name(),
        }))
    }

    /// Returns a deep copy of `source` in a freshly created instance.
    pub fn create_copy<T: Serializable>(&self, source: &T) -> Result<T> {
        if let Some(copy) = passthrough::clone(source) {
            return Ok(copy);
        }

        if let Some(copier) = self.context_serializers::<T>().and_then(TypeSerializers::copier) {
            return copier.create_copy(self, source);
        }

        let serializers = self.manager.serializers::<T>();
        if let Some(copier) = serializers.copier() {
            return copier.create_copy(self, source);
        }
        if let Some(definition) = serializers.definition() {
            let mut target = self.instantiate::<T>()?;
            copy_fields(self, definition, source, &mut target)?;
            return Ok(target);
        }

        Err(self.violation(SerializationError::MissingCopyImplementation {
            type_name: serializers.type_name(),
        }))
    }

    // -------------------------------------------------------------------------
    // Instantiate

    /// Creates a blank `T` for the data definition engine.
    ///
    /// Erased instantiators win over the definition's constructor.
    pub fn instantiate<T: Serializable>(&self) -> Result<T> {
        let expected = type_name::<T>();
        if let Some(instantiator) = self.instantiator(TypeId::of::<T>()) {
            return instantiator()
                .downcast::<T>()
                .map(|value| *value)
                .map_err(|_| self.violation(SerializationError::WrongInstanceType { expected }));
        }

        let serializers = self.manager.serializers::<T>();
        match serializers.definition().and_then(|definition| definition.constructor()) {
            Some(constructor) => Ok(constructor()),
            None => Err(SerializationError::MissingInstantiator { type_name: expected }),
        }
    }
}
