use alloc::sync::Arc;
use core::any::type_name;
use core::fmt;

use vc_node::{MappingNode, NodeKind, SequenceNode, ValueNode};

use crate::codec::{NodeType, TypeCopier, TypeReader, TypeValidator, TypeWriter};
use crate::definition::DataDefinition;

// -----------------------------------------------------------------------------
// TypeSerializers

/// Everything the manager knows about serializing one type.
///
/// Holds up to one reader and one validator per node kind, a writer, a copier,
/// and optionally the [`DataDefinition`] used for whatever the codecs leave
/// uncovered.
///
/// # Examples
///
/// ```
/// use vc_serial::{Session, TypeReader, TypeSerializers, Result};
/// use vc_node::ValueNode;
///
/// struct Meters(f32);
///
/// struct MetersReader;
///
/// impl TypeReader<Meters, ValueNode> for MetersReader {
///     fn read(&self, session: &Session<'_>, node: &ValueNode, _: Option<Meters>) -> Result<Meters> {
///         let text = node.content().unwrap_or_default();
///         let value = text.trim_end_matches('m');
///         session.read::<f32>(&vc_node::DataNode::value(value), None).map(Meters)
///     }
/// }
///
/// let serializers = TypeSerializers::<Meters>::new().with_reader::<ValueNode>(MetersReader);
/// assert!(serializers.has_reader(vc_node::NodeKind::Value));
/// assert!(!serializers.has_reader(vc_node::NodeKind::Mapping));
/// ```
pub struct TypeSerializers<T> {
    pub(crate) type_name: &'static str,
    pub(crate) nullable: bool,
    pub(crate) value_reader: Option<Arc<dyn TypeReader<T, ValueNode>>>,
    pub(crate) mapping_reader: Option<Arc<dyn TypeReader<T, MappingNode>>>,
    pub(crate) sequence_reader: Option<Arc<dyn TypeReader<T, SequenceNode>>>,
    pub(crate) value_validator: Option<Arc<dyn TypeValidator<T, ValueNode>>>,
    pub(crate) mapping_validator: Option<Arc<dyn TypeValidator<T, MappingNode>>>,
    pub(crate) sequence_validator: Option<Arc<dyn TypeValidator<T, SequenceNode>>>,
    pub(crate) writer: Option<Arc<dyn TypeWriter<T>>>,
    pub(crate) copier: Option<Arc<dyn TypeCopier<T>>>,
    pub(crate) definition: Option<Arc<DataDefinition<T>>>,
}

impl<T: 'static> TypeSerializers<T> {
    /// No codecs, no definition.
    pub fn new() -> Self {
        Self {
            type_name: type_name::<T>(),
            nullable: false,
            value_reader: None,
            mapping_reader: None,
            sequence_reader: None,
            value_validator: None,
            mapping_validator: None,
            sequence_validator: None,
            writer: None,
            copier: None,
            definition: None,
        }
    }

    /// Serializers backed only by the data definition engine.
    pub fn from_definition(definition: DataDefinition<T>) -> Self {
        let mut serializers = Self::new();
        serializers.definition = Some(Arc::new(definition));
        serializers
    }

    /// Marks the type as accepting null nodes.
    ///
    /// Only nullable types see null values; for every other type the manager
    /// rejects them before any codec runs.
    #[inline]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    #[inline]
    pub fn with_reader<N: NodeType>(mut self, reader: impl TypeReader<T, N>) -> Self {
        self.set_reader::<N>(Arc::new(reader));
        self
    }

    #[inline]
    pub fn with_validator<N: NodeType>(mut self, validator: impl TypeValidator<T, N>) -> Self {
        self.set_validator::<N>(Arc::new(validator));
        self
    }

    #[inline]
    pub fn with_writer(mut self, writer: impl TypeWriter<T>) -> Self {
        self.writer = Some(Arc::new(writer));
        self
    }

    #[inline]
    pub fn with_copier(mut self, copier: impl TypeCopier<T>) -> Self {
        self.copier = Some(Arc::new(copier));
        self
    }

    #[inline]
    pub fn set_reader<N: NodeType>(&mut self, reader: Arc<dyn TypeReader<T, N>>) {
        N::set_reader(self, reader);
    }

    #[inline]
    pub fn set_validator<N: NodeType>(&mut self, validator: Arc<dyn TypeValidator<T, N>>) {
        N::set_validator(self, validator);
    }

    #[inline]
    pub fn set_writer(&mut self, writer: Arc<dyn TypeWriter<T>>) {
        self.writer = Some(writer);
    }

    #[inline]
    pub fn set_copier(&mut self, copier: Arc<dyn TypeCopier<T>>) {
        self.copier = Some(copier);
    }

    #[inline]
    pub fn set_definition(&mut self, definition: DataDefinition<T>) {
        self.definition = Some(Arc::new(definition));
    }
}

impl<T> TypeSerializers<T> {
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[inline]
    pub fn reader<N: NodeType>(&self) -> Option<&Arc<dyn TypeReader<T, N>>> {
        N::reader(self)
    }

    #[inline]
    pub fn validator<N: NodeType>(&self) -> Option<&Arc<dyn TypeValidator<T, N>>> {
        N::validator(self)
    }

    #[inline]
    pub fn writer(&self) -> Option<&Arc<dyn TypeWriter<T>>> {
        self.writer.as_ref()
    }

    #[inline]
    pub fn copier(&self) -> Option<&Arc<dyn TypeCopier<T>>> {
        self.copier.as_ref()
    }

    #[inline]
    pub fn definition(&self) -> Option<&Arc<DataDefinition<T>>> {
        self.definition.as_ref()
    }

    /// Whether a typed reader accepts nodes of `kind`.
    pub fn has_reader(&self, kind: NodeKind) -> bool {
        match kind {
            NodeKind::Value => self.value_reader.is_some(),
            NodeKind::Mapping => self.mapping_reader.is_some(),
            NodeKind::Sequence => self.sequence_reader.is_some(),
        }
    }
}

impl<T: 'static> Default for TypeSerializers<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for TypeSerializers<T> {
    fn clone(&self) -> Self {
        Self {
            type_name: self.type_name,
            nullable: self.nullable,
            value_reader: self.value_reader.clone(),
            mapping_reader: self.mapping_reader.clone(),
            sequence_reader: self.sequence_reader.clone(),
            value_validator: self.value_validator.clone(),
            mapping_validator: self.mapping_validator.clone(),
            sequence_validator: self.sequence_validator.clone(),
            writer: self.writer.clone(),
            copier: self.copier.clone(),
            definition: self.definition.clone(),
        }
    }
}

impl<T> fmt::Debug for TypeSerializers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeSerializers")
            .field("type_name", &self.type_name)
            .field("nullable", &self.nullable)
            .field("value_reader", &self.value_reader.is_some())
            .field("mapping_reader", &self.mapping_reader.is_some())
            .field("sequence_reader", &self.sequence_reader.is_some())
            .field("writer", &self.writer.is_some())
            .field("copier", &self.copier.is_some())
            .field("definition", &self.definition.is_some())
            .finish()
    }
}
