use alloc::borrow::ToOwned;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::any::type_name;
use core::marker::PhantomData;

use vc_node::validation::ValidationNode;
use vc_node::{DataNode, ValueNode};

use crate::codec::{TypeCopier, TypeReader, TypeValidator, TypeWriter};
use crate::error::{Result, SerializationError};
use crate::manager::Session;
use crate::registry::TypeSerializers;

// -----------------------------------------------------------------------------
// DataEnum

/// A fieldless enum stored as the name of its variant.
///
/// Usually derived with `#[derive(DataEnum)]`, which also implements
/// [`Serializable`](crate::Serializable) through [`enum_serializers`].
///
/// # Examples
///
/// ```
/// use vc_serial::DataEnum;
///
/// #[derive(DataEnum, Clone, Copy, PartialEq, Debug)]
/// enum Direction {
///     North,
///     South,
/// }
///
/// assert_eq!(Direction::from_name("South"), Some(Direction::South));
/// assert_eq!(Direction::from_name("north"), Some(Direction::North));
/// assert_eq!(Direction::North.name(), "North");
/// ```
pub trait DataEnum: Copy + Send + Sync + 'static {
    /// Every variant with its name, in declaration order.
    const VARIANTS: &'static [(&'static str, Self)];

    fn name(self) -> &'static str;

    /// Finds a variant by exact name, then ignoring ASCII case.
    fn from_name(name: &str) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .find(|(variant, _)| *variant == name)
            .or_else(|| {
                Self::VARIANTS
                    .iter()
                    .find(|(variant, _)| variant.eq_ignore_ascii_case(name))
            })
            .map(|&(_, value)| value)
    }
}

// -----------------------------------------------------------------------------
// EnumCodec

struct EnumCodec<E>(PhantomData<fn() -> E>);

impl<E: DataEnum> EnumCodec<E> {
    fn parse(node: &ValueNode) -> Result<E> {
        let content = node.content().unwrap_or_default();
        E::from_name(content.trim()).ok_or_else(|| {
            let names: Vec<&str> = E::VARIANTS.iter().map(|(name, _)| *name).collect();
            SerializationError::InvalidValue {
                type_name: type_name::<E>(),
                content: content.to_owned(),
                reason: format!("expected one of {}", names.join(", ")),
            }
        })
    }
}

impl<E: DataEnum> TypeReader<E, ValueNode> for EnumCodec<E> {
    #[inline]
    fn read(&self, _: &Session<'_>, node: &ValueNode, _: Option<E>) -> Result<E> {
        Self::parse(node)
    }
}

impl<E: DataEnum> TypeValidator<E, ValueNode> for EnumCodec<E> {
    fn validate(&self, _: &Session<'_>, node: &ValueNode) -> ValidationNode {
        match Self::parse(node) {
            Ok(_) => ValidationNode::Value,
            Err(error) => ValidationNode::error(node.clone(), error.to_string()),
        }
    }
}

impl<E: DataEnum> TypeWriter<E> for EnumCodec<E> {
    #[inline]
    fn write(&self, _: &Session<'_>, value: &E, _: bool) -> Result<DataNode> {
        Ok(DataNode::value(String::from(value.name())))
    }
}

impl<E: DataEnum> TypeCopier<E> for EnumCodec<E> {
    #[inline]
    fn create_copy(&self, _: &Session<'_>, source: &E) -> Result<E> {
        Ok(*source)
    }
}

/// Serializers storing `E` by variant name.
pub fn enum_serializers<E: DataEnum>() -> TypeSerializers<E> {
    TypeSerializers::new()
        .with_reader::<ValueNode>(EnumCodec::<E>(PhantomData))
        .with_validator::<ValueNode>(EnumCodec::<E>(PhantomData))
        .with_writer(EnumCodec::<E>(PhantomData))
        .with_copier(EnumCodec::<E>(PhantomData))
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use vc_node::DataNode;

    use crate::{DataEnum, SerializationError, SerializationManager};

    #[derive(DataEnum, Clone, Copy, PartialEq, Debug)]
    enum Shape {
        Circle,
        #[data(rename = "box")]
        Square,
        #[data(rename = "BOX")]
        Crate,
    }

    #[test]
    fn exact_match_wins() {
        assert_eq!(Shape::from_name("box"), Some(Shape::Square));
        assert_eq!(Shape::from_name("BOX"), Some(Shape::Crate));
        assert_eq!(Shape::from_name("Box"), Some(Shape::Square));
        assert_eq!(Shape::from_name("circle"), Some(Shape::Circle));
        assert_eq!(Shape::from_name("triangle"), None);
    }

    #[test]
    fn read_write_validate() {
        let mut manager = SerializationManager::new();
        manager.initialize();

        assert_eq!(manager.read_value::<Shape>(&DataNode::value("CIRCLE")), Ok(Shape::Circle));
        assert_eq!(manager.write_value(&Shape::Square, false), Ok(DataNode::value("box")));

        let error = manager.read_value::<Shape>(&DataNode::value("cone")).unwrap_err();
        assert!(matches!(error, SerializationError::InvalidValue { .. }));
        assert!(manager.validate_node::<Shape>(&DataNode::value("cone")).has_errors());
    }
}
