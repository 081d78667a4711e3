use alloc::borrow::ToOwned;
use alloc::format;
use alloc::string::{String, ToString};
use core::any::type_name;
use core::marker::PhantomData;

use vc_node::validation::ValidationNode;
use vc_node::{DataNode, ValueNode};

use crate::codec::{TypeCopier, TypeReader, TypeValidator, TypeWriter};
use crate::error::{Result, SerializationError};
use crate::manager::Session;
use crate::registry::{Serializable, SerializerRegistry, TypeSerializers};

// -----------------------------------------------------------------------------
// Scalar

/// A type stored as the text of a single value node.
///
/// Parsing and formatting never depend on the locale.
trait Scalar: Clone + Send + Sync + 'static {
    fn parse(text: &str) -> Result<Self, String>;

    fn format(&self) -> String;
}

macro_rules! impl_scalar_from_str {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Scalar for $ty {
                #[inline]
                fn parse(text: &str) -> Result<Self, String> {
                    text.trim().parse().map_err(|e| ToString::to_string(&e))
                }

                #[inline]
                fn format(&self) -> String {
                    self.to_string()
                }
            }
        )+
    };
}

impl_scalar_from_str!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

impl Scalar for bool {
    fn parse(text: &str) -> Result<Self, String> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if text.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err("expected `true` or `false`".to_owned())
        }
    }

    #[inline]
    fn format(&self) -> String {
        self.to_string()
    }
}

impl Scalar for char {
    fn parse(text: &str) -> Result<Self, String> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(format!("expected exactly one character, found {}", text.chars().count())),
        }
    }

    #[inline]
    fn format(&self) -> String {
        self.to_string()
    }
}

impl Scalar for String {
    #[inline]
    fn parse(text: &str) -> Result<Self, String> {
        Ok(text.to_owned())
    }

    #[inline]
    fn format(&self) -> String {
        self.clone()
    }
}

// -----------------------------------------------------------------------------
// ScalarCodec

struct ScalarCodec<T>(PhantomData<fn() -> T>);

impl<T: Scalar> ScalarCodec<T> {
    fn parse(node: &ValueNode) -> Result<T> {
        let content = node.content().unwrap_or_default();
        T::parse(content).map_err(|reason| SerializationError::InvalidValue {
            type_name: type_name::<T>(),
            content: content.to_owned(),
            reason,
        })
    }
}

impl<T: Scalar> TypeReader<T, ValueNode> for ScalarCodec<T> {
    #[inline]
    fn read(&self, _: &Session<'_>, node: &ValueNode, _: Option<T>) -> Result<T> {
        Self::parse(node)
    }
}

impl<T: Scalar> TypeValidator<T, ValueNode> for ScalarCodec<T> {
    fn validate(&self, _: &Session<'_>, node: &ValueNode) -> ValidationNode {
        match Self::parse(node) {
            Ok(_) => ValidationNode::Value,
            Err(error) => ValidationNode::error(node.clone(), error.to_string()),
        }
    }
}

impl<T: Scalar> TypeWriter<T> for ScalarCodec<T> {
    #[inline]
    fn write(&self, _: &Session<'_>, value: &T, _: bool) -> Result<DataNode> {
        Ok(DataNode::value(value.format()))
    }
}

impl<T: Scalar> TypeCopier<T> for ScalarCodec<T> {
    #[inline]
    fn create_copy(&self, _: &Session<'_>, source: &T) -> Result<T> {
        Ok(source.clone())
    }

    #[inline]
    fn copy_to(&self, _: &Session<'_>, source: &T, target: &mut T) -> Result<()> {
        target.clone_from(source);
        Ok(())
    }
}

fn scalar_serializers<T: Scalar>() -> TypeSerializers<T> {
    TypeSerializers::new()
        .with_reader::<ValueNode>(ScalarCodec::<T>(PhantomData))
        .with_validator::<ValueNode>(ScalarCodec::<T>(PhantomData))
        .with_writer(ScalarCodec::<T>(PhantomData))
        .with_copier(ScalarCodec::<T>(PhantomData))
}

macro_rules! impl_serializable_scalar {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Serializable for $ty {
                #[inline]
                fn serializers() -> TypeSerializers<Self> {
                    scalar_serializers::<Self>()
                }
            }
        )+
    };
}

impl_serializable_scalar!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, String,
);

pub(super) fn register(registry: &mut SerializerRegistry) {
    macro_rules! register {
        ($($ty:ty),+ $(,)?) => { $( registry.register::<$ty>(); )+ };
    }

    register!(
        i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, String,
    );
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::Scalar;
    use alloc::string::String;

    #[test]
    fn integers_trim_and_reject() {
        assert_eq!(<i32 as Scalar>::parse(" 42 "), Ok(42));
        assert_eq!(<i32 as Scalar>::parse("-7"), Ok(-7));
        assert!(<u8 as Scalar>::parse("256").is_err());
        assert!(<i32 as Scalar>::parse("1.5").is_err());
        assert!(<i32 as Scalar>::parse("").is_err());
    }

    #[test]
    fn floats_are_invariant() {
        assert_eq!(<f64 as Scalar>::parse("1.5"), Ok(1.5));
        assert_eq!(<f32 as Scalar>::parse("1e3"), Ok(1000.0));
        assert!(<f64 as Scalar>::parse("1,5").is_err());
        assert_eq!(1.5_f64.format(), "1.5");
        assert_eq!(1.0_f32.format(), "1");
    }

    #[test]
    fn bool_is_case_insensitive() {
        assert_eq!(<bool as Scalar>::parse("True"), Ok(true));
        assert_eq!(<bool as Scalar>::parse("FALSE"), Ok(false));
        assert!(<bool as Scalar>::parse("yes").is_err());
        assert_eq!(true.format(), "true");
    }

    #[test]
    fn char_needs_one_character() {
        assert_eq!(<char as Scalar>::parse("x"), Ok('x'));
        assert!(<char as Scalar>::parse("xy").is_err());
        assert!(<char as Scalar>::parse("").is_err());
    }

    #[test]
    fn strings_keep_whitespace() {
        assert_eq!(<String as Scalar>::parse(" a "), Ok(String::from(" a ")));
    }
}
