use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::type_name;

use super::DataDefinition;
use super::field::{Accessor, FieldConfig, FieldSpec, field_type};
use crate::registry::Serializable;

// -----------------------------------------------------------------------------
// DefinitionBuilder

/// Collects the field table of a type.
///
/// # Examples
///
/// ```
/// use vc_serial::{DefinitionBuilder, Describe, impl_serializable_by_definition};
///
/// #[derive(Default)]
/// struct Sprite {
///     path: String,
///     scale: f32,
///     layers: Vec<String>,
/// }
///
/// impl Describe for Sprite {
///     fn describe() -> DefinitionBuilder<Self> {
///         DefinitionBuilder::<Self>::with_default()
///             .field_with("sprite", |s| &s.path, |s| &mut s.path, |f| f.required().compare_eq())
///             .field("scale", |s| &s.scale, |s| &mut s.scale)
///             .field("layers", |s| &s.layers, |s| &mut s.layers)
///     }
/// }
///
/// impl_serializable_by_definition!(Sprite);
///
/// let definition = Sprite::describe().build();
/// assert_eq!(definition.fields().len(), 3);
/// assert!(definition.field("sprite").unwrap().is_required());
/// ```
pub struct DefinitionBuilder<T> {
    fields: Vec<FieldSpec<T>>,
    constructor: Option<fn() -> T>,
    hook: Option<fn(&mut T)>,
}

impl<T: Send + Sync + 'static> DefinitionBuilder<T> {
    /// A builder without constructor; instances must come from a registered
    /// instantiator or from the caller.
    #[inline]
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            constructor: None,
            hook: None,
        }
    }

    /// A builder using `T::default` as constructor.
    #[inline]
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new().constructor(T::default)
    }

    #[inline]
    pub fn constructor(mut self, constructor: fn() -> T) -> Self {
        self.constructor = Some(constructor);
        self
    }

    /// Runs `hook` once after the fields of a read or copied instance are set.
    #[inline]
    pub fn after_read(mut self, hook: fn(&mut T)) -> Self {
        self.hook = Some(hook);
        self
    }

    /// An optional field whose defaults are detected with `PartialEq`.
    #[inline]
    pub fn field<F: Serializable + PartialEq>(
        self,
        key: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self {
        self.field_with(key, get, get_mut, FieldConfig::compare_eq)
    }

    /// A required field whose defaults are detected with `PartialEq`.
    #[inline]
    pub fn required_field<F: Serializable + PartialEq>(
        self,
        key: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self {
        self.field_with(key, get, get_mut, |f| f.required().compare_eq())
    }

    /// A field with explicit options.
    ///
    /// # Panics
    ///
    /// Panics if `key` is already used by another field.
    pub fn field_with<F: Serializable>(
        mut self,
        key: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
        configure: impl FnOnce(FieldConfig<F>) -> FieldConfig<F>,
    ) -> Self {
        assert!(
            self.fields.iter().all(|field| field.key != key),
            "duplicate field key `{key}` in `{}`",
            type_name::<T>(),
        );

        let config = configure(FieldConfig::new());
        let (type_name, type_id) = field_type::<F>();
        self.fields.push(FieldSpec {
            key,
            flags: config.flags,
            type_name,
            type_id,
            ops: Box::new(Accessor {
                get,
                get_mut,
                eq: config.eq,
                clone: config.clone,
            }),
        });
        self
    }

    pub fn build(self) -> DataDefinition<T> {
        DataDefinition::new(self.fields, self.constructor, self.hook)
    }
}

impl<T: Send + Sync + 'static> Default for DefinitionBuilder<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
