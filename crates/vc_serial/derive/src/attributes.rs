//! Parsing of `#[data(..)]` attributes.

use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{Attribute, LitStr, Path};

use crate::DATA_ATTRIBUTE_NAME;

/// Calls `parse` for every item of every `#[data(..)]` attribute.
fn for_each_meta(
    attrs: &[Attribute],
    mut parse: impl FnMut(&ParseNestedMeta) -> syn::Result<()>,
) -> syn::Result<()> {
    for attr in attrs {
        if attr.path().is_ident(DATA_ATTRIBUTE_NAME) {
            attr.parse_nested_meta(|meta| parse(&meta))?;
        }
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Type attributes

#[derive(Default)]
pub(crate) struct TypeAttributes {
    pub hook: Option<Path>,
    pub constructor: Option<Path>,
    pub no_default: Option<Span>,
    pub auto_register: Option<Span>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();

        for_each_meta(attrs, |meta| {
            if meta.path.is_ident("hook") {
                result.hook = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("constructor") {
                result.constructor = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("no_default") {
                result.no_default = Some(meta.path.span());
            } else if meta.path.is_ident("auto_register") {
                result.auto_register = Some(meta.path.span());
            } else {
                return Err(meta.error(
                    "expected `hook`, `constructor`, `no_default` or `auto_register`",
                ));
            }
            Ok(())
        })?;

        if let (Some(_), Some(span)) = (&result.constructor, result.no_default) {
            return Err(syn::Error::new(span, "`no_default` conflicts with `constructor`"));
        }
        Ok(result)
    }
}

// -----------------------------------------------------------------------------
// Field attributes

#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub key: Option<LitStr>,
    pub required: bool,
    pub always_write: bool,
    pub by_ref: bool,
    pub no_eq: bool,
    pub skip: bool,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();

        for_each_meta(attrs, |meta| {
            let path = &meta.path;
            if path.is_ident("key") {
                result.key = Some(meta.value()?.parse()?);
            } else if path.is_ident("required") {
                result.required = true;
            } else if path.is_ident("always_write") {
                result.always_write = true;
            } else if path.is_ident("by_ref") {
                result.by_ref = true;
            } else if path.is_ident("no_eq") {
                result.no_eq = true;
            } else if path.is_ident("skip") {
                result.skip = true;
            } else {
                return Err(meta.error(
                    "expected `key`, `required`, `always_write`, `by_ref`, `no_eq` or `skip`",
                ));
            }
            Ok(())
        })?;

        Ok(result)
    }
}

// -----------------------------------------------------------------------------
// Variant attributes

#[derive(Default)]
pub(crate) struct VariantAttributes {
    pub rename: Option<LitStr>,
}

impl VariantAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();

        for_each_meta(attrs, |meta| {
            if meta.path.is_ident("rename") {
                result.rename = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("expected `rename`"))
            }
        })?;

        Ok(result)
    }
}
