//! See following macros:
//!
//! - [`DataDefinition`](derive_data_definition)
//! - [`DataEnum`](derive_data_enum)
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static DATA_ATTRIBUTE_NAME: &str = "data";

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod auto_register;
mod data_definition;
mod data_enum;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Data Definition Derivation
///
/// `#[derive(DataDefinition)]` implements `Describe` and `Serializable` for a
/// struct with named fields. Every field becomes an entry of the mapping the
/// struct is stored as, keyed by the field name.
///
/// Field types must implement `Serializable`. By default they must also
/// implement `PartialEq`, which is used to omit fields equal to the default
/// instance when writing.
///
/// ## Type attributes
///
/// - `#[data(constructor = path)]`: create blank instances with `path()`
///   instead of `Default::default()`.
/// - `#[data(no_default)]`: no constructor; instances must be supplied by the
///   caller or by a registered instantiator.
/// - `#[data(hook = path)]`: call `path(&mut self)` once after each read or copy.
/// - `#[data(auto_register)]`: register the type during manager initialization
///   (requires the `auto_register` feature, ignored for generic types).
///
/// ## Field attributes
///
/// - `#[data(key = "name")]`: store the field under another key.
/// - `#[data(required)]`: reading fails if the key is absent.
/// - `#[data(always_write)]`: write the field even when it equals the default.
/// - `#[data(by_ref)]`: copy the field with `Clone` (an `Arc` is shared).
/// - `#[data(no_eq)]`: detect defaults by comparing written nodes instead of
///   with `PartialEq`.
/// - `#[data(skip)]`: not stored; keeps the constructor's value.
///
/// ## Example
///
/// ```rust, ignore
/// #[derive(DataDefinition, Default)]
/// #[data(hook = Self::after_read, auto_register)]
/// struct Weapon {
///     #[data(key = "name", required)]
///     id: String,
///     damage: u32,
///     #[data(by_ref)]
///     icon: Arc<Texture>,
///     #[data(skip)]
///     cached_dps: f32,
/// }
/// ```
#[proc_macro_derive(DataDefinition, attributes(data))]
pub fn derive_data_definition(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match data_definition::impl_data_definition(&ast) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// # Data Enum Derivation
///
/// `#[derive(DataEnum)]` implements `DataEnum` and `Serializable` for an enum
/// of unit variants, stored as a value node holding the variant name.
///
/// Reading matches names exactly first, then ignoring ASCII case. The enum
/// must also derive `Clone` and `Copy`.
///
/// ## Attributes
///
/// - `#[data(rename = "name")]` on a variant: store it under another name.
/// - `#[data(auto_register)]` on the enum: see [`DataDefinition`](derive_data_definition).
///
/// ## Example
///
/// ```rust, ignore
/// #[derive(DataEnum, Clone, Copy)]
/// enum Rarity {
///     Common,
///     #[data(rename = "rare")]
///     Rare,
/// }
/// ```
#[proc_macro_derive(DataEnum, attributes(data))]
pub fn derive_data_enum(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match data_enum::impl_data_enum(&ast) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}
