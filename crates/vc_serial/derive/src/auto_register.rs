use proc_macro2::{Span, TokenStream};
use syn::{Generics, Ident, Path};

/// Generate `auto_register` implementation
#[cfg(feature = "auto_register")]
pub(crate) fn get_auto_register_impl(
    vc_serial_path: &Path,
    ident: &Ident,
    generics: &Generics,
    span: Option<Span>,
) -> TokenStream {
    let Some(span) = span else {
        return TokenStream::new();
    };

    // Invalid for generic types.
    if !generics.params.is_empty() {
        return TokenStream::new();
    }

    let macro_exports_ = crate::path::macro_exports_(vc_serial_path);
    quote::quote_spanned! { span =>
        #macro_exports_::inventory::submit! {
            #macro_exports_::AutoRegistration::of::<#ident>()
        }
    }
}

/// Generate `auto_register` implementation
#[cfg(not(feature = "auto_register"))]
pub(crate) fn get_auto_register_impl(
    _: &Path,
    _: &Ident,
    _: &Generics,
    _: Option<Span>,
) -> TokenStream {
    TokenStream::new()
}
