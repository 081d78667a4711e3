use proc_macro2::TokenStream;
use quote::quote;

/// Path to `vc_serial` as seen from the invoking crate.
#[inline]
pub(crate) fn vc_serial() -> syn::Path {
    vc_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("vc_serial"))
}

#[cfg_attr(not(feature = "auto_register"), expect(dead_code))]
#[inline(always)]
pub(crate) fn macro_exports_(vc_serial_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_serial_path::__macro_exports
    }
}
