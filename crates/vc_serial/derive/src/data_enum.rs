use std::collections::BTreeSet;

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, LitStr};

use crate::attributes::{TypeAttributes, VariantAttributes};
use crate::auto_register::get_auto_register_impl;
use crate::path;

pub(crate) fn impl_data_enum(ast: &DeriveInput) -> syn::Result<TokenStream> {
    let Data::Enum(data) = &ast.data else {
        return Err(syn::Error::new_spanned(
            &ast.ident,
            "`DataEnum` can only be derived for enums",
        ));
    };
    if !ast.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &ast.generics,
            "`DataEnum` does not support generic enums",
        ));
    }

    let type_attrs = TypeAttributes::parse_attrs(&ast.attrs)?;
    if type_attrs.hook.is_some() || type_attrs.constructor.is_some() {
        return Err(syn::Error::new_spanned(
            &ast.ident,
            "`DataEnum` only accepts `auto_register`",
        ));
    }

    let mut names = BTreeSet::new();
    let mut variants = Vec::with_capacity(data.variants.len());
    let mut arms = Vec::with_capacity(data.variants.len());

    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "`DataEnum` requires unit variants",
            ));
        }

        let attrs = VariantAttributes::parse_attrs(&variant.attrs)?;
        let ident = &variant.ident;
        let name = attrs
            .rename
            .unwrap_or_else(|| LitStr::new(&ident.unraw().to_string(), ident.span()));
        if !names.insert(name.value()) {
            return Err(syn::Error::new_spanned(
                &name,
                format!("duplicate variant name `{}`", name.value()),
            ));
        }

        variants.push(quote! { (#name, Self::#ident) });
        arms.push(quote! { Self::#ident => #name });
    }

    let ident = &ast.ident;
    let vc_serial_path = path::vc_serial();
    let auto_register = get_auto_register_impl(
        &vc_serial_path,
        ident,
        &ast.generics,
        type_attrs.auto_register,
    );

    Ok(quote! {
        impl #vc_serial_path::DataEnum for #ident {
            const VARIANTS: &'static [(&'static str, Self)] = &[#(#variants),*];

            fn name(self) -> &'static str {
                match self {
                    #(#arms,)*
                }
            }
        }

        impl #vc_serial_path::Serializable for #ident {
            #[inline]
            fn serializers() -> #vc_serial_path::TypeSerializers<Self> {
                #vc_serial_path::enum_serializers::<Self>()
            }
        }

        #auto_register
    })
}
