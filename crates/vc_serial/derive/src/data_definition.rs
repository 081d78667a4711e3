use std::collections::BTreeSet;

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Generics, LitStr, parse_quote};

use crate::attributes::{FieldAttributes, TypeAttributes};
use crate::auto_register::get_auto_register_impl;
use crate::path;

/// Adds `Serializable` to every type parameter.
fn add_bounds(generics: &Generics, vc_serial_path: &syn::Path) -> Generics {
    let mut generics = generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(#vc_serial_path::Serializable));
    }
    generics
}

pub(crate) fn impl_data_definition(ast: &DeriveInput) -> syn::Result<TokenStream> {
    let fields = match &ast.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    &ast.ident,
                    "`DataDefinition` requires named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &ast.ident,
                "`DataDefinition` can only be derived for structs",
            ));
        }
    };

    let type_attrs = TypeAttributes::parse_attrs(&ast.attrs)?;
    let vc_serial_path = path::vc_serial();

    let mut keys = BTreeSet::new();
    let mut entries = Vec::with_capacity(fields.len());

    for field in fields {
        let attrs = FieldAttributes::parse_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }

        // Named fields always carry an ident.
        let Some(member) = &field.ident else {
            continue;
        };
        let key = attrs
            .key
            .unwrap_or_else(|| LitStr::new(&member.unraw().to_string(), member.span()));
        if !keys.insert(key.value()) {
            return Err(syn::Error::new_spanned(
                &key,
                format!("duplicate field key `{}`", key.value()),
            ));
        }

        let ty = &field.ty;
        let required = attrs.required.then(|| quote!(.required()));
        let always_write = attrs.always_write.then(|| quote!(.always_write()));
        let by_reference = attrs.by_ref.then(|| quote!(.by_reference()));
        let compare_eq = (!attrs.no_eq).then(|| quote!(.compare_eq()));

        entries.push(quote! {
            .field_with::<#ty>(
                #key,
                |value| &value.#member,
                |value| &mut value.#member,
                |field| field #required #always_write #by_reference #compare_eq,
            )
        });
    }

    let builder = match (&type_attrs.constructor, type_attrs.no_default) {
        (Some(constructor), _) => quote! {
            #vc_serial_path::DefinitionBuilder::<Self>::new().constructor(#constructor)
        },
        (None, Some(_)) => quote! { #vc_serial_path::DefinitionBuilder::<Self>::new() },
        (None, None) => quote! { #vc_serial_path::DefinitionBuilder::<Self>::with_default() },
    };
    let hook = type_attrs.hook.as_ref().map(|hook| quote!(.after_read(#hook)));

    let ident = &ast.ident;
    let generics = add_bounds(&ast.generics, &vc_serial_path);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let auto_register = get_auto_register_impl(
        &vc_serial_path,
        ident,
        &ast.generics,
        type_attrs.auto_register,
    );

    Ok(quote! {
        impl #impl_generics #vc_serial_path::Describe for #ident #ty_generics #where_clause {
            fn describe() -> #vc_serial_path::DefinitionBuilder<Self> {
                #builder
                    #(#entries)*
                    #hook
            }
        }

        impl #impl_generics #vc_serial_path::Serializable for #ident #ty_generics #where_clause {
            fn serializers() -> #vc_serial_path::TypeSerializers<Self> {
                #vc_serial_path::TypeSerializers::from_definition(
                    <Self as #vc_serial_path::Describe>::describe().build(),
                )
            }
        }

        #auto_register
    })
}
