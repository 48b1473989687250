use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr};

use crate::locator::find_key_field;

pub(crate) fn expand(input: DeriveInput) -> syn::Result<TokenStream> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => fields,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Entity can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Entity can only be derived for structs",
            ));
        }
    };

    let ident = &input.ident;
    let collection = match collection_override(&input)? {
        Some(name) => name,
        None => LitStr::new(&ident.to_string(), ident.span()),
    };

    let key = match find_key_field(fields)? {
        Some(field) => {
            let field = &field.ident;
            quote! { ::docmap::document::KeyValue::key_state(&self.#field) }
        }
        None => quote! { ::docmap::document::KeyState::Absent },
    };

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::docmap::document::Entity for #ident #ty_generics #where_clause {
            fn collection_name() -> &'static str {
                #collection
            }

            fn key(&self) -> ::docmap::document::KeyState {
                #key
            }
        }
    })
}

fn collection_override(input: &DeriveInput) -> syn::Result<Option<LitStr>> {
    let mut collection = None;

    for attr in &input.attrs {
        if !attr.path().is_ident("entity") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("collection") {
                collection = Some(meta.value()?.parse::<LitStr>()?);
                Ok(())
            } else {
                Err(meta.error("unsupported entity attribute, expected `collection`"))
            }
        })?;
    }

    Ok(collection)
}
