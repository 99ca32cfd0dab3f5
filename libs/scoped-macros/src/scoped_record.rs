use proc_macro2::{Literal, TokenStream};
use proc_macro_error2::{abort, emit_error};
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{Data, DeriveInput, Field, Fields, Token, parse_quote};

use crate::attrs::{ContainerAttrs, ScopedField};

fn named_fields(input: &DeriveInput) -> syn::Result<&Punctuated<Field, Token![,]>> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(&fields.named),
            _ => Err(syn::Error::new_spanned(
                input,
                "#[derive(Scoped)] requires a struct with named fields",
            )),
        },
        _ => Err(syn::Error::new_spanned(
            input,
            "#[derive(Scoped)] can only be applied to structs",
        )),
    }
}

pub fn expand_derive_scoped(input: &DeriveInput) -> TokenStream {
    let fields = match named_fields(input) {
        Ok(fields) => fields,
        Err(e) => abort!(e.span(), "{}", e),
    };

    let container = ContainerAttrs::parse(&input.attrs);

    let mut scoped_fields = Vec::with_capacity(fields.len());
    for field in fields {
        match ScopedField::parse(field, &container) {
            Ok(parsed) => scoped_fields.push(parsed),
            Err(e) => emit_error!(e.span(), "{}", e),
        }
    }
    if scoped_fields.len() != fields.len() {
        return quote! {};
    }

    let name = &input.ident;

    let specs = scoped_fields.iter().map(|f| {
        let field_name = f.ident.to_string();
        let Some(key) = &f.key else {
            return quote! { ::scoped::FieldSpec::hidden(#field_name) };
        };
        let mut spec = quote! { ::scoped::FieldSpec::new(#field_name, #key) };
        if f.omit_empty {
            spec = quote! { #spec.omit_empty() };
        }
        if !f.scopes.is_empty() {
            let scopes = &f.scopes;
            spec = quote! { #spec.scopes(&[#(#scopes),*]) };
        }
        spec
    });

    let value_arms = scoped_fields
        .iter()
        .enumerate()
        .filter(|(_, f)| f.key.is_some())
        .map(|(index, f)| {
            let index = Literal::usize_unsuffixed(index);
            let ident = &f.ident;
            match &f.serialize_with {
                Some(path) => quote! {
                    #index => #path(&self.#ident, ::scoped::__private::ValueSerializer)
                        .map_err(::scoped::ScopeError::from)
                },
                None => quote! { #index => ::scoped::__private::to_value(&self.#ident) },
            }
        });

    // Generic field types must be serializable; hidden fields and fields with
    // their own serializer carry no bound.
    let mut generics = input.generics.clone();
    if generics.type_params().next().is_some() {
        let where_clause = generics.make_where_clause();
        for f in scoped_fields
            .iter()
            .filter(|f| f.key.is_some() && f.serialize_with.is_none())
        {
            let ty = &f.ty;
            where_clause
                .predicates
                .push(parse_quote!(#ty: ::scoped::__private::Serialize));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    quote! {
        impl #impl_generics ::scoped::ScopedRecord for #name #ty_generics #where_clause {
            fn field_specs() -> &'static [::scoped::FieldSpec] {
                const FIELDS: &[::scoped::FieldSpec] = &[#(#specs),*];
                FIELDS
            }

            fn field_value(
                &self,
                index: usize,
            ) -> ::core::result::Result<::scoped::__private::Value, ::scoped::ScopeError> {
                match index {
                    #(#value_arms,)*
                    _ => ::core::result::Result::Err(::scoped::ScopeError::no_field::<Self>(index)),
                }
            }
        }

        impl #impl_generics ::scoped::AsRecord for #name #ty_generics #where_clause {
            type Record = Self;

            fn as_record(&self) -> ::core::option::Option<&Self> {
                ::core::option::Option::Some(self)
            }
        }

        impl #impl_generics ::scoped::Projectable for #name #ty_generics #where_clause {
            fn project_scoped(
                &self,
                scope: &str,
            ) -> ::core::result::Result<::scoped::Projection, ::scoped::ScopeError> {
                ::scoped::record::project_record(self, scope)
            }
        }
    }
}
