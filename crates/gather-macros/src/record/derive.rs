//! Implementation of the `#[derive(Record)]` macro.
//!
//! This macro generates implementations of the `Record` and `RecordSchema`
//! traits and attribute name constants for type-safe query building.

use proc_macro2::{Literal, TokenStream};
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use super::attrs::{parse_gather_attrs, FieldKind};

/// Main implementation of the Record derive macro.
pub fn record_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    // Ensure we have a struct with named fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Record can only be derived for structs",
            ))
        }
    };

    let mut own_attributes: Vec<TokenStream> = Vec::new();
    let mut inherited_attributes: Vec<TokenStream> = Vec::new();
    let mut read_arms: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let gather_attrs = parse_gather_attrs(&field.attrs)?;

        // Skip if marked with #[gather(skip)]
        if gather_attrs.skip {
            continue;
        }

        let slot = Literal::usize_unsuffixed(index);

        if gather_attrs.kind == FieldKind::Parent {
            let parent_ty = &field.ty;
            inherited_attributes.push(quote! {
                attributes.extend(
                    <#parent_ty as ::gather::RecordSchema>::schema()
                        .into_iter()
                        .map(|attribute| attribute.inherited(#slot)),
                );
            });
            read_arms.push(quote! {
                [#slot, rest @ ..] => ::gather::Record::read(&self.#field_name, rest),
            });
            continue;
        }

        // Determine the query attribute name
        let query_name = gather_attrs
            .rename
            .unwrap_or_else(|| field_name.to_string());

        // Generate constant name (SCREAMING_SNAKE_CASE)
        let const_name = format_ident!("{}", to_screaming_snake_case(&query_name));

        field_constants.push(quote! {
            /// Attribute name constant for type-safe queries.
            pub const #const_name: &'static str = #query_name;
        });

        let value_expr = match gather_attrs.kind {
            FieldKind::Nested => {
                quote! { ::gather::Value::from_record(&self.#field_name) }
            }
            FieldKind::Enumeration => {
                quote! { ::gather::Value::Enum(::gather::EnumValue::of(&self.#field_name)) }
            }
            FieldKind::Value | FieldKind::Parent => {
                quote! { ::gather::AsValue::as_value(&self.#field_name) }
            }
        };

        own_attributes.push(quote! {
            ::gather::Attribute::field(#query_name, #slot)
        });
        read_arms.push(quote! {
            [#slot] => ::core::option::Option::Some(#value_expr),
        });
    }

    // Generate the impl blocks
    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*
        }

        impl #impl_generics ::gather::RecordSchema for #struct_name #ty_generics #where_clause {
            fn schema() -> ::std::vec::Vec<::gather::Attribute> {
                #[allow(unused_mut)]
                let mut attributes = ::std::vec![#(#own_attributes),*];
                #(#inherited_attributes)*
                attributes
            }
        }

        impl #impl_generics ::gather::Record for #struct_name #ty_generics #where_clause {
            fn attributes(&self) -> ::std::vec::Vec<::gather::Attribute> {
                <Self as ::gather::RecordSchema>::schema()
            }

            fn read(&self, location: &[usize]) -> ::core::option::Option<::gather::Value<'_>> {
                match location {
                    #(#read_arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    };

    Ok(expanded)
}

/// Convert a string to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = true;
        }
    }

    result
}
