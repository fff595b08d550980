//! Implementation of the `#[derive(Queryable)]` macro.
//!
//! This macro generates an implementation of the `Queryable` trait and
//! field name constants for type-safe query building.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use super::attrs::parse_query_attrs;

/// Main implementation of the Queryable derive macro.
pub fn queryable_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    // Ensure we have a struct with named fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Queryable can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Queryable can only be derived for structs",
            ))
        }
    };

    let mut field_matches: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut seen: Vec<String> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let query_attrs = parse_query_attrs(&field.attrs)?;
        if query_attrs.skip {
            continue;
        }

        let query_name = query_attrs.rename.unwrap_or_else(|| field_name.to_string());
        if seen.contains(&query_name) {
            return Err(Error::new(
                field.span(),
                format!("duplicate query field name '{}'", query_name),
            ));
        }
        seen.push(query_name.clone());

        let const_name = format_ident!("{}", to_screaming_snake_case(&query_name));

        field_constants.push(quote! {
            /// Field name constant for type-safe queries.
            pub const #const_name: &'static str = #query_name;
        });

        field_matches.push(quote! {
            #query_name => ::core::option::Option::Some(
                ::objects_query::Value::from(::core::clone::Clone::clone(&self.#field_name))
            ),
        });
    }

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*
        }

        impl #impl_generics ::objects_query::Queryable for #struct_name #ty_generics #where_clause {
            fn field_value(&self, field: &str) -> ::core::option::Option<::objects_query::Value> {
                match field {
                    #(#field_matches)*
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
        } else if c == '_' || c == '-' || c == '.' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = true;
        }
    }

    result
}
