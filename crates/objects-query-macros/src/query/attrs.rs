//! Attribute parsing for the Queryable derive macro.
//!
//! This module provides the parser for the `#[query(...)]` field attributes.

use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Lit, Meta, Result, Token,
};

/// Field-level attributes from `#[query(...)]`.
#[derive(Debug, Clone, Default)]
pub struct QueryAttr {
    /// Leave this field out of queries.
    pub skip: bool,
    /// Custom field name for queries (default: field name).
    pub rename: Option<String>,
}

impl Parse for QueryAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = QueryAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) if p.is_ident("skip") => attr.skip = true,

                // rename = "custom_name"
                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    if let syn::Expr::Lit(syn::ExprLit {
                        lit: Lit::Str(s), ..
                    }) = &nv.value
                    {
                        let name = s.value();
                        if name.is_empty() {
                            return Err(Error::new(s.span(), "rename must not be empty"));
                        }
                        attr.rename = Some(name);
                    } else {
                        return Err(Error::new(
                            nv.value.span(),
                            "rename must be a string literal",
                        ));
                    }
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown query attribute. Expected: skip or rename = \"...\"",
                    ));
                }
            }
        }

        if attr.skip && attr.rename.is_some() {
            return Err(Error::new(
                input.span(),
                "skip and rename cannot be combined",
            ));
        }

        Ok(attr)
    }
}

/// Extract `#[query(...)]` attributes from a field's attributes.
pub fn parse_query_attrs(attrs: &[Attribute]) -> Result<QueryAttr> {
    for attr in attrs {
        if attr.path().is_ident("query") {
            return attr.parse_args::<QueryAttr>();
        }
    }
    Ok(QueryAttr::default())
}
