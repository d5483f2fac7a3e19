use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Attribute, Error as SynError, Ident, Meta, Result as SynResult};

#[derive(Debug)]
pub enum AttributeData {
    Concrete,
    Abstract,
}

pub fn parse_attributes(attr: TokenStream) -> SynResult<AttributeData> {
    if attr.is_empty() {
        return Ok(AttributeData::Concrete);
    }

    let attr = TokenStream2::from(attr);
    if attr.to_string().trim() == "abstract" {
        Ok(AttributeData::Abstract)
    } else {
        Err(SynError::new(
            attr.span(),
            "expects `#[component]` or `#[component(abstract)]`",
        ))
    }
}

/// The qualifier annotations found on a field or a parameter, in order.
///
/// Several annotations are accepted here and rejected when the component is
/// bound.
pub fn parse_qualifiers(attrs: &[Attribute]) -> SynResult<Vec<TokenStream2>> {
    let mut qualifiers = Vec::new();

    for attr in attrs {
        let name = if attr.path().is_ident("named") {
            "named"
        } else if attr.path().is_ident("qualified") {
            "qualified"
        } else {
            continue;
        };

        let Meta::List(list) = &attr.meta else {
            return Err(SynError::new(
                attr.span(),
                format!("expects `#[{name}(...)]` to receive a value"),
            ));
        };

        let value = &list.tokens;
        qualifiers.push(if name == "named" {
            quote! { .named(#value) }
        } else {
            quote! { .qualified(#value) }
        });
    }

    Ok(qualifiers)
}

pub fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}

/// Whether an `#[inject]` field is marked `#[inject(read_only)]`.
pub fn is_read_only(attrs: &[Attribute]) -> SynResult<bool> {
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("inject")) {
        match &attr.meta {
            Meta::Path(_) => {}
            Meta::List(list) => {
                let ident = syn::parse2::<Ident>(list.tokens.clone());
                match ident {
                    Ok(ident) if ident == "read_only" => return Ok(true),
                    _ => {
                        return Err(SynError::new(
                            list.span(),
                            "expects `#[inject]` or `#[inject(read_only)]`",
                        ))
                    }
                }
            }
            Meta::NameValue(nv) => {
                return Err(SynError::new(
                    nv.span(),
                    "expects `#[inject]` or `#[inject(read_only)]`",
                ))
            }
        }
    }
    Ok(false)
}

pub fn is_custom_attribute(attr: &Attribute) -> bool {
    ["inject", "overrides", "named", "qualified"]
        .iter()
        .any(|name| attr.path().is_ident(name))
}
