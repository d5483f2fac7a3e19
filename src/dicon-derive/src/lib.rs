mod attrs;
mod impls;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use syn::{DeriveInput, Result as SynResult};

/// Implements `Component` for the type of an `impl` block.
///
/// Inside the block, `#[inject]` marks constructors (associated functions)
/// and injection methods (functions taking `self`). Parameters may carry
/// `#[named(..)]` or `#[qualified(..)]`, and `#[overrides]` marks a method
/// replacing one of a base component. An untagged zero-argument `new` is
/// used when no constructor is tagged. Write `#[component(abstract)]` for a
/// type that must never be instantiated.
///
/// The type must also derive `Inject`.
#[proc_macro_attribute]
pub fn component(attr: TokenStream, item: TokenStream) -> TokenStream {
    match component_impl(attr, item) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Implements `Fields` for a struct with named fields.
///
/// `#[inject]` marks an injected field, `#[inject(read_only)]` one that must
/// not be reassigned, and `#[extends]` the field holding the embedded base
/// component. Fields of type `Lazy<T>` are injected lazily.
#[proc_macro_derive(Inject, attributes(inject, extends, named, qualified))]
pub fn derive_inject(input: TokenStream) -> TokenStream {
    match derive_inject_impl(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

fn component_impl(attr: TokenStream, item: TokenStream) -> SynResult<TokenStream2> {
    let attr_data = attrs::parse_attributes(attr)?;
    let expanded = impls::expand_implementation(item, attr_data)?;
    Ok(expanded)
}

fn derive_inject_impl(input: TokenStream) -> SynResult<TokenStream2> {
    let input = syn::parse::<DeriveInput>(input)?;
    impls::expand_fields(input)
}
