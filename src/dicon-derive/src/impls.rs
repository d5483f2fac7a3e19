use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::spanned::Spanned;
use syn::visit_mut::{self, VisitMut};
use syn::{
    Attribute, Data, DeriveInput, Error as SynError, Fields, FnArg, GenericArgument, GenericParam,
    Ident, ImplItem, ImplItemFn, ItemImpl, LitStr, PatType, PathArguments, Result as SynResult,
    ReturnType, Signature, Type,
};

use crate::attrs::{self, AttributeData};

#[derive(Debug)]
enum MemberData {
    Constructor {
        identifier: Ident,
        sites: Vec<TokenStream2>,
        return_type: ReturnTypeData,
    },
    DefaultConstructor {
        identifier: Ident,
    },
    InjectMethod {
        identifier: Ident,
        sites: Vec<TokenStream2>,
        return_type: ReturnTypeData,
        overriding: bool,
    },
    GenericMethod {
        identifier: Ident,
        overriding: bool,
    },
    PlainMethod {
        identifier: Ident,
    },
}

#[derive(Debug)]
enum ReturnTypeData {
    Infallible,
    Result,
}

struct AttributeRemovalVisitor;

impl VisitMut for AttributeRemovalVisitor {
    fn visit_impl_item_fn_mut(&mut self, item: &mut ImplItemFn) {
        item.attrs.retain(|attr| !attrs::is_custom_attribute(attr));
        visit_mut::visit_impl_item_fn_mut(self, item);
    }

    fn visit_pat_type_mut(&mut self, pat: &mut PatType) {
        pat.attrs.retain(|attr| !attrs::is_custom_attribute(attr));
        visit_mut::visit_pat_type_mut(self, pat);
    }
}

pub fn expand_implementation(
    impls: TokenStream,
    attr_data: AttributeData,
) -> SynResult<TokenStream2> {
    let mut impls = match syn::parse::<ItemImpl>(impls) {
        Ok(impls) => impls,
        Err(err) => {
            return Err(SynError::new(
                err.span(),
                "`#[component]` should be annotated on the `impl` block",
            ))
        }
    };

    if let Some((_, path, _)) = &impls.trait_ {
        return Err(SynError::new(
            path.span(),
            "`#[component]` should be annotated on an inherent `impl` block",
        ));
    }

    let members = impls
        .items
        .iter()
        .filter_map(filter_and_map_item_fn)
        .map(parse_member)
        .filter_map(Result::transpose)
        .collect::<SynResult<Vec<_>>>()?;

    let expanded = expand_component_implementation(&impls, &members, &attr_data);

    let mut visitor = AttributeRemovalVisitor;
    visitor.visit_item_impl_mut(&mut impls);

    Ok(quote! {
        #impls
        #expanded
    })
}

fn filter_and_map_item_fn(item: &ImplItem) -> Option<&ImplItemFn> {
    if let ImplItem::Fn(impl_fn) = item {
        Some(impl_fn)
    } else {
        None
    }
}

fn parse_member(item_fn: &ImplItemFn) -> SynResult<Option<MemberData>> {
    let inject = attrs::has_attribute(&item_fn.attrs, "inject");
    let overriding = attrs::has_attribute(&item_fn.attrs, "overrides");
    let signature = &item_fn.sig;
    let identifier = signature.ident.clone();

    let Some(receiver) = signature.receiver() else {
        if overriding {
            return Err(SynError::new(
                signature.span(),
                "only methods can be annotated with `#[overrides]`",
            ));
        }
        if inject {
            return Ok(Some(MemberData::Constructor {
                identifier,
                sites: parse_sites(signature)?,
                return_type: parse_constructor_return_type(&signature.output)?,
            }));
        }
        if is_default_constructor(signature) {
            return Ok(Some(MemberData::DefaultConstructor { identifier }));
        }
        return Ok(None);
    };

    if !inject {
        return Ok(overriding.then_some(MemberData::PlainMethod { identifier }));
    }

    if is_generic(signature) {
        return Ok(Some(MemberData::GenericMethod {
            identifier,
            overriding,
        }));
    }

    if receiver.reference.is_none() {
        return Err(SynError::new(
            receiver.span(),
            "an injection method should take `&mut self` or `&self`",
        ));
    }

    Ok(Some(MemberData::InjectMethod {
        identifier,
        sites: parse_sites(signature)?,
        return_type: parse_method_return_type(&signature.output),
        overriding,
    }))
}

fn is_generic(signature: &Signature) -> bool {
    signature
        .generics
        .params
        .iter()
        .any(|param| !matches!(param, GenericParam::Lifetime(_)))
}

fn is_default_constructor(signature: &Signature) -> bool {
    signature.ident == "new"
        && signature.inputs.is_empty()
        && signature.generics.params.is_empty()
        && !matches!(signature.output, ReturnType::Default)
        && !is_result(&signature.output)
}

fn parse_sites(signature: &Signature) -> SynResult<Vec<TokenStream2>> {
    signature
        .inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(arg) => Some(arg),
            FnArg::Receiver(_) => None,
        })
        .map(|arg| expand_site(&arg.ty, &arg.attrs))
        .collect()
}

/// Builds the `Site` expression for a value of type `ty`.
fn expand_site(ty: &Type, attrs: &[Attribute]) -> SynResult<TokenStream2> {
    let qualifiers = attrs::parse_qualifiers(attrs)?;
    let site = match lazy_target(ty) {
        Some(target) => quote! { ::dicon::key::Site::lazy::<#target>() },
        None => quote! { ::dicon::key::Site::of::<#ty>() },
    };
    Ok(quote! { #site #(#qualifiers)* })
}

fn lazy_target(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Lazy" {
        return None;
    }
    let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
        return None;
    };
    match arguments.args.iter().collect::<Vec<_>>().as_slice() {
        [GenericArgument::Type(target)] => Some(target),
        _ => None,
    }
}

fn is_result(output: &ReturnType) -> bool {
    let ReturnType::Type(_, ty) = output else {
        return false;
    };
    let Type::Path(path) = ty.as_ref() else {
        return false;
    };
    path.path
        .segments
        .last()
        .is_some_and(|segment| segment.ident == "Result")
}

fn parse_constructor_return_type(output: &ReturnType) -> SynResult<ReturnTypeData> {
    if let ReturnType::Default = output {
        return Err(SynError::new(
            output.span(),
            "a constructor's return type should be `Self` or `Result<Self, E>`",
        ));
    }
    Ok(parse_method_return_type(output))
}

fn parse_method_return_type(output: &ReturnType) -> ReturnTypeData {
    if is_result(output) {
        ReturnTypeData::Result
    } else {
        ReturnTypeData::Infallible
    }
}

fn expand_component_implementation(
    impls: &ItemImpl,
    members: &[MemberData],
    attr_data: &AttributeData,
) -> TokenStream2 {
    let self_type = &impls.self_ty;
    let (impl_generics, _, where_clause) = impls.generics.split_for_impl();

    let abstract_type = match attr_data {
        AttributeData::Abstract => quote! { .abstract_type() },
        AttributeData::Concrete => quote! {},
    };

    let members = members.iter().map(expand_member);

    quote! {
        impl #impl_generics ::dicon::provider::component::Component for #self_type #where_clause {
            fn descriptor() -> ::dicon::provider::component::Descriptor<Self> {
                <Self as ::dicon::provider::component::Fields>::fields(
                    ::dicon::provider::component::Descriptor::new()
                )
                #abstract_type
                #(#members)*
            }
        }
    }
}

fn expand_member(member: &MemberData) -> TokenStream2 {
    match member {
        MemberData::Constructor {
            identifier,
            sites,
            return_type,
        } => {
            let arguments = arguments_parameter(sites);
            let takes = sites.iter().map(|_| quote! { arguments.take()? });
            let call = quote! { Self::#identifier(#(#takes),*) };
            let body = match return_type {
                ReturnTypeData::Infallible => quote! { ::std::result::Result::Ok(#call) },
                ReturnTypeData::Result => quote! { #call.map_err(::std::convert::Into::into) },
            };
            quote! {
                .constructor(::dicon::provider::component::Constructor::inject(
                    [#(#sites),*],
                    |#arguments: &mut ::dicon::provider::component::Arguments| { #body },
                ))
            }
        }
        MemberData::DefaultConstructor { identifier } => quote! {
            .constructor(::dicon::provider::component::Constructor::default(Self::#identifier))
        },
        MemberData::InjectMethod {
            identifier,
            sites,
            return_type,
            overriding,
        } => {
            let name = LitStr::new(&identifier.to_string(), identifier.span());
            let arguments = arguments_parameter(sites);
            let takes = sites.iter().map(|_| quote! { arguments.take()? });
            let call = quote! { Self::#identifier(this, #(#takes),*) };
            let body = match return_type {
                ReturnTypeData::Infallible => quote! {
                    #call;
                    ::std::result::Result::Ok(())
                },
                ReturnTypeData::Result => quote! { #call.map_err(::std::convert::Into::into) },
            };
            let overriding = overriding.then(|| quote! { .overriding() });
            quote! {
                .method(::dicon::provider::component::Method::inject(
                    #name,
                    [#(#sites),*],
                    |this: &mut Self, #arguments: &mut ::dicon::provider::component::Arguments| {
                        #body
                    },
                ) #overriding)
            }
        }
        MemberData::GenericMethod {
            identifier,
            overriding,
        } => {
            let name = LitStr::new(&identifier.to_string(), identifier.span());
            let overriding = overriding.then(|| quote! { .overriding() });
            quote! {
                .method(::dicon::provider::component::Method::generic(#name) #overriding)
            }
        }
        MemberData::PlainMethod { identifier } => {
            let name = LitStr::new(&identifier.to_string(), identifier.span());
            quote! {
                .method(::dicon::provider::component::Method::plain(#name).overriding())
            }
        }
    }
}

fn arguments_parameter(sites: &[TokenStream2]) -> TokenStream2 {
    if sites.is_empty() {
        quote! { _ }
    } else {
        quote! { arguments }
    }
}

pub fn expand_fields(input: DeriveInput) -> SynResult<TokenStream2> {
    let Data::Struct(data) = &input.data else {
        return Err(SynError::new(
            input.span(),
            "`#[derive(Inject)]` only supports structs",
        ));
    };

    let fields = match &data.fields {
        Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
        Fields::Unit => Vec::new(),
        Fields::Unnamed(unnamed) => {
            return Err(SynError::new(
                unnamed.span(),
                "`#[derive(Inject)]` only supports structs with named fields",
            ))
        }
    };

    let mut calls = Vec::new();
    for field in fields {
        let Some(identifier) = &field.ident else {
            continue;
        };
        let ty = &field.ty;
        let extends = attrs::has_attribute(&field.attrs, "extends");
        let inject = attrs::has_attribute(&field.attrs, "inject");

        if extends && inject {
            return Err(SynError::new(
                field.span(),
                "a field can't be annotated with both `#[extends]` and `#[inject]`",
            ));
        }

        if extends {
            calls.push(quote! {
                .extends::<#ty>(|this: &mut Self| &mut this.#identifier)
            });
        } else if inject {
            let name = LitStr::new(&identifier.to_string(), identifier.span());
            let site = expand_site(ty, &field.attrs)?;
            let read_only = attrs::is_read_only(&field.attrs)?.then(|| quote! { .read_only() });
            calls.push(quote! {
                .field(::dicon::provider::component::Field::inject::<#ty>(
                    #name,
                    #site,
                    |this: &mut Self, value: #ty| this.#identifier = value,
                ) #read_only)
            });
        }
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::dicon::provider::component::Fields for #name #ty_generics #where_clause {
            fn fields(
                descriptor: ::dicon::provider::component::Descriptor<Self>,
            ) -> ::dicon::provider::component::Descriptor<Self> {
                descriptor #(#calls)*
            }
        }
    })
}
