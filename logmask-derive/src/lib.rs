//! Derive macros for `logmask`.
//!
//! This crate generates the `MaskedFields` implementation behind
//! `#[derive(MaskedFields)]`. It:
//! - reads `#[masked]` / `#[masked(name = "...")]` field attributes
//! - honours `#[serde(rename = "...")]` so the listed name is the one that
//!   actually appears on the wire
//! - emits a `MaskedFields` impl with the collected names
//!
//! It does **not** compile patterns or validate names against the masking
//! grammars. That happens at runtime in `logmask::MaskingPipeline::new`.

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::redundant_pub_crate
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

#[allow(unused_extern_crates)]
extern crate proc_macro;

use proc_macro2::TokenStream;
use proc_macro_crate::{crate_name, FoundCrate};
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned, Data, DeriveInput, Fields, Result};

mod attrs;
use attrs::masked_field_name;

/// Derives `logmask::MaskedFields` for structs with named fields.
///
/// # Field Attributes
///
/// - **No annotation**: the field is not listed.
/// - `#[masked]`: the field is listed under its `#[serde(rename = "...")]`
///   name if present, otherwise under its identifier (`r#` prefix removed).
/// - `#[masked(name = "...")]`: the field is listed under the given name.
///
/// Enums, unions, tuple structs and unit structs are rejected at compile time,
/// as are unknown options, empty names and repeated `#[masked]` attributes.
#[proc_macro_derive(MaskedFields, attributes(masked))]
pub fn derive_masked_fields(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Returns the token stream to reference the logmask crate root.
///
/// Handles crate renaming (e.g., `masking = { package = "logmask", ... }`)
/// and internal usage (when the derive is used inside logmask itself).
fn crate_root() -> TokenStream {
    match crate_name("logmask") {
        Ok(FoundCrate::Itself) => quote! { crate },
        Ok(FoundCrate::Name(name)) => {
            let ident = format_ident!("{}", name);
            quote! { ::#ident }
        }
        Err(_) => quote! { ::logmask },
    }
}

fn expand(input: DeriveInput) -> Result<TokenStream> {
    let DeriveInput {
        ident,
        generics,
        data,
        ..
    } = input;

    let fields = match data {
        Data::Struct(data) => match data.fields {
            Fields::Named(fields) => fields.named,
            Fields::Unnamed(_) | Fields::Unit => {
                return Err(syn::Error::new(
                    ident.span(),
                    "`MaskedFields` can only be derived for structs with named fields",
                ));
            }
        },
        Data::Enum(data) => {
            return Err(syn::Error::new(
                data.enum_token.span(),
                "`MaskedFields` cannot be derived for enums",
            ));
        }
        Data::Union(data) => {
            return Err(syn::Error::new(
                data.union_token.span(),
                "`MaskedFields` cannot be derived for unions",
            ));
        }
    };

    let mut names: Vec<String> = Vec::new();
    for field in &fields {
        if let Some(name) = masked_field_name(field)? {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }

    let crate_root = crate_root();
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics #crate_root::MaskedFields for #ident #ty_generics #where_clause {
            const MASKED_FIELDS: &'static [&'static str] = &[#(#names),*];
        }
    })
}
