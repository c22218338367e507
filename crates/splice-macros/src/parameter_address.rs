//! Derive macro for the `ParameterAddress` trait.
//!
//! This module implements `#[derive(ParameterAddress)]`, which turns a
//! fieldless enum into a kernel's closed set of parameter addresses.
//!
//! # Example
//!
//! ```ignore
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, ParameterAddress)]
//! pub enum NoteGateAddress {
//!     #[address = 0]
//!     SendNote,               // identifier "sendNote"
//!     #[address = 1]
//!     #[identifier = "midiNoteNumber"]
//!     NoteNumber,
//! }
//! ```

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields};

/// Information about a single enum variant.
struct VariantInfo {
    /// The variant identifier (e.g., `SendNote`)
    ident: syn::Ident,
    /// Host address (from `#[address = N]` or the variant's position)
    address: u64,
    /// Stable identifier (from `#[identifier = "..."]` or lowerCamelCase ident)
    identifier: String,
}

/// Parse and generate the ParameterAddress implementation for an enum.
pub fn derive_parameter_address_impl(input: DeriveInput) -> syn::Result<TokenStream> {
    let data_enum = match &input.data {
        Data::Enum(e) => e,
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "#[derive(ParameterAddress)] only supports enums",
            ))
        }
    };

    let mut variants: Vec<VariantInfo> = Vec::new();
    for (position, variant) in data_enum.variants.iter().enumerate() {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "#[derive(ParameterAddress)] only supports unit variants (no fields)",
            ));
        }

        let address = match extract_address_attribute(&variant.attrs)? {
            Some(address) => address,
            None => position as u64,
        };

        if let Some(existing) = variants.iter().find(|v| v.address == address) {
            return Err(syn::Error::new_spanned(
                variant,
                format!(
                    "duplicate parameter address {} (already used by `{}`)",
                    address, existing.ident
                ),
            ));
        }

        let identifier = extract_identifier_attribute(&variant.attrs)?
            .unwrap_or_else(|| lower_camel_case(&variant.ident.to_string()));

        variants.push(VariantInfo {
            ident: variant.ident.clone(),
            address,
            identifier,
        });
    }

    if variants.is_empty() {
        return Err(syn::Error::new_spanned(
            &input,
            "#[derive(ParameterAddress)] requires at least one variant",
        ));
    }

    let enum_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let count = variants.len();

    let idents: Vec<&syn::Ident> = variants.iter().map(|v| &v.ident).collect();

    let from_raw_arms = variants.iter().map(|v| {
        let ident = &v.ident;
        let address = v.address;
        quote! { #address => Some(#enum_name::#ident), }
    });

    let raw_arms = variants.iter().map(|v| {
        let ident = &v.ident;
        let address = v.address;
        quote! { #enum_name::#ident => #address, }
    });

    let index_arms = variants.iter().enumerate().map(|(idx, v)| {
        let ident = &v.ident;
        quote! { #enum_name::#ident => #idx, }
    });

    let identifier_arms = variants.iter().map(|v| {
        let ident = &v.ident;
        let identifier = &v.identifier;
        quote! { #enum_name::#ident => #identifier, }
    });

    Ok(quote! {
        impl #impl_generics ::splice::core::ParameterAddress for #enum_name #ty_generics #where_clause {
            const COUNT: usize = #count;
            const ALL: &'static [Self] = &[#(#enum_name::#idents),*];

            fn from_raw(raw: ::splice::core::RawAddress) -> Option<Self> {
                match raw {
                    #(#from_raw_arms)*
                    _ => None,
                }
            }

            fn raw(self) -> ::splice::core::RawAddress {
                match self {
                    #(#raw_arms)*
                }
            }

            fn index(self) -> usize {
                match self {
                    #(#index_arms)*
                }
            }

            fn identifier(self) -> &'static str {
                match self {
                    #(#identifier_arms)*
                }
            }
        }
    })
}

/// Extract the host address from an `#[address = N]` attribute.
fn extract_address_attribute(attrs: &[syn::Attribute]) -> syn::Result<Option<u64>> {
    for attr in attrs {
        if attr.path().is_ident("address") {
            let name_value = attr.meta.require_name_value()?;
            if let syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Int(lit_int),
                ..
            }) = &name_value.value
            {
                return Ok(Some(lit_int.base10_parse::<u64>()?));
            }
            return Err(syn::Error::new_spanned(
                attr,
                "expected #[address = N] with an integer literal",
            ));
        }
    }
    Ok(None)
}

/// Extract the identifier from an `#[identifier = "..."]` attribute.
fn extract_identifier_attribute(attrs: &[syn::Attribute]) -> syn::Result<Option<String>> {
    for attr in attrs {
        if attr.path().is_ident("identifier") {
            let name_value = attr.meta.require_name_value()?;
            if let syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(lit_str),
                ..
            }) = &name_value.value
            {
                let value = lit_str.value();
                if value.is_empty() {
                    return Err(syn::Error::new_spanned(
                        attr,
                        "parameter identifier cannot be empty",
                    ));
                }
                return Ok(Some(value));
            }
            return Err(syn::Error::new_spanned(
                attr,
                "expected #[identifier = \"...\"] with a string literal",
            ));
        }
    }
    Ok(None)
}

/// `MidiNoteNumber` -> `midiNoteNumber`.
fn lower_camel_case(ident: &str) -> String {
    let mut chars = ident.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lower_camel_case() {
        assert_eq!(lower_camel_case("MidiNoteNumber"), "midiNoteNumber");
        assert_eq!(lower_camel_case("Gain"), "gain");
    }

    #[test]
    fn test_generates_impl() {
        let input: DeriveInput = syn::parse_quote! {
            enum Address {
                #[address = 3]
                Level,
                Mix,
            }
        };
        let tokens = derive_parameter_address_impl(input).unwrap().to_string();
        assert!(tokens.contains("ParameterAddress for Address"));
        assert!(tokens.contains("\"level\""));
        assert!(tokens.contains("3u64"));
        assert!(tokens.contains("1u64"));
        assert!(tokens.contains("\"mix\""));
    }

    #[test]
    fn test_rejects_duplicate_address() {
        let input: DeriveInput = syn::parse_quote! {
            enum Address {
                #[address = 1]
                A,
                B,
            }
        };
        let err = derive_parameter_address_impl(input).unwrap_err();
        assert!(err.to_string().contains("duplicate parameter address 1"));
    }

    #[test]
    fn test_rejects_fields() {
        let input: DeriveInput = syn::parse_quote! {
            enum Address {
                Level(f32),
            }
        };
        assert!(derive_parameter_address_impl(input).is_err());
    }
}
