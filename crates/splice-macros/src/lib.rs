//! Derive macros for the splice kernel framework.
//!
//! This crate provides `#[derive(ParameterAddress)]`, which turns a fieldless
//! enum into the closed set of parameter addresses a kernel understands.
//!
//! # Example
//!
//! ```ignore
//! use splice::prelude::*;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, ParameterAddress)]
//! pub enum GainAddress {
//!     #[address = 0]
//!     Gain,
//! }
//! ```

use proc_macro::TokenStream;

mod parameter_address;

/// Derive macro for the `ParameterAddress` trait.
///
/// # Attributes
///
/// - `#[address = N]` - Host address of the variant. Defaults to the
///   variant's position. Addresses must be unique.
/// - `#[identifier = "..."]` - Stable string identifier. Defaults to the
///   variant name in lowerCamelCase (`MidiNoteNumber` -> `"midiNoteNumber"`).
///
/// Only fieldless enums are supported.
#[proc_macro_derive(ParameterAddress, attributes(address, identifier))]
pub fn derive_parameter_address(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);

    match parameter_address::derive_parameter_address_impl(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
