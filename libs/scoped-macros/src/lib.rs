//! # scoped-macros
//!
//! `#[derive(Scoped)]` generates the field descriptor table and the
//! `ScopedRecord`, `AsRecord` and `Projectable` impls consumed by the `scoped`
//! projector. Use it through the `scoped` crate re-export.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use proc_macro::TokenStream;
use proc_macro_error2::proc_macro_error;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod scoped_record;

/// Derive scope-aware projection for a struct with named fields.
///
/// Field attributes:
/// - `#[scoped(rename = "key")]` output key (`"-"` hides the field)
/// - `#[scoped(skip)]` never serialize the field
/// - `#[scoped(omit_empty)]` drop the field when its value is empty
/// - `#[scoped(scopes("user", "admin"))]` or `#[scoped(scopes = "user,admin")]`
///   restrict the field to the listed scopes
///
/// `#[serde(rename = "..")]`, `#[serde(skip)]`, `#[serde(skip_serializing)]`,
/// `#[serde(serialize_with = "..")]`, `#[serde(with = "..")]` and the
/// container-level `#[serde(rename_all = "..")]` are honored so keys and
/// values agree with the type's serde form. A `scoped` attribute wins
/// over the matching `serde` one.
///
/// # Example
///
/// ```ignore
/// use scoped::Scoped;
///
/// #[derive(serde::Serialize, Scoped)]
/// pub struct Example {
///     pub id: i64,
///     #[scoped(scopes("admin"))]
///     pub admin_only: String,
///     #[scoped(omit_empty, scopes("user", "admin"))]
///     pub both: String,
///     #[serde(skip)]
///     pub hidden: String,
/// }
/// ```
#[proc_macro_derive(Scoped, attributes(scoped))]
#[proc_macro_error]
pub fn derive_scoped(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    scoped_record::expand_derive_scoped(&input).into()
}
