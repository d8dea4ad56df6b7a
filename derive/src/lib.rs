//! Derive support for `fieldmap`. See [`Mappable`].

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static FIELDMAP_ATTRIBUTE_NAME: &str = "fieldmap";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;

// -----------------------------------------------------------------------------
// Macros

/// Makes a struct mappable by generating its accessor table.
///
/// `#[derive(Mappable)]` implements `Fields` and `Mappable` for a struct
/// with named fields. The generated `field_table()` builds one accessor per
/// field, in declaration order, and caches the table in a static cell (keyed
/// by `TypeId` when the struct is generic).
///
/// Every mapped field must be `Clone + Send + Sync + 'static`; for generic
/// structs these bounds are added to the type parameters.
///
/// ## Skipping fields
///
/// `#[fieldmap(skip)]` omits a field from the table entirely: it never
/// copies in either direction and never shows up in record snapshots.
///
/// ```rust, ignore
/// #[derive(Mappable)]
/// struct Session {
///     user: String,
///     #[fieldmap(skip)]
///     secret: Vec<u8>,
/// }
/// ```
///
/// ## Limitations
///
/// Mapping is flat and name-based, so enums, tuple structs, and unit
/// structs are rejected at compile time: they have no named fields to
/// match on.
#[proc_macro_derive(Mappable, attributes(fieldmap))]
pub fn derive_mappable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_data::MappableStruct::parse(&input) {
        Ok(data) => impls::impl_mappable(&data).into(),
        Err(error) => error.into_compile_error().into(),
    }
}
