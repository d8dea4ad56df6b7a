//! Code generation for the `Mappable` derive.
//!
//! Emitted paths start with `fieldmap::`, which resolves both in user crates
//! and inside `fieldmap` itself (via its `extern crate self` alias).

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Generics, Ident, parse_quote};

use crate::derive_data::{MappableStruct, MappedField};

/// Generates the `Fields` and `Mappable` impls.
pub(crate) fn impl_mappable(data: &MappableStruct) -> TokenStream {
    let ident = data.ident();
    let is_generic = !data.generics().params.is_empty();

    let mut generics = data.generics().clone();
    add_field_bounds(&mut generics);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let accessors = data.fields().iter().map(accessor_tokens);
    let table_tokens = quote! {
        fieldmap::__macro_exports::FieldTable::new(
            ::core::any::type_name::<Self>(),
            ::std::vec![#(#accessors),*],
        )
    };

    // A `static CELL` in a generic fn is shared by every instantiation, so
    // generic types go through the TypeId-keyed cell.
    let cell_tokens = if is_generic {
        quote! {
            static CELL: fieldmap::__macro_exports::GenericTableCell =
                fieldmap::__macro_exports::GenericTableCell::new();
            CELL.get_or_insert::<Self>(|| #table_tokens)
        }
    } else {
        quote! {
            static CELL: fieldmap::__macro_exports::NonGenericTableCell =
                fieldmap::__macro_exports::NonGenericTableCell::new();
            CELL.get_or_init(|| #table_tokens)
        }
    };

    quote! {
        impl #impl_generics fieldmap::__macro_exports::Fields for #ident #ty_generics #where_clause {
            fn field_table() -> &'static fieldmap::__macro_exports::FieldTable {
                #cell_tokens
            }
        }

        impl #impl_generics fieldmap::__macro_exports::Mappable for #ident #ty_generics #where_clause {
            #[inline]
            fn get_field_table(&self) -> &'static fieldmap::__macro_exports::FieldTable {
                <Self as fieldmap::__macro_exports::Fields>::field_table()
            }

            #[inline]
            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            #[inline]
            fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
                self
            }
        }
    }
}

/// Bounds every type parameter the way a mapped field needs it.
fn add_field_bounds(generics: &mut Generics) {
    let params: Vec<Ident> = generics
        .type_params()
        .map(|param| param.ident.clone())
        .collect();
    let where_clause = generics.make_where_clause();
    for param in params {
        where_clause.predicates.push(parse_quote! {
            #param: ::core::clone::Clone + ::core::marker::Send + ::core::marker::Sync + 'static
        });
    }
}

/// Builds one `FieldAccessor` expression: a cloning getter and a
/// downcasting setter, both coercible to the erased fn pointers.
fn accessor_tokens(field: &MappedField) -> TokenStream {
    let MappedField { ident, ty } = field;
    let name = ident.to_string();
    let name = name.trim_start_matches("r#").to_owned();

    quote! {
        fieldmap::__macro_exports::FieldAccessor::new::<#ty>(
            #name,
            |receiver| {
                receiver.downcast_ref::<Self>().map(|receiver| {
                    ::std::boxed::Box::new(::core::clone::Clone::clone(&receiver.#ident))
                        as fieldmap::__macro_exports::FieldValue
                })
            },
            |receiver, value| {
                let ::core::option::Option::Some(receiver) = receiver.downcast_mut::<Self>()
                else {
                    return ::core::result::Result::Err(
                        fieldmap::__macro_exports::AccessError::Receiver {
                            expected: ::core::any::type_name::<Self>(),
                        },
                    );
                };
                match value.downcast::<#ty>() {
                    ::core::result::Result::Ok(value) => {
                        receiver.#ident = *value;
                        ::core::result::Result::Ok(())
                    }
                    ::core::result::Result::Err(_) => ::core::result::Result::Err(
                        fieldmap::__macro_exports::AccessError::Value {
                            field: #name,
                            expected: ::core::any::type_name::<#ty>(),
                        },
                    ),
                }
            },
        )
    }
}
