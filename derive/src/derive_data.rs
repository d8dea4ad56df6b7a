//! Parsed input of the `Mappable` derive.

use syn::{Data, DeriveInput, Error, Field, Fields, Generics, Ident, Result, Type};

use crate::FIELDMAP_ATTRIBUTE_NAME;

// -----------------------------------------------------------------------------
// MappableStruct

/// A struct with named fields, validated and stripped down to what the
/// generated impls need.
pub(crate) struct MappableStruct<'a> {
    ident: &'a Ident,
    generics: &'a Generics,
    fields: Vec<MappedField<'a>>,
}

/// One field that ends up in the accessor table.
pub(crate) struct MappedField<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
}

impl<'a> MappableStruct<'a> {
    /// Validates the derive input and collects the mapped fields.
    ///
    /// Fields marked `#[fieldmap(skip)]` are dropped here, so the impls
    /// never see them.
    pub(crate) fn parse(input: &'a DeriveInput) -> Result<Self> {
        let Data::Struct(data) = &input.data else {
            return Err(Error::new_spanned(
                &input.ident,
                "`Mappable` can only be derived for structs",
            ));
        };
        let Fields::Named(named) = &data.fields else {
            return Err(Error::new_spanned(
                &input.ident,
                "`Mappable` requires named fields; \
                 tuple and unit structs have no field names to match on",
            ));
        };

        let mut fields = Vec::with_capacity(named.named.len());
        for field in &named.named {
            if is_skipped(field)? {
                continue;
            }
            // Named fields always carry an ident.
            if let Some(ident) = field.ident.as_ref() {
                fields.push(MappedField {
                    ident,
                    ty: &field.ty,
                });
            }
        }

        Ok(Self {
            ident: &input.ident,
            generics: &input.generics,
            fields,
        })
    }

    pub(crate) fn ident(&self) -> &Ident {
        self.ident
    }

    pub(crate) fn generics(&self) -> &Generics {
        self.generics
    }

    pub(crate) fn fields(&self) -> &[MappedField<'a>] {
        &self.fields
    }
}

// -----------------------------------------------------------------------------
// Attributes

fn is_skipped(field: &Field) -> Result<bool> {
    let mut skipped = false;
    for attr in &field.attrs {
        if !attr.path().is_ident(FIELDMAP_ATTRIBUTE_NAME) {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skipped = true;
                Ok(())
            } else {
                Err(meta.error("unknown `fieldmap` attribute; expected `skip`"))
            }
        })?;
    }
    Ok(skipped)
}
