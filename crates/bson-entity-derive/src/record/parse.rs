// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Parsing of `#[derive(Record)]` input.
//!
//! | Level | Attribute | Parsed by |
//! |-------|-----------|-----------|
//! | Struct | `#[bson(collection = "...", rename_all = "...")]` | darling ([`RecordAttrs`]) |
//! | Field | `#[bson("key,flags")]` | [`FieldDef::from_field`] |
//!
//! Struct-level problems (wrong item kind, generics, unknown options) and
//! malformed field tags are reported together as compile errors.

mod attrs;
mod field;

pub use attrs::{RecordAttrs, RenameRule};
use darling::FromDeriveInput;
pub use field::{EmbedKind, FieldDef};
use syn::{DeriveInput, Ident};

#[cfg(test)]
mod tests;

/// Parsed record definition handed to the generators.
#[derive(Debug)]
pub struct RecordDef {
    /// Struct identifier.
    pub ident: Ident,

    /// Collection override from `#[bson(collection = "...")]`.
    pub collection: Option<String>,

    /// Mapped fields in declaration order. Skipped fields are left out.
    pub fields: Vec<FieldDef>
}

impl RecordDef {
    /// Parse a record definition from the derive input.
    ///
    /// # Errors
    ///
    /// - Applied to an enum, union, tuple struct or unit struct
    /// - Struct has generic parameters
    /// - Malformed `#[bson(...)]` attribute or tag
    pub fn from_derive_input(input: &DeriveInput) -> darling::Result<Self> {
        let named = match &input.data {
            syn::Data::Struct(data) => match &data.fields {
                syn::Fields::Named(named) => &named.named,
                _ => {
                    return Err(darling::Error::custom("Record requires named fields")
                        .with_span(&input.ident));
                }
            },
            _ => {
                return Err(
                    darling::Error::custom("Record can only be derived for structs")
                        .with_span(&input.ident)
                );
            }
        };

        if !input.generics.params.is_empty() {
            return Err(
                darling::Error::custom("Record cannot be derived for generic structs")
                    .with_span(&input.ident)
            );
        }

        let attrs = RecordAttrs::from_derive_input(input)?;

        let mut errors = darling::Error::accumulator();
        let fields = named
            .iter()
            .filter_map(|field| errors.handle(FieldDef::from_field(field, attrs.rename_all)))
            .flatten()
            .collect();
        errors.finish()?;

        Ok(Self {
            ident: attrs.ident,
            collection: attrs.collection,
            fields
        })
    }
}
