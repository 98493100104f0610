// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Trait implementations for derived records.
//!
//! | Trait | Body |
//! |-------|------|
//! | `Record` | `schema()` returns `__BSON_SCHEMA`; `collection_name()` when overridden |
//! | `Describe` | `TypeShape::Record` |
//! | `ZeroValue` | every mapped field passes its zero check |

use proc_macro2::TokenStream;
use quote::quote;

use super::{parse::RecordDef, schema::zero_check_name};

/// Generate the `Record`, `Describe` and `ZeroValue` impls.
pub fn generate(record: &RecordDef) -> TokenStream {
    let ident = &record.ident;
    let members = record.fields.iter().map(|field| &field.ident);
    let checks = record.fields.iter().map(zero_check_name);

    let collection = record.collection.as_ref().map(|collection| {
        quote! {
            fn collection_name() -> ::core::option::Option<::std::string::String> {
                ::core::option::Option::Some(::std::string::String::from(#collection))
            }
        }
    });

    quote! {
        impl ::bson_entity::Record for #ident {
            fn schema() -> &'static ::bson_entity::RecordSchema {
                &__BSON_SCHEMA
            }

            #collection
        }

        impl ::bson_entity::Describe for #ident {
            fn shape() -> ::bson_entity::TypeShape {
                ::bson_entity::TypeShape::Record(<#ident as ::bson_entity::Record>::schema)
            }
        }

        impl ::bson_entity::ZeroValue for #ident {
            fn is_zero(&self) -> bool {
                true #(&& #checks(&self.#members))*
            }
        }
    }
}
