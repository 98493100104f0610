// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Tests for record parsing.
//!
//! Tests use `syn::parse_quote!` to build struct definitions with attributes,
//! then check the parsed [`RecordDef`]:
//!
//! ```rust,ignore
//! let input: DeriveInput = syn::parse_quote! {
//!     #[bson(collection = "people")]
//!     struct Person {
//!         #[bson("_id")]
//!         id: i64
//!     }
//! };
//! let record = RecordDef::from_derive_input(&input).unwrap();
//! assert_eq!(record.collection.as_deref(), Some("people"));
//! ```

use syn::DeriveInput;

use super::{EmbedKind, RecordDef};

#[test]
fn plain_record() {
    let input: DeriveInput = syn::parse_quote! {
        pub struct User {
            #[bson("_id")]
            pub id: i64,
            pub email: String
        }
    };
    let record = RecordDef::from_derive_input(&input).unwrap();
    assert_eq!(record.ident, "User");
    assert!(record.collection.is_none());
    assert_eq!(record.fields.len(), 2);
    assert_eq!(record.fields[0].tag, "_id");
    assert_eq!(record.fields[1].default_key, "email");
}

#[test]
fn struct_attributes() {
    let input: DeriveInput = syn::parse_quote! {
        #[bson(collection = "people", rename_all = "camelCase")]
        struct Person {
            #[bson("_id")]
            id: i64,
            display_name: String
        }
    };
    let record = RecordDef::from_derive_input(&input).unwrap();
    assert_eq!(record.collection.as_deref(), Some("people"));
    assert_eq!(record.fields[1].name, "display_name");
    assert_eq!(record.fields[1].default_key, "displayName");
}

#[test]
fn skipped_fields_are_left_out() {
    let input: DeriveInput = syn::parse_quote! {
        struct Person {
            #[bson("_id")]
            id: i64,
            #[bson("-")]
            scratch: Vec<u8>,
            #[bson(",inline")]
            address: Address
        }
    };
    let record = RecordDef::from_derive_input(&input).unwrap();
    let names: Vec<_> = record.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["id", "address"]);
    assert!(matches!(record.fields[1].embed, Some(EmbedKind::Value(_))));
}

#[test]
fn unknown_rename_rule_is_rejected() {
    let input: DeriveInput = syn::parse_quote! {
        #[bson(rename_all = "Title Case")]
        struct Person {
            #[bson("_id")]
            id: i64
        }
    };
    assert!(RecordDef::from_derive_input(&input).is_err());
}

#[test]
fn unknown_struct_option_is_rejected() {
    let input: DeriveInput = syn::parse_quote! {
        #[bson(table = "people")]
        struct Person {
            #[bson("_id")]
            id: i64
        }
    };
    assert!(RecordDef::from_derive_input(&input).is_err());
}

#[test]
fn generic_struct_is_rejected() {
    let input: DeriveInput = syn::parse_quote! {
        struct Wrapper<T> {
            #[bson("_id")]
            id: i64,
            value: T
        }
    };
    assert!(RecordDef::from_derive_input(&input).is_err());
}

#[test]
fn tuple_struct_is_rejected() {
    let input: DeriveInput = syn::parse_quote! {
        struct Pair(i64, String);
    };
    assert!(RecordDef::from_derive_input(&input).is_err());
}

#[test]
fn enum_is_rejected() {
    let input: DeriveInput = syn::parse_quote! {
        enum Status { Active, Inactive }
    };
    assert!(RecordDef::from_derive_input(&input).is_err());
}

#[test]
fn every_bad_field_is_reported() {
    let input: DeriveInput = syn::parse_quote! {
        struct Person {
            #[bson("=x")]
            id: i64,
            #[bson("name=")]
            email: String
        }
    };
    let err = RecordDef::from_derive_input(&input).unwrap_err();
    assert_eq!(err.len(), 2);
}
