// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Derive macro for bson-entity record schemas.
//!
//! `#[derive(Record)]` writes the static schema table that the resolver in
//! `bson-entity-core` reads: one entry per declared field with its raw tag,
//! its declared type and a pair of getters. Field tags are parsed here as
//! well, so a malformed tag is a compile error rather than a resolution
//! failure.
//!
//! Field types need no trait from this crate: the zero check behind
//! `omitempty` uses a `ZeroValue` impl when there is one, falls back to
//! `Default + PartialEq`, and can be named explicitly with `zero = "path"`.
//!
//! ```rust,ignore
//! use bson_entity::prelude::*;
//!
//! #[derive(Record, Default)]
//! #[bson(collection = "people", rename_all = "camelCase")]
//! pub struct Person {
//!     #[bson("_id")]
//!     pub id: i64,
//!
//!     pub display_name: String,      // key "displayName"
//!
//!     #[bson(",inline")]
//!     pub address: Address,          // flattened into the person
//!
//!     pub session_ttl: Duration,     // zero when equal to Duration::default()
//!
//!     #[bson("grace", zero = "Duration::is_zero")]
//!     pub grace_period: Duration,    // custom zero check
//!
//!     #[bson("-")]
//!     pub scratch: Vec<u8>           // not mapped
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rust_2018_idioms
)]
#![deny(unsafe_code)]

mod record;

use proc_macro::TokenStream;

/// Derive the document schema of a record.
///
/// Generates `Record`, `Describe` and `ZeroValue` implementations. See the
/// crate documentation for the accepted attributes.
#[proc_macro_derive(Record, attributes(bson))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive(input)
}
