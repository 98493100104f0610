// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Record derive macro implementation.
//!
//! # Architecture
//!
//! ```text
//! record.rs (coordinator)
//! ├── parse/      RecordDef from the derive input
//! │   ├── attrs.rs   #[bson(collection, rename_all)] via darling
//! │   └── field.rs   #[bson("key,flags")] per field
//! ├── schema.rs   getters + static RecordSchema
//! └── impls.rs    Record, Describe, ZeroValue
//! ```
//!
//! Everything is emitted inside one `const _: () = { ... };` block so the
//! generated getters and the schema static never collide with user items.

mod impls;
pub mod parse;
mod schema;

use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

use self::parse::RecordDef;

/// Main entry point for the Record derive macro.
pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match RecordDef::from_derive_input(&input) {
        Ok(record) => generate(&record),
        Err(err) => err.write_errors().into()
    }
}

fn generate(record: &RecordDef) -> TokenStream {
    let schema = schema::generate(record);
    let impls = impls::generate(record);

    let expanded = quote! {
        const _: () = {
            #schema
            #impls
        };
    };

    expanded.into()
}
