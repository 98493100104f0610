// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Static schema generation.
//!
//! # Generated Code
//!
//! ```rust,ignore
//! fn __bson_ref_email(record: &dyn Any) -> Option<&dyn Any> {
//!     record.downcast_ref::<User>().map(|record| &record.email as &dyn Any)
//! }
//! fn __bson_mut_email(record: &mut dyn Any) -> Option<&mut dyn Any> { ... }
//! fn __bson_zero_email(value: &dyn Any) -> bool { ... }
//!
//! static __BSON_SCHEMA: RecordSchema = RecordSchema {
//!     name:   "User",
//!     fields: &[FieldDecl { name: "email", tag: "", get: __bson_ref_email, ... }],
//!     ...
//! };
//! ```

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use super::parse::{EmbedKind, FieldDef, RecordDef};

/// Generate field getters, zero checks and the `__BSON_SCHEMA` static.
pub fn generate(record: &RecordDef) -> TokenStream {
    let ident = &record.ident;
    let name = ident.to_string();
    let getters = record.fields.iter().map(|field| getters(record, field));
    let zero_checks = record.fields.iter().map(zero_check);
    let decls = record.fields.iter().map(field_decl);

    quote! {
        #(#getters)*
        #(#zero_checks)*

        static __BSON_SCHEMA: ::bson_entity::RecordSchema = ::bson_entity::RecordSchema {
            name: #name,
            module_path: ::core::module_path!(),
            type_id: ::core::any::TypeId::of::<#ident>,
            collection_name: <#ident as ::bson_entity::Record>::collection_name,
            new_result_slice: ::bson_entity::schema::result_slice::<#ident>,
            fields: &[#(#decls),*]
        };
    }
}

fn getter_names(field: &FieldDef) -> (syn::Ident, syn::Ident) {
    (
        format_ident!("__bson_ref_{}", field.name),
        format_ident!("__bson_mut_{}", field.name)
    )
}

/// Name of the erased zero check of a field.
pub fn zero_check_name(field: &FieldDef) -> syn::Ident {
    format_ident!("__bson_zero_{}", field.name)
}

/// Erased zero check: the `zero` path when given, otherwise the field
/// type's `ZeroValue` impl, otherwise comparison with its default.
fn zero_check(field: &FieldDef) -> TokenStream {
    let ty = &field.ty;
    let name = zero_check_name(field);

    let body = match &field.zero {
        Some(path) => quote! {
            ::bson_entity::zero::zero_check_with::<#ty>(value, |value| #path(value))
        },
        None => quote! {
            use ::bson_entity::zero::{ByDefault as _, ByZeroValue as _};
            (&::bson_entity::zero::ZeroDispatch::<#ty>::new()).zero_check()(value)
        }
    };

    quote! {
        fn #name(value: &dyn ::core::any::Any) -> bool {
            #body
        }
    }
}

fn getters(record: &RecordDef, field: &FieldDef) -> TokenStream {
    let owner = &record.ident;
    let member = &field.ident;
    let (get, get_mut) = getter_names(field);

    quote! {
        fn #get(record: &dyn ::core::any::Any) -> ::core::option::Option<&dyn ::core::any::Any> {
            record
                .downcast_ref::<#owner>()
                .map(|record| &record.#member as &dyn ::core::any::Any)
        }

        fn #get_mut(
            record: &mut dyn ::core::any::Any
        ) -> ::core::option::Option<&mut dyn ::core::any::Any> {
            record
                .downcast_mut::<#owner>()
                .map(|record| &mut record.#member as &mut dyn ::core::any::Any)
        }
    }
}

fn field_decl(field: &FieldDef) -> TokenStream {
    let ty = &field.ty;
    let name = &field.name;
    let default_key = &field.default_key;
    let tag = &field.tag;
    let type_name = field.type_label();
    let (get, get_mut) = getter_names(field);
    let is_zero = zero_check_name(field);

    let embed = match &field.embed {
        None => quote!(::core::option::Option::None),
        Some(EmbedKind::Value(record)) => quote! {
            ::core::option::Option::Some(::bson_entity::Embed::Value(
                <#record as ::bson_entity::Record>::schema
            ))
        },
        Some(EmbedKind::Linked(record)) => quote! {
            ::core::option::Option::Some(::bson_entity::Embed::Linked(
                ::bson_entity::LinkDecl::of::<#record>()
            ))
        }
    };

    quote! {
        ::bson_entity::FieldDecl {
            name: #name,
            default_key: #default_key,
            tag: #tag,
            type_name: #type_name,
            type_id: ::core::any::TypeId::of::<#ty>,
            get: #get,
            get_mut: #get_mut,
            is_zero: #is_zero,
            embed: #embed
        }
    }
}
