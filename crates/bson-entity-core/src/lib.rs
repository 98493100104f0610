// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Record-to-document metadata resolution for bson-entity.
//!
//! This crate turns a record type into an [`Entity`]: the document key of
//! every field, the identity field, embedded records flattened into one field
//! list, and a pair of accessors per field that read or write that field on
//! any instance of the record. Resolution runs once per type; the result is
//! shared through [`MetadataCache`].
//!
//! # Overview
//!
//! - [`resolve`] — Entity of a record value, through the global cache
//! - [`Record`] — Static schema of a record type, usually derived
//! - [`Entity`] / [`Field`] — Resolved mapping and per-field accessors
//! - [`MetadataCache`] — Compute-once, type-keyed entity store
//! - [`prelude`] — Convenient re-exports
//!
//! # Architecture
//!
//! ```text
//! resolve(&value)
//!   └─► MetadataCache ──miss──► resolve_entity
//!                                 ├─► parse_tag      per field
//!                                 ├─► resolve_field  per field
//!                                 └─► resolve_entity per embedded record
//! ```
//!
//! # Usage
//!
//! Most users should depend on `bson-entity`, which re-exports this crate
//! together with `#[derive(Record)]`:
//!
//! ```rust,ignore
//! use bson_entity::prelude::*;
//!
//! #[derive(Record, Default)]
//! struct User {
//!     #[bson("_id")]
//!     id:   i64,
//!     name: String
//! }
//!
//! let mut user = User::default();
//! let entity = resolve(&user)?;
//! let name = entity.lookup_field("name").unwrap();
//! *name.slot_as::<String>(&mut user)? = "Ann".to_string();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod entity;
pub mod error;
pub mod field;
pub mod path;
pub mod prelude;
pub mod schema;
pub mod tag;
pub mod zero;

use std::sync::Arc;

pub use cache::MetadataCache;
pub use entity::Entity;
pub use error::{Error, TagError};
pub use field::{Field, FieldType, FieldValue};
pub use path::IndexPath;
pub use schema::{Describe, Embed, FieldDecl, LinkDecl, Record, RecordSchema, TypeShape};
pub use tag::TagSettings;
pub use zero::ZeroValue;

/// Document key of the identity field.
pub const IDENTITY_KEY: &str = "_id";

/// Attribute namespace holding field tags.
pub const TAG_NAMESPACE: &str = "bson";

/// Initial capacity of result sequences from [`Entity::new_result_slice`].
pub const RESULT_SLICE_CAPACITY: usize = 20;

/// Resolve the entity of a record through the global cache.
///
/// `record` may be a record or a reference, `Box`, `Arc`, `Rc`, `Option`,
/// `Vec`, slice or array of one.
///
/// # Errors
///
/// - [`Error::UnsupportedType`] — `record` does not unwrap to a record
/// - [`Error::MissingIdentity`] — the record has no `_id` field
/// - [`Error::Tag`] — a field tag is malformed
/// - [`Error::RecursiveEmbedding`] — the record embeds itself
pub fn resolve<T: Describe + ?Sized>(record: &T) -> Result<Arc<Entity>, Error> {
    MetadataCache::global().get_or_resolve(record)
}

/// Shape of a record type, for resolving without an instance.
pub fn model_type<T: Record + Describe>() -> TypeShape {
    T::shape()
}
