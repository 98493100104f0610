// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity resolution.
//!
//! An [`Entity`] is the resolved document mapping of one record type. It is
//! built by [`resolve_entity`] from the record's [`RecordSchema`] and never
//! changes afterwards.
//!
//! # Flattening
//!
//! ```text
//! struct Address { city, zip }             User.fields     = [_id, address, name]
//! struct User {                            User.all_fields = [_id, city, zip, name]
//!     #[bson("_id")]       id,
//!     #[bson(",inline")]   address,        address.city path = [1, 0]
//!     name,                                address.zip  path = [1, 1]
//! }
//! ```
//!
//! `fields` keeps the embedding field as one entry; `all_fields` replaces it
//! with every leaf of the embedded record, recursively.
//!
//! # Identity
//!
//! The identity field is the first field keyed `_id` found depth-first,
//! descending into embedded records in place of their embedding field. A root
//! record without one cannot be resolved.

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt,
    sync::Arc
};

use tracing::debug;

use crate::{
    IDENTITY_KEY,
    cache::MetadataCache,
    error::Error,
    field::{Field, resolve_field},
    path::IndexPath,
    schema::{Record, RecordSchema, TypeShape},
    tag::parse_tag
};

/// Resolved document mapping of one record type.
pub struct Entity {
    name:             &'static str,
    type_name:        String,
    type_id:          TypeId,
    collection:       String,
    index_path:       IndexPath,
    fields:           Vec<Arc<Field>>,
    all_fields:       Vec<Arc<Field>>,
    primary_field:    Option<Arc<Field>>,
    fields_by_name:   HashMap<&'static str, Arc<Field>>,
    fields_by_key:    HashMap<String, Arc<Field>>,
    new_result_slice: fn() -> Box<dyn Any + Send>
}

impl Entity {
    /// Declared type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Qualified type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Type identity of the record.
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Collection the record is stored in.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Path from the root record, empty unless this entity is embedded.
    pub const fn index_path(&self) -> &IndexPath {
        &self.index_path
    }

    /// Check if this entity describes an embedded record.
    pub fn is_embedded(&self) -> bool {
        !self.index_path.is_empty()
    }

    /// Fields declared directly on this record.
    pub fn fields(&self) -> &[Arc<Field>] {
        &self.fields
    }

    /// Leaf fields, with embedded records flattened in place.
    pub fn all_fields(&self) -> &[Arc<Field>] {
        &self.all_fields
    }

    /// The identity field. Always set on root entities.
    pub fn primary_field(&self) -> Option<&Arc<Field>> {
        self.primary_field.as_ref()
    }

    /// Direct fields by declared name.
    pub const fn fields_by_name(&self) -> &HashMap<&'static str, Arc<Field>> {
        &self.fields_by_name
    }

    /// Direct fields by document key.
    pub const fn fields_by_key(&self) -> &HashMap<String, Arc<Field>> {
        &self.fields_by_key
    }

    /// Document keys of all leaf fields, in order.
    pub fn db_names(&self) -> Vec<&str> {
        self.all_fields.iter().map(|field| field.key()).collect()
    }

    /// Find a direct field by document key, then by declared name.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let entity = bson_entity::resolve(&user)?;
    /// assert!(entity.lookup_field("_id").is_some());
    /// assert!(entity.lookup_field("id").is_some());
    /// ```
    pub fn lookup_field(&self, key: &str) -> Option<&Arc<Field>> {
        self.fields_by_key
            .get(key)
            .or_else(|| self.fields_by_name.get(key))
    }

    /// Document key of the identity field.
    pub fn primary_key_name(&self) -> &str {
        self.primary_field
            .as_ref()
            .map_or(IDENTITY_KEY, |field| field.key())
    }

    /// Empty `Vec<Box<Record>>` for multi-record reads, boxed as `dyn Any`.
    ///
    /// Pre-sized for [`RESULT_SLICE_CAPACITY`](crate::RESULT_SLICE_CAPACITY)
    /// records.
    pub fn new_result_slice(&self) -> Box<dyn Any + Send> {
        (self.new_result_slice)()
    }

    /// Empty, pre-sized result sequence for the record type `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if `T` is not the entity's record type.
    pub fn new_results<T: Record>(&self) -> Result<Vec<Box<T>>, Error> {
        self.new_result_slice()
            .downcast::<Vec<Box<T>>>()
            .map(|results| *results)
            .map_err(|_| Error::TypeMismatch {
                expected: self.name
            })
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("name", &self.name)
            .field("collection", &self.collection)
            .field("index_path", &self.index_path)
            .field("fields", &self.fields)
            .field("primary_key", &self.primary_key_name())
            .finish_non_exhaustive()
    }
}

/// Resolve the entity of a record type, or of a record embedded in it.
///
/// `root` is unwrapped through pointers, slices and arrays first. An empty
/// `path` resolves the root record itself and returns the cached entity when
/// there is one. A non-empty `path` must lead through embedding fields of the
/// root to an embedded record; the resulting entity's field accessors still
/// operate on root instances.
///
/// A freshly resolved entity is not stored, that is left to
/// [`MetadataCache`].
///
/// # Errors
///
/// - [`Error::UnsupportedType`] — `root` does not unwrap to a record
/// - [`Error::InvalidPath`] — `path` does not end at an embedded record
/// - [`Error::MissingIdentity`] — root record without an `_id` field
/// - [`Error::Tag`] — a field tag is malformed
/// - [`Error::RecursiveEmbedding`] — a record embeds itself
pub fn resolve_entity(
    cache: &MetadataCache,
    root: TypeShape,
    path: &IndexPath
) -> Result<Arc<Entity>, Error> {
    let root = record_schema(root)?;

    if path.is_empty()
        && let Some(entity) = cache.get((root.type_id)())
    {
        return Ok(entity);
    }

    let (target, chain) = locate(root, path)?;
    let mut resolver = Resolver {
        root,
        visiting: chain
    };
    let entity = resolver.entity(target, path)?;
    if path.is_empty() {
        debug!(
            record = %entity.type_name,
            collection = %entity.collection,
            fields = entity.fields.len(),
            all_fields = entity.all_fields.len(),
            "resolved entity"
        );
    }
    Ok(Arc::new(entity))
}

/// Schema of the record behind `shape`.
pub(crate) fn record_schema(shape: TypeShape) -> Result<&'static RecordSchema, Error> {
    match shape.concrete() {
        TypeShape::Record(schema) => Ok(schema()),
        other => Err(Error::UnsupportedType {
            type_name: other.type_name()
        })
    }
}

/// Embedded record at the end of `path`, with the records passed on the way.
fn locate(
    root: &'static RecordSchema,
    path: &IndexPath
) -> Result<(&'static RecordSchema, Vec<TypeId>), Error> {
    let invalid = || Error::InvalidPath {
        record: root.qualified_name(),
        path:   path.entries().to_vec()
    };

    let mut schema = root;
    let mut chain = Vec::with_capacity(path.len() + 1);
    for step in path.steps() {
        let embed = schema
            .fields
            .get(step.position)
            .and_then(|decl| decl.embed)
            .ok_or_else(invalid)?;
        if embed.is_linked() != step.linked {
            return Err(invalid());
        }
        chain.push((schema.type_id)());
        schema = embed.schema();
    }
    Ok((schema, chain))
}

/// Type name with a lowercased initial, the default collection name.
pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new()
    }
}

/// Walks one record graph, carrying the root schema and the embedding chain.
struct Resolver {
    root:     &'static RecordSchema,
    visiting: Vec<TypeId>
}

impl Resolver {
    fn entity(&mut self, schema: &'static RecordSchema, path: &IndexPath) -> Result<Entity, Error> {
        let type_id = (schema.type_id)();
        if self.visiting.contains(&type_id) {
            return Err(Error::RecursiveEmbedding {
                record: schema.qualified_name()
            });
        }

        self.visiting.push(type_id);
        let extracted = self.fields(schema, path);
        self.visiting.pop();
        let (fields, all_fields) = extracted?;

        let primary_field = identity_field(&fields);
        if path.is_empty() && primary_field.is_none() {
            return Err(Error::MissingIdentity {
                record: schema.qualified_name()
            });
        }

        let (fields_by_name, fields_by_key) = index_fields(&fields);
        let collection = (schema.collection_name)().unwrap_or_else(|| lower_first(schema.name));

        Ok(Entity {
            name: schema.name,
            type_name: schema.qualified_name(),
            type_id,
            collection,
            index_path: path.clone(),
            fields,
            all_fields,
            primary_field,
            fields_by_name,
            fields_by_key,
            new_result_slice: schema.new_result_slice
        })
    }

    /// Direct and flattened fields of `schema`, rooted at `path`.
    fn fields(
        &mut self,
        schema: &'static RecordSchema,
        path: &IndexPath
    ) -> Result<(Vec<Arc<Field>>, Vec<Arc<Field>>), Error> {
        let mut fields = Vec::with_capacity(schema.fields.len());
        let mut all_fields = Vec::with_capacity(schema.fields.len());

        for (position, decl) in schema.fields.iter().enumerate() {
            let settings =
                parse_tag(decl.default_key, decl.tag).map_err(|source| Error::Tag {
                    record: schema.qualified_name(),
                    field: decl.name,
                    source
                })?;
            if settings.skip {
                continue;
            }

            let (field_path, embedded) = match decl.embed {
                None => (path.child(position), None),
                Some(embed) => {
                    let field_path = if embed.is_linked() {
                        path.linked_child(position)
                    } else {
                        path.child(position)
                    };
                    let nested = self.entity(embed.schema(), &field_path)?;
                    (field_path, Some(Arc::new(nested)))
                }
            };

            let field = Arc::new(resolve_field(
                self.root, decl, settings, field_path, embedded
            )?);
            match field.embedded() {
                Some(nested) => all_fields.extend(nested.all_fields().iter().cloned()),
                None => all_fields.push(Arc::clone(&field))
            }
            fields.push(field);
        }

        Ok((fields, all_fields))
    }
}

/// First identity field, depth-first through embedded records.
fn identity_field(fields: &[Arc<Field>]) -> Option<Arc<Field>> {
    for field in fields {
        match field.embedded() {
            Some(nested) => {
                if let Some(found) = identity_field(nested.fields()) {
                    return Some(found);
                }
            }
            None if field.is_identity() => return Some(Arc::clone(field)),
            None => {}
        }
    }
    None
}

type FieldIndex = (HashMap<&'static str, Arc<Field>>, HashMap<String, Arc<Field>>);

/// Lookup maps over direct fields. The first field wins on a shared key.
fn index_fields(fields: &[Arc<Field>]) -> FieldIndex {
    let mut by_name = HashMap::with_capacity(fields.len());
    let mut by_key = HashMap::with_capacity(fields.len());

    for field in fields {
        by_name
            .entry(field.name())
            .or_insert_with(|| Arc::clone(field));
        by_key
            .entry(field.key().to_string())
            .or_insert_with(|| Arc::clone(field));
    }

    (by_name, by_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_first_only_touches_initial() {
        assert_eq!(lower_first("UserAccount"), "userAccount");
        assert_eq!(lower_first("user"), "user");
        assert_eq!(lower_first("Émile"), "émile");
        assert_eq!(lower_first(""), "");
    }

    #[test]
    fn non_record_shapes_are_unsupported() {
        use crate::schema::Describe;

        let cache = MetadataCache::new();
        let err = resolve_entity(&cache, <Vec<i64>>::shape(), &IndexPath::root()).unwrap_err();
        assert_eq!(err, Error::UnsupportedType {
            type_name: "i64".to_string()
        });

        let err = resolve_entity(&cache, <()>::shape(), &IndexPath::root()).unwrap_err();
        assert_eq!(err, Error::UnsupportedType {
            type_name: "()".to_string()
        });
    }
}
