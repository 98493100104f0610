// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Static schema descriptions of record types.
//!
//! Rust has no runtime struct introspection, so every record type publishes a
//! [`RecordSchema`]: its name, its declared fields in order, their raw tags
//! and a pair of type-erased getters per field. `#[derive(Record)]` writes
//! this table; it can also be written by hand.
//!
//! # Architecture
//!
//! ```text
//! Record::schema() ──► RecordSchema
//!                      ├── name, module_path, type_id
//!                      ├── collection_name   (override hook)
//!                      ├── new_result_slice  (Vec<Box<Self>> factory)
//!                      └── fields[]          FieldDecl
//!                          ├── name, default_key, tag, type_name, type_id
//!                          ├── get / get_mut (field slot of one instance)
//!                          ├── is_zero
//!                          └── embed: None | Value(schema) | Linked(LinkDecl)
//! ```
//!
//! # Manual Schemas
//!
//! ```rust
//! use std::any::{Any, TypeId};
//!
//! use bson_entity_core::schema::{
//!     Describe, FieldDecl, Record, RecordSchema, TypeShape, result_slice
//! };
//! use bson_entity_core::zero::zero_check;
//!
//! #[derive(Default)]
//! struct Tag {
//!     id: i64
//! }
//!
//! fn get_id(record: &dyn Any) -> Option<&dyn Any> {
//!     record.downcast_ref::<Tag>().map(|r| &r.id as &dyn Any)
//! }
//!
//! fn get_id_mut(record: &mut dyn Any) -> Option<&mut dyn Any> {
//!     record.downcast_mut::<Tag>().map(|r| &mut r.id as &mut dyn Any)
//! }
//!
//! static TAG_SCHEMA: RecordSchema = RecordSchema {
//!     name:             "Tag",
//!     module_path:      module_path!(),
//!     type_id:          TypeId::of::<Tag>,
//!     collection_name:  <Tag as Record>::collection_name,
//!     new_result_slice: result_slice::<Tag>,
//!     fields:           &[FieldDecl {
//!         name:        "id",
//!         default_key: "id",
//!         tag:         "_id",
//!         type_name:   "i64",
//!         type_id:     TypeId::of::<i64>,
//!         get:         get_id,
//!         get_mut:     get_id_mut,
//!         is_zero:     zero_check::<i64>,
//!         embed:       None
//!     }]
//! };
//!
//! impl Record for Tag {
//!     fn schema() -> &'static RecordSchema {
//!         &TAG_SCHEMA
//!     }
//! }
//!
//! impl Describe for Tag {
//!     fn shape() -> TypeShape {
//!         TypeShape::Record(Tag::schema)
//!     }
//! }
//! ```

use std::{
    any::{Any, TypeId},
    cell::RefCell,
    collections::VecDeque,
    fmt,
    rc::Rc,
    sync::Arc
};

use crate::RESULT_SLICE_CAPACITY;

/// Returns the schema of a record type.
pub type SchemaFn = fn() -> &'static RecordSchema;

/// Borrows one field of a record instance.
///
/// Returns `None` when the instance is not of the declaring record type.
pub type Getter = for<'a> fn(&'a dyn Any) -> Option<&'a dyn Any>;

/// Mutably borrows one field of a record instance.
///
/// Returns `None` when the instance is not of the declaring record type.
pub type GetterMut = for<'a> fn(&'a mut dyn Any) -> Option<&'a mut dyn Any>;

/// A record type that can be mapped to a document.
///
/// Implemented by `#[derive(Record)]`. `Default` is required so that
/// `Option<Box<Self>>` links can be allocated on write.
pub trait Record: Any + Default + Send + Sync {
    /// The static schema description of this type.
    fn schema() -> &'static RecordSchema;

    /// Collection name override.
    ///
    /// `None` falls back to the type name with a lowercased initial.
    fn collection_name() -> Option<String> {
        None
    }
}

/// Static description of one record type.
pub struct RecordSchema {
    /// Declared type name (e.g., `User`).
    pub name: &'static str,

    /// Module path of the declaring module.
    pub module_path: &'static str,

    /// Type identity of the record.
    pub type_id: fn() -> TypeId,

    /// Declared fields, in declaration order.
    pub fields: &'static [FieldDecl],

    /// Collection name override hook.
    pub collection_name: fn() -> Option<String>,

    /// Creates an empty `Vec<Box<Record>>`, boxed as `dyn Any`.
    pub new_result_slice: fn() -> Box<dyn Any + Send>
}

impl RecordSchema {
    /// Qualified name (`module::Name`), or the bare name without a module.
    pub fn qualified_name(&self) -> String {
        qualify(self.module_path, self.name)
    }
}

impl fmt::Debug for RecordSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSchema")
            .field("name", &self.name)
            .field("module_path", &self.module_path)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// Static description of one declared field.
pub struct FieldDecl {
    /// Declared field name.
    pub name: &'static str,

    /// Document key used when the tag names none.
    pub default_key: &'static str,

    /// Raw tag string from the `bson` attribute, empty when absent.
    pub tag: &'static str,

    /// Declared type, as written.
    pub type_name: &'static str,

    /// Type identity of the declared type.
    pub type_id: fn() -> TypeId,

    /// Borrows the field from an instance of the declaring record.
    pub get: Getter,

    /// Mutably borrows the field from an instance of the declaring record.
    pub get_mut: GetterMut,

    /// Zero check for a value of the declared type.
    pub is_zero: fn(&dyn Any) -> bool,

    /// Set when the field's type is itself a record.
    pub embed: Option<Embed>
}

impl fmt::Debug for FieldDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDecl")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("type_name", &self.type_name)
            .field("embed", &self.embed)
            .finish_non_exhaustive()
    }
}

/// How a field embeds another record.
#[derive(Clone, Copy)]
pub enum Embed {
    /// Field of type `T` where `T: Record`.
    Value(SchemaFn),

    /// Field of type `Option<Box<T>>` where `T: Record`.
    Linked(LinkDecl)
}

impl Embed {
    /// Schema of the embedded record.
    pub fn schema(&self) -> &'static RecordSchema {
        match self {
            Self::Value(schema) => schema(),
            Self::Linked(link) => (link.schema)()
        }
    }

    /// Check if the embedding goes through an optional boxed link.
    pub const fn is_linked(&self) -> bool {
        matches!(self, Self::Linked(_))
    }
}

impl fmt::Debug for Embed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(schema) => f.debug_tuple("Value").field(&schema().name).finish(),
            Self::Linked(link) => f.debug_tuple("Linked").field(&(link.schema)().name).finish()
        }
    }
}

/// Operations on an `Option<Box<T>>` link slot.
#[derive(Clone, Copy)]
pub struct LinkDecl {
    /// Schema of the linked record.
    pub schema: SchemaFn,

    /// Borrows the linked record, `None` when the link is empty.
    pub deref: Getter,

    /// Borrows the linked record mutably, allocating it when empty.
    pub deref_or_init: GetterMut
}

impl LinkDecl {
    /// Link operations for `Option<Box<T>>`.
    pub const fn of<T: Record>() -> Self {
        Self {
            schema:        T::schema,
            deref:         link_deref::<T>,
            deref_or_init: link_deref_or_init::<T>
        }
    }
}

/// Borrow the record behind an `Option<Box<T>>` slot.
pub fn link_deref<T: Record>(slot: &dyn Any) -> Option<&dyn Any> {
    slot.downcast_ref::<Option<Box<T>>>()?
        .as_deref()
        .map(|record| record as &dyn Any)
}

/// Borrow the record behind an `Option<Box<T>>` slot, allocating it if empty.
pub fn link_deref_or_init<T: Record>(slot: &mut dyn Any) -> Option<&mut dyn Any> {
    let link = slot.downcast_mut::<Option<Box<T>>>()?;
    let record: &mut T = link.get_or_insert_with(Box::default);
    Some(record as &mut dyn Any)
}

/// Empty result sequence for `T`, boxed as `dyn Any`.
pub fn result_slice<T: Record>() -> Box<dyn Any + Send> {
    Box::new(Vec::<Box<T>>::with_capacity(RESULT_SLICE_CAPACITY))
}

/// Shape of a type as seen by the resolver.
///
/// Wrapper shapes are peeled off until a record or another type remains.
#[derive(Clone, Copy)]
pub enum TypeShape {
    /// A record type.
    Record(SchemaFn),

    /// A reference, smart pointer or optional value.
    Pointer(fn() -> TypeShape),

    /// A growable sequence or slice.
    Slice(fn() -> TypeShape),

    /// A fixed-size array.
    Array(fn() -> TypeShape),

    /// Anything else.
    Other {
        /// Bare type name.
        name:        &'static str,
        /// Module path, empty for built-in types.
        module_path: &'static str
    }
}

impl TypeShape {
    /// Peel pointer, slice and array wrappers.
    pub fn concrete(self) -> Self {
        let mut shape = self;
        while let Self::Pointer(elem) | Self::Slice(elem) | Self::Array(elem) = shape {
            shape = elem();
        }
        shape
    }

    /// Type name for error reports.
    pub fn type_name(&self) -> String {
        match self.concrete() {
            Self::Record(schema) => schema().qualified_name(),
            Self::Other {
                name,
                module_path
            } => qualify(module_path, name),
            wrapper => format!("{wrapper:?}")
        }
    }
}

impl fmt::Debug for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record(schema) => f.debug_tuple("Record").field(&schema().name).finish(),
            Self::Pointer(elem) => f.debug_tuple("Pointer").field(&elem()).finish(),
            Self::Slice(elem) => f.debug_tuple("Slice").field(&elem()).finish(),
            Self::Array(elem) => f.debug_tuple("Array").field(&elem()).finish(),
            Self::Other {
                name, ..
            } => f.debug_tuple("Other").field(name).finish()
        }
    }
}

/// Types whose shape the resolver can inspect.
///
/// Records get this from `#[derive(Record)]`. Wrappers delegate to their
/// element; built-in scalars report [`TypeShape::Other`].
pub trait Describe {
    /// Shape of this type.
    fn shape() -> TypeShape;
}

/// Implement [`Describe`] for non-record types.
///
/// Resolving such a type fails with an unsupported-type error naming it.
///
/// ```rust
/// use bson_entity_core::{Describe, TypeShape, describe_opaque};
///
/// struct Color;
/// describe_opaque!(Color);
///
/// assert!(matches!(Color::shape(), TypeShape::Other { name: "Color", .. }));
/// ```
#[macro_export]
macro_rules! describe_opaque {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl $crate::Describe for $ty {
                fn shape() -> $crate::TypeShape {
                    $crate::TypeShape::Other {
                        name:        ::core::stringify!($ty),
                        module_path: ::core::module_path!()
                    }
                }
            }
        )+
    };
}

macro_rules! describe_builtin {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Describe for $ty {
                fn shape() -> TypeShape {
                    TypeShape::Other {
                        name:        ::core::stringify!($ty),
                        module_path: ""
                    }
                }
            }
        )+
    };
}

describe_builtin!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, (),
    str, String
);

macro_rules! describe_wrapper {
    ($variant:ident: $($ty:ty),+ $(,)?) => {
        $(
            impl<T: Describe + ?Sized> Describe for $ty {
                fn shape() -> TypeShape {
                    TypeShape::$variant(T::shape)
                }
            }
        )+
    };
}

describe_wrapper!(Pointer: &T, &mut T, Box<T>, Arc<T>, Rc<T>, RefCell<T>);

impl<T: Describe> Describe for Option<T> {
    fn shape() -> TypeShape {
        TypeShape::Pointer(T::shape)
    }
}

impl<T: Describe> Describe for [T] {
    fn shape() -> TypeShape {
        TypeShape::Slice(T::shape)
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn shape() -> TypeShape {
        TypeShape::Slice(T::shape)
    }
}

impl<T: Describe> Describe for VecDeque<T> {
    fn shape() -> TypeShape {
        TypeShape::Slice(T::shape)
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn shape() -> TypeShape {
        TypeShape::Array(T::shape)
    }
}

fn qualify(module_path: &str, name: &str) -> String {
    if module_path.is_empty() {
        name.to_string()
    } else {
        format!("{module_path}::{name}")
    }
}
