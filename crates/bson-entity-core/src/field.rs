// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Resolved field descriptors and their accessors.
//!
//! A [`Field`] is built once per declared field when its record type is
//! resolved. It carries two accessors closed over the field's index path:
//!
//! | Accessor | Returns | Empty link on the way |
//! |----------|---------|-----------------------|
//! | [`Field::value_of`] | current value + zero flag | reported as absent and zero |
//! | [`Field::slot_of`] | mutable storage slot | allocated in place |
//!
//! The final element of a path is never dereferenced: both accessors stop at
//! a value of the declared field type, even when that type is
//! `Option<Box<Record>>`.
//!
//! # Accessor Shapes
//!
//! ```text
//! [i]          direct field of the root
//! [i, j]       field j of the by-value record in root field i
//! otherwise    walk every step, following links on negative entries
//! ```

use std::{
    any::{Any, TypeId},
    fmt,
    sync::Arc
};

use crate::{
    entity::Entity,
    error::Error,
    path::IndexPath,
    schema::{Embed, FieldDecl, Getter, GetterMut, RecordSchema},
    tag::TagSettings
};

type ValueFn = Box<dyn for<'a> Fn(&'a dyn Any) -> Result<FieldValue<'a>, Error> + Send + Sync>;
type SlotFn = Box<dyn for<'a> Fn(&'a mut dyn Any) -> Result<&'a mut dyn Any, Error> + Send + Sync>;

/// Declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldType {
    /// Type as written in the record declaration.
    pub name: &'static str,

    /// Type identity.
    pub id: TypeId
}

/// Current value of a field on one instance.
#[derive(Clone, Copy)]
pub struct FieldValue<'a> {
    value: Option<&'a dyn Any>,
    zero:  bool
}

impl<'a> FieldValue<'a> {
    fn present(value: &'a dyn Any, zero: bool) -> Self {
        Self {
            value: Some(value),
            zero
        }
    }

    const fn absent() -> Self {
        Self {
            value: None,
            zero:  true
        }
    }

    /// The value, `None` when an empty link sits on the path.
    pub fn value(&self) -> Option<&'a dyn Any> {
        self.value
    }

    /// Check if the value is its type's zero value.
    pub const fn is_zero(&self) -> bool {
        self.zero
    }

    /// Check if an empty link hid the field.
    pub const fn is_absent(&self) -> bool {
        self.value.is_none()
    }

    /// The value as `T`, `None` when absent or of another type.
    pub fn downcast<T: Any>(&self) -> Option<&'a T> {
        self.value?.downcast_ref::<T>()
    }
}

impl fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldValue")
            .field("absent", &self.is_absent())
            .field("zero", &self.zero)
            .finish()
    }
}

/// Resolved descriptor of one field reachable from a root record.
pub struct Field {
    name:       &'static str,
    key:        String,
    identity:   bool,
    field_type: FieldType,
    settings:   TagSettings,
    index_path: IndexPath,
    embedded:   Option<Arc<Entity>>,
    value_of:   ValueFn,
    slot_of:    SlotFn
}

impl Field {
    /// Declared field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Document key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Check if this is the identity field.
    pub const fn is_identity(&self) -> bool {
        self.identity
    }

    /// Declared type.
    pub const fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Parsed tag settings.
    pub const fn settings(&self) -> &TagSettings {
        &self.settings
    }

    /// Path from the root record to this field.
    pub const fn index_path(&self) -> &IndexPath {
        &self.index_path
    }

    /// Resolved entity of the embedded record, for embedding fields.
    pub fn embedded(&self) -> Option<&Arc<Entity>> {
        self.embedded.as_ref()
    }

    /// Read the field from a root record instance.
    ///
    /// Never allocates. An empty link on the path yields an absent, zero
    /// value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if `record` is not an instance of the
    /// root type.
    pub fn value_of<'a>(&self, record: &'a dyn Any) -> Result<FieldValue<'a>, Error> {
        (self.value_of)(record)
    }

    /// Borrow the field's storage on a root record instance.
    ///
    /// Empty links on the path are allocated with `Default::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if `record` is not an instance of the
    /// root type.
    pub fn slot_of<'a>(&self, record: &'a mut dyn Any) -> Result<&'a mut dyn Any, Error> {
        (self.slot_of)(record)
    }

    /// Read the field as `T`.
    ///
    /// Returns `Ok(None)` when an empty link hides the field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if `record` is not an instance of the
    /// root type or `T` is not the declared type.
    pub fn value_as<'a, T: Any>(&self, record: &'a dyn Any) -> Result<Option<&'a T>, Error> {
        let value = self.value_of(record)?;
        match value.value() {
            None => Ok(None),
            Some(value) => value.downcast_ref::<T>().map(Some).ok_or(self.mismatch())
        }
    }

    /// Borrow the field's storage as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if `record` is not an instance of the
    /// root type or `T` is not the declared type.
    pub fn slot_as<'a, T: Any>(&self, record: &'a mut dyn Any) -> Result<&'a mut T, Error> {
        let mismatch = self.mismatch();
        self.slot_of(record)?.downcast_mut::<T>().ok_or(mismatch)
    }

    fn mismatch(&self) -> Error {
        Error::TypeMismatch {
            expected: self.field_type.name
        }
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("identity", &self.identity)
            .field("field_type", &self.field_type.name)
            .field("index_path", &self.index_path)
            .field("embedded", &self.embedded.as_ref().map(|entity| entity.name()))
            .finish_non_exhaustive()
    }
}

/// One planned step of an accessor walk.
#[derive(Clone, Copy)]
struct Step {
    get:     Getter,
    get_mut: GetterMut,
    /// Set on non-final steps that go through an `Option<Box<_>>` link.
    link:    Option<(Getter, GetterMut)>
}

/// Build the [`Field`] for one declared field.
///
/// # Arguments
///
/// * `root` — Schema of the root record the accessors operate on
/// * `decl` — Declaration of the field at the end of `path`
/// * `settings` — Parsed tag of the field
/// * `path` — Path from `root` to the field, already extended by its position
/// * `embedded` — Resolved entity of the embedded record, if any
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] if `path` does not walk through `root`.
pub fn resolve_field(
    root: &'static RecordSchema,
    decl: &'static FieldDecl,
    settings: TagSettings,
    path: IndexPath,
    embedded: Option<Arc<Entity>>
) -> Result<Field, Error> {
    let steps = plan(root, &path)?;
    let is_zero = decl.is_zero;
    let expected = root.name;

    Ok(Field {
        name: decl.name,
        key: settings.name.clone(),
        identity: settings.is_identity(),
        field_type: FieldType {
            name: decl.type_name,
            id:   (decl.type_id)()
        },
        settings,
        value_of: value_accessor(&path, &steps, is_zero, expected),
        slot_of: slot_accessor(&path, &steps, expected),
        index_path: path,
        embedded
    })
}

/// Resolve every path entry against the schemas it walks through.
fn plan(root: &'static RecordSchema, path: &IndexPath) -> Result<Vec<Step>, Error> {
    let invalid = || Error::InvalidPath {
        record: root.qualified_name(),
        path:   path.entries().to_vec()
    };

    let last = path.len().checked_sub(1).ok_or_else(invalid)?;
    let mut schema = root;
    let mut steps = Vec::with_capacity(path.len());

    for (depth, step) in path.steps().enumerate() {
        let decl = schema.fields.get(step.position).ok_or_else(invalid)?;
        let mut link = None;

        if depth < last {
            let embed = decl.embed.ok_or_else(invalid)?;
            match (step.linked, embed) {
                (true, Embed::Linked(ops)) => {
                    link = Some((ops.deref, ops.deref_or_init));
                }
                (false, Embed::Value(_)) => {}
                _ => return Err(invalid())
            }
            schema = embed.schema();
        }

        steps.push(Step {
            get: decl.get,
            get_mut: decl.get_mut,
            link
        });
    }

    Ok(steps)
}

fn value_accessor(
    path: &IndexPath,
    steps: &[Step],
    is_zero: fn(&dyn Any) -> bool,
    expected: &'static str
) -> ValueFn {
    let mismatch = move || Error::TypeMismatch {
        expected
    };

    match (path.entries(), steps) {
        ([_], [only]) => {
            let get = only.get;
            boxed_value(move |record| {
                let value = get(record).ok_or_else(mismatch)?;
                Ok(FieldValue::present(value, is_zero(value)))
            })
        }
        ([outer, _], [parent, child]) if *outer >= 0 => {
            let (get_parent, get_child) = (parent.get, child.get);
            boxed_value(move |record| {
                let parent = get_parent(record).ok_or_else(mismatch)?;
                let value = get_child(parent).ok_or_else(mismatch)?;
                Ok(FieldValue::present(value, is_zero(value)))
            })
        }
        _ => {
            let steps = steps.to_vec();
            boxed_value(move |record| {
                let mut current = record;
                for step in &steps {
                    current = (step.get)(current).ok_or_else(mismatch)?;
                    if let Some((deref, _)) = step.link {
                        match deref(current) {
                            Some(linked) => current = linked,
                            None => return Ok(FieldValue::absent())
                        }
                    }
                }
                Ok(FieldValue::present(current, is_zero(current)))
            })
        }
    }
}

fn slot_accessor(path: &IndexPath, steps: &[Step], expected: &'static str) -> SlotFn {
    let mismatch = move || Error::TypeMismatch {
        expected
    };

    match (path.entries(), steps) {
        ([_], [only]) => {
            let get_mut = only.get_mut;
            boxed_slot(move |record| get_mut(record).ok_or_else(mismatch))
        }
        ([outer, _], [parent, child]) if *outer >= 0 => {
            let (parent_mut, child_mut) = (parent.get_mut, child.get_mut);
            boxed_slot(move |record| {
                let parent = parent_mut(record).ok_or_else(mismatch)?;
                child_mut(parent).ok_or_else(mismatch)
            })
        }
        _ => {
            let steps = steps.to_vec();
            boxed_slot(move |record| {
                let mut current = record;
                for step in &steps {
                    current = (step.get_mut)(current).ok_or_else(mismatch)?;
                    if let Some((_, deref_or_init)) = step.link {
                        current = deref_or_init(current).ok_or_else(mismatch)?;
                    }
                }
                Ok(current)
            })
        }
    }
}

fn boxed_value<F>(accessor: F) -> ValueFn
where
    F: for<'a> Fn(&'a dyn Any) -> Result<FieldValue<'a>, Error> + Send + Sync + 'static
{
    Box::new(accessor)
}

fn boxed_slot<F>(accessor: F) -> SlotFn
where
    F: for<'a> Fn(&'a mut dyn Any) -> Result<&'a mut dyn Any, Error> + Send + Sync + 'static
{
    Box::new(accessor)
}
