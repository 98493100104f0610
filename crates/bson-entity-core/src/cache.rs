// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Type-keyed store of resolved entities.
//!
//! # Lookup
//!
//! ```text
//! get_or_resolve(&value)
//!   │
//!   ├─► concrete TypeId ──► entries[id] initialized? ──► Arc<Entity>  (fast path)
//!   │
//!   └─► entries[id] cell ──► get_or_try_init ──► resolve_entity  (once per type)
//!                                 │
//!                                 └─► Err: cell left empty, next call retries
//! ```
//!
//! Each type has its own compute-once cell, so callers racing on the same
//! type block until the first one finishes while other types resolve in
//! parallel. The map guard is released before resolution starts, which lets
//! resolution read the cache again without deadlocking.

use std::{
    any::TypeId,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering}
    }
};

use dashmap::DashMap;
use once_cell::sync::{Lazy, OnceCell};
use tracing::{debug, trace};

use crate::{
    entity::{Entity, record_schema, resolve_entity},
    error::Error,
    path::IndexPath,
    schema::{Describe, Record, TypeShape}
};

/// Process-wide cache behind [`crate::resolve`].
static GLOBAL_CACHE: Lazy<MetadataCache> = Lazy::new(MetadataCache::new);

type Slot = Arc<OnceCell<Arc<Entity>>>;

/// Thread-safe cache of resolved entities, keyed by concrete record type.
#[derive(Debug, Default)]
pub struct MetadataCache {
    entries:     DashMap<TypeId, Slot>,
    resolutions: AtomicUsize
}

impl MetadataCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache.
    pub fn global() -> &'static Self {
        &GLOBAL_CACHE
    }

    /// Cached entity of a record type, if resolved.
    pub fn get(&self, type_id: TypeId) -> Option<Arc<Entity>> {
        self.entries
            .get(&type_id)
            .and_then(|slot| slot.get().cloned())
    }

    /// Entity of the record behind `value`, resolving it on first use.
    ///
    /// `value` may be a record or any pointer, slice or array wrapping one.
    ///
    /// # Errors
    ///
    /// Returns the resolution error; it is not cached.
    pub fn get_or_resolve<T: Describe + ?Sized>(&self, _value: &T) -> Result<Arc<Entity>, Error> {
        self.get_or_resolve_shape(T::shape())
    }

    /// Entity of the record type `T`, resolving it on first use.
    ///
    /// # Errors
    ///
    /// Returns the resolution error; it is not cached.
    pub fn get_or_resolve_type<T: Describe + ?Sized>(&self) -> Result<Arc<Entity>, Error> {
        self.get_or_resolve_shape(T::shape())
    }

    /// Entity of the record behind `shape`, resolving it on first use.
    ///
    /// # Errors
    ///
    /// Returns the resolution error; it is not cached.
    pub fn get_or_resolve_shape(&self, shape: TypeShape) -> Result<Arc<Entity>, Error> {
        let schema = record_schema(shape)?;
        let type_id = (schema.type_id)();

        if let Some(entity) = self.get(type_id) {
            trace!(record = schema.name, "entity cache hit");
            return Ok(entity);
        }

        let slot = self.entries.entry(type_id).or_default().clone();
        slot.get_or_try_init(|| {
            self.resolutions.fetch_add(1, Ordering::Relaxed);
            resolve_entity(self, shape, &IndexPath::root()).inspect_err(|err| {
                debug!(record = %schema.qualified_name(), error = %err, "entity resolution failed");
            })
        })
        .cloned()
    }

    /// Check if the entity of `T` is cached.
    pub fn contains<T: Record>(&self) -> bool {
        self.get(TypeId::of::<T>()).is_some()
    }

    /// Number of cached entities.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .count()
    }

    /// Check if no entity is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of resolutions run, failed ones included.
    pub fn resolution_count(&self) -> usize {
        self.resolutions.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        any::{Any, TypeId},
        sync::Barrier,
        thread
    };

    use super::*;
    use crate::{
        schema::{FieldDecl, RecordSchema, result_slice},
        zero::zero_check
    };

    #[derive(Default)]
    struct Account {
        id:    i64,
        email: String
    }

    #[derive(Default)]
    struct Anonymous {
        label: String
    }

    fn account_id(r: &dyn Any) -> Option<&dyn Any> {
        r.downcast_ref::<Account>().map(|r| &r.id as &dyn Any)
    }
    fn account_id_mut(r: &mut dyn Any) -> Option<&mut dyn Any> {
        r.downcast_mut::<Account>().map(|r| &mut r.id as &mut dyn Any)
    }
    fn account_email(r: &dyn Any) -> Option<&dyn Any> {
        r.downcast_ref::<Account>().map(|r| &r.email as &dyn Any)
    }
    fn account_email_mut(r: &mut dyn Any) -> Option<&mut dyn Any> {
        r.downcast_mut::<Account>().map(|r| &mut r.email as &mut dyn Any)
    }
    fn anonymous_label(r: &dyn Any) -> Option<&dyn Any> {
        r.downcast_ref::<Anonymous>().map(|r| &r.label as &dyn Any)
    }
    fn anonymous_label_mut(r: &mut dyn Any) -> Option<&mut dyn Any> {
        r.downcast_mut::<Anonymous>().map(|r| &mut r.label as &mut dyn Any)
    }

    static ACCOUNT: RecordSchema = RecordSchema {
        name:             "Account",
        module_path:      "bank",
        type_id:          TypeId::of::<Account>,
        collection_name:  <Account as Record>::collection_name,
        new_result_slice: result_slice::<Account>,
        fields:           &[
            FieldDecl {
                name:        "id",
                default_key: "id",
                tag:         "_id",
                type_name:   "i64",
                type_id:     TypeId::of::<i64>,
                get:         account_id,
                get_mut:     account_id_mut,
                is_zero:     zero_check::<i64>,
                embed:       None
            },
            FieldDecl {
                name:        "email",
                default_key: "email",
                tag:         "",
                type_name:   "String",
                type_id:     TypeId::of::<String>,
                get:         account_email,
                get_mut:     account_email_mut,
                is_zero:     zero_check::<String>,
                embed:       None
            }
        ]
    };

    static ANONYMOUS: RecordSchema = RecordSchema {
        name:             "Anonymous",
        module_path:      "bank",
        type_id:          TypeId::of::<Anonymous>,
        collection_name:  <Anonymous as Record>::collection_name,
        new_result_slice: result_slice::<Anonymous>,
        fields:           &[FieldDecl {
            name:        "label",
            default_key: "label",
            tag:         "",
            type_name:   "String",
            type_id:     TypeId::of::<String>,
            get:         anonymous_label,
            get_mut:     anonymous_label_mut,
            is_zero:     zero_check::<String>,
            embed:       None
        }]
    };

    impl Record for Account {
        fn schema() -> &'static RecordSchema {
            &ACCOUNT
        }

        fn collection_name() -> Option<String> {
            Some("accounts".to_string())
        }
    }

    impl Describe for Account {
        fn shape() -> TypeShape {
            TypeShape::Record(Account::schema)
        }
    }

    impl Record for Anonymous {
        fn schema() -> &'static RecordSchema {
            &ANONYMOUS
        }
    }

    impl Describe for Anonymous {
        fn shape() -> TypeShape {
            TypeShape::Record(Anonymous::schema)
        }
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    #[test]
    fn repeated_lookups_share_one_entity() {
        init_tracing();
        let cache = MetadataCache::new();
        assert!(cache.is_empty());

        let first = cache.get_or_resolve(&Account::default()).unwrap();
        let second = cache.get_or_resolve(&vec![Box::new(Account::default())]).unwrap();
        let third = cache.get_or_resolve_type::<Option<&Account>>().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first, &third));
        assert_eq!(cache.resolution_count(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains::<Account>());

        assert_eq!(first.collection(), "accounts");
        assert_eq!(first.primary_key_name(), "_id");
        assert_eq!(first.db_names(), ["_id", "email"]);
    }

    #[test]
    fn concurrent_first_use_resolves_once() {
        const THREADS: usize = 16;

        let cache = MetadataCache::new();
        let barrier = Barrier::new(THREADS);

        let entities: Vec<_> = thread::scope(|scope| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        cache.get_or_resolve_type::<Account>().unwrap()
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect()
        });

        assert_eq!(cache.resolution_count(), 1);
        assert!(entities.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
    }

    #[test]
    fn failed_resolution_is_not_cached() {
        init_tracing();
        let cache = MetadataCache::new();

        for _ in 0..2 {
            let err = cache.get_or_resolve(&Anonymous::default()).unwrap_err();
            assert_eq!(err, Error::MissingIdentity {
                record: "bank::Anonymous".to_string()
            });
        }

        assert_eq!(cache.resolution_count(), 2);
        assert!(!cache.contains::<Anonymous>());
        assert!(cache.is_empty());
    }

    #[test]
    fn non_records_never_reach_the_resolver() {
        let cache = MetadataCache::new();
        let err = cache.get_or_resolve(&[1_u32, 2, 3]).unwrap_err();
        assert_eq!(err, Error::UnsupportedType {
            type_name: "u32".to_string()
        });
        assert_eq!(cache.resolution_count(), 0);
    }

    #[test]
    fn resolver_reads_through_the_cache() {
        let cache = MetadataCache::new();
        let cached = cache.get_or_resolve_type::<Account>().unwrap();
        let direct = resolve_entity(&cache, Account::shape(), &IndexPath::root()).unwrap();
        assert!(Arc::ptr_eq(&cached, &direct));
    }
}
