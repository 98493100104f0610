// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Zero-value detection for field values.
//!
//! Value accessors report whether the current value is its type's zero value
//! so callers can honour `omitempty`. Derived records are zero when all of
//! their non-skipped fields are.
//!
//! # Field Zero Checks
//!
//! The derive picks the check of each mapped field in this order:
//!
//! | Source | Requirement | Check |
//! |--------|-------------|-------|
//! | `#[bson("...", zero = "path")]` | `fn(&T) -> bool` | [`zero_check_with`] |
//! | [`ZeroValue`] impl | `T: ZeroValue` | [`zero_check`] |
//! | fallback | `T: Default + PartialEq` | [`default_zero_check`] |
//!
//! The fallback covers types from other crates, such as
//! `std::time::Duration`, that cannot implement [`ZeroValue`] outside their
//! own crate. Local types can also opt in through
//! [`zero_by_default!`](crate::zero_by_default).

use std::{
    any::Any,
    collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque},
    marker::PhantomData,
    rc::Rc,
    sync::Arc
};

/// Detects the zero value of a type.
pub trait ZeroValue {
    /// Check if `self` is the zero value of its type.
    fn is_zero(&self) -> bool;
}

/// Implement [`ZeroValue`] as equality with `Default::default()`.
///
/// # Example
///
/// ```rust
/// use bson_entity_core::{ZeroValue, zero_by_default};
///
/// #[derive(Default, PartialEq)]
/// struct Millis(u64);
///
/// zero_by_default!(Millis);
///
/// assert!(Millis(0).is_zero());
/// assert!(!Millis(5).is_zero());
/// ```
#[macro_export]
macro_rules! zero_by_default {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::ZeroValue for $ty {
                fn is_zero(&self) -> bool {
                    *self == <$ty as ::core::default::Default>::default()
                }
            }
        )+
    };
}

zero_by_default!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, ()
);

impl ZeroValue for String {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl ZeroValue for &str {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T> ZeroValue for Option<T> {
    fn is_zero(&self) -> bool {
        self.is_none()
    }
}

impl<T: ZeroValue + ?Sized> ZeroValue for Box<T> {
    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }
}

impl<T: ZeroValue + ?Sized> ZeroValue for Arc<T> {
    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }
}

impl<T: ZeroValue + ?Sized> ZeroValue for Rc<T> {
    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }
}

impl<T> ZeroValue for Vec<T> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T> ZeroValue for VecDeque<T> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T: ZeroValue, const N: usize> ZeroValue for [T; N] {
    fn is_zero(&self) -> bool {
        self.iter().all(ZeroValue::is_zero)
    }
}

impl<K, V, S> ZeroValue for HashMap<K, V, S> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V> ZeroValue for BTreeMap<K, V> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T, S> ZeroValue for HashSet<T, S> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T> ZeroValue for BTreeSet<T> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

/// Type-erased zero check for a field of type `T`.
///
/// A value of another type counts as zero.
pub fn zero_check<T: ZeroValue + Any>(value: &dyn Any) -> bool {
    value.downcast_ref::<T>().is_none_or(ZeroValue::is_zero)
}

/// Type-erased zero check comparing against `T::default()`.
///
/// A value of another type counts as zero.
pub fn default_zero_check<T: Default + PartialEq + Any>(value: &dyn Any) -> bool {
    value
        .downcast_ref::<T>()
        .is_none_or(|value| *value == T::default())
}

/// Type-erased zero check through a caller-supplied function.
///
/// A value of another type counts as zero.
///
/// # Example
///
/// ```rust
/// use std::net::Ipv4Addr;
///
/// use bson_entity_core::zero::zero_check_with;
///
/// assert!(zero_check_with(&Ipv4Addr::UNSPECIFIED, Ipv4Addr::is_unspecified));
/// assert!(!zero_check_with(&Ipv4Addr::LOCALHOST, Ipv4Addr::is_unspecified));
/// ```
pub fn zero_check_with<T: Any>(value: &dyn Any, check: fn(&T) -> bool) -> bool {
    value.downcast_ref::<T>().is_none_or(check)
}

/// Selects the zero check of a field type at the call site.
///
/// Method lookup on `&ZeroDispatch<T>` finds [`ByZeroValue`] first and falls
/// back to [`ByDefault`] through one more autoref, so a [`ZeroValue`] impl
/// wins whenever it exists.
///
/// ```rust
/// use std::time::Duration;
///
/// use bson_entity_core::zero::{ByDefault as _, ByZeroValue as _, ZeroDispatch};
///
/// let check = (&ZeroDispatch::<Duration>::new()).zero_check();
/// assert!(check(&Duration::ZERO));
/// assert!(!check(&Duration::from_secs(1)));
/// ```
#[doc(hidden)]
pub struct ZeroDispatch<T>(PhantomData<fn() -> T>);

impl<T> ZeroDispatch<T> {
    /// Dispatcher for fields of type `T`.
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for ZeroDispatch<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Zero check of a type implementing [`ZeroValue`].
#[doc(hidden)]
pub trait ByZeroValue {
    /// Erased check for the dispatched type.
    fn zero_check(&self) -> fn(&dyn Any) -> bool;
}

impl<T: ZeroValue + Any> ByZeroValue for ZeroDispatch<T> {
    fn zero_check(&self) -> fn(&dyn Any) -> bool {
        zero_check::<T>
    }
}

/// Zero check of a type comparable with its default.
#[doc(hidden)]
pub trait ByDefault {
    /// Erased check for the dispatched type.
    fn zero_check(&self) -> fn(&dyn Any) -> bool;
}

impl<T: Default + PartialEq + Any> ByDefault for &ZeroDispatch<T> {
    fn zero_check(&self) -> fn(&dyn Any) -> bool {
        default_zero_check::<T>
    }
}
