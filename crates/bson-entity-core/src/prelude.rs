// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Convenient re-exports for common usage.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bson_entity_core::prelude::*;
//! ```

pub use crate::{
    Describe, Entity, Error, Field, FieldValue, MetadataCache, Record, TypeShape, ZeroValue,
    resolve
};
