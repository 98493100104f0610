// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

// Re-export all core types
pub use bson_entity_core::*;
// Re-export derive macro
pub use bson_entity_derive::Record;

/// Convenient re-exports, derive macro included.
///
/// ```rust,ignore
/// use bson_entity::prelude::*;
/// ```
pub mod prelude {
    pub use bson_entity_core::prelude::*;
    pub use bson_entity_derive::Record;
}
