// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Record-level attribute parsing with darling.
//!
//! # Supported Attributes
//!
//! | Attribute | Required | Default | Description |
//! |-----------|----------|---------|-------------|
//! | `collection` | No | type name, lowercased initial | Collection name |
//! | `rename_all` | No | field name as written | Default key casing |

use convert_case::{Case, Casing};
use darling::{FromDeriveInput, FromMeta};
use syn::Ident;

/// Record-level attributes parsed from `#[bson(...)]`.
///
/// # Example
///
/// ```rust,ignore
/// #[bson(collection = "people", rename_all = "camelCase")]
/// ```
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(bson))]
pub struct RecordAttrs {
    /// Struct identifier (e.g., `User`).
    pub ident: Ident,

    /// Collection name override.
    #[darling(default)]
    pub collection: Option<String>,

    /// Casing applied to field names to form default keys.
    #[darling(default)]
    pub rename_all: Option<RenameRule>
}

/// Casing rule for default document keys.
///
/// An explicit key in a field tag always wins over the rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    /// `lowercase`
    Lower,
    /// `UPPERCASE`
    Upper,
    /// `camelCase`
    Camel,
    /// `PascalCase`
    Pascal,
    /// `snake_case`
    Snake,
    /// `SCREAMING_SNAKE_CASE`
    ScreamingSnake,
    /// `kebab-case`
    Kebab
}

impl RenameRule {
    /// Apply the rule to a field name.
    pub fn apply(self, name: &str) -> String {
        match self {
            Self::Lower => name.to_lowercase(),
            Self::Upper => name.to_uppercase(),
            Self::Camel => name.to_case(Case::Camel),
            Self::Pascal => name.to_case(Case::Pascal),
            Self::Snake => name.to_case(Case::Snake),
            Self::ScreamingSnake => name.to_case(Case::Snake).to_uppercase(),
            Self::Kebab => name.to_case(Case::Kebab)
        }
    }
}

impl FromMeta for RenameRule {
    /// Parse a rule from its serde-style spelling.
    fn from_string(value: &str) -> darling::Result<Self> {
        match value {
            "lowercase" => Ok(Self::Lower),
            "UPPERCASE" => Ok(Self::Upper),
            "camelCase" => Ok(Self::Camel),
            "PascalCase" => Ok(Self::Pascal),
            "snake_case" => Ok(Self::Snake),
            "SCREAMING_SNAKE_CASE" => Ok(Self::ScreamingSnake),
            "kebab-case" => Ok(Self::Kebab),
            _ => Err(darling::Error::unknown_value(value))
        }
    }
}
