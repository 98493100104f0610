// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Error types for record resolution and field access.
//!
//! | Variant | Raised by | Retry helps |
//! |---------|-----------|-------------|
//! | [`Error::UnsupportedType`] | entity resolver | No, pass a record |
//! | [`Error::MissingIdentity`] | entity resolver | No, fix the record |
//! | [`Error::Tag`] | tag parser | No, fix the tag |
//! | [`Error::RecursiveEmbedding`] | entity resolver | No, fix the record |
//! | [`Error::TypeMismatch`] | field accessors | No, pass the right instance |
//! | [`Error::InvalidPath`] | field resolver, entity resolver (`resolve_entity` with a path) | No |
//!
//! None of these are ever cached: a failed resolution leaves the cache
//! untouched and the next call resolves again.

use thiserror::Error;

/// Errors raised while resolving a record type or accessing its fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The value is not a record, or unwraps to something that is not one.
    ///
    /// Carries the qualified type name, or the bare name for built-in types.
    #[error("unsupported data type: {type_name}")]
    UnsupportedType {
        /// Name of the offending type.
        type_name: String
    },

    /// No field of the record maps to the identity key.
    #[error("identity field `_id` does not exist on record `{record}`")]
    MissingIdentity {
        /// Qualified name of the record.
        record: String
    },

    /// A field tag could not be parsed.
    #[error("invalid tag on `{record}.{field}`: {source}")]
    Tag {
        /// Qualified name of the record.
        record: String,
        /// Declared name of the field.
        field:  &'static str,
        /// Underlying parse failure.
        #[source]
        source: TagError
    },

    /// A record embeds itself, directly or through other records.
    #[error("record `{record}` embeds itself")]
    RecursiveEmbedding {
        /// Qualified name of the record found twice on the embedding chain.
        record: String
    },

    /// An accessor was handed an instance of a different type.
    #[error("value is not an instance of `{expected}`")]
    TypeMismatch {
        /// Name of the type the accessor expected.
        expected: &'static str
    },

    /// An index path does not describe a field of the record.
    #[error("index path {path:?} does not resolve against record `{record}`")]
    InvalidPath {
        /// Qualified name of the root record.
        record: String,
        /// The offending path entries.
        path:   Vec<isize>
    }
}

impl Error {
    /// Check if the error describes a defect in the record definition.
    ///
    /// Schema errors fail identically on every call until the record type is
    /// changed.
    pub const fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Self::MissingIdentity { .. } | Self::Tag { .. } | Self::RecursiveEmbedding { .. }
        )
    }
}

/// Errors raised by the tag parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// A directive has an empty key or an override with an empty value.
    #[error("malformed directive `{0}`")]
    Malformed(String)
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn unsupported_type_display() {
        let err = Error::UnsupportedType {
            type_name: "i32".to_string()
        };
        assert_eq!(err.to_string(), "unsupported data type: i32");
        assert!(!err.is_schema_error());
    }

    #[test]
    fn missing_identity_is_schema_error() {
        let err = Error::MissingIdentity {
            record: "app::User".to_string()
        };
        assert!(err.is_schema_error());
        assert!(err.to_string().contains("app::User"));
    }

    #[test]
    fn invalid_path_display() {
        let err = Error::InvalidPath {
            record: "app::Customer".to_string(),
            path:   vec![2, -4]
        };
        assert!(!err.is_schema_error());
        assert_eq!(
            err.to_string(),
            "index path [2, -4] does not resolve against record `app::Customer`"
        );
    }

    #[test]
    fn tag_error_has_source() {
        let err = Error::Tag {
            record: "app::User".to_string(),
            field:  "name",
            source: TagError::Malformed("=x".to_string())
        };
        assert!(err.source().is_some());
        assert_eq!(
            err.to_string(),
            "invalid tag on `app::User.name`: malformed directive `=x`"
        );
    }
}
