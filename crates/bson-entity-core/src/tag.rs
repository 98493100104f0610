// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field tag parsing.
//!
//! A tag is the raw directive string attached to a field in the
//! [`TAG_NAMESPACE`](crate::TAG_NAMESPACE) attribute. Directives are separated
//! by `,` or `;`:
//!
//! ```text
//! "_id,omitempty"          key `_id` (identity), omitempty
//! "hello_world"            key `hello_world`
//! ",inline"                default key, embedded record
//! "-"                      skipped
//! "name=orderId;omitempty" key `orderId`, omitempty
//! ```
//!
//! # Directives
//!
//! | Directive | Position | Effect |
//! |-----------|----------|--------|
//! | `<key>` | first | Document key; empty keeps the default |
//! | `-` | first | Skip the field |
//! | `name=<key>`, `key=<key>` | any | Document key override |
//! | `inline` | later | Embed the field's record type |
//! | `omitempty` | later | Omit zero values when encoding |
//! | `minsize` | later | Encode integers in the smallest width |
//! | `truncate` | later | Allow lossy float truncation |
//! | `skip` | later | Skip the field |
//!
//! Unknown flags and unknown `key=value` pairs are ignored.

use crate::{IDENTITY_KEY, error::TagError};

/// Parsed settings of one field tag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagSettings {
    /// Resolved document key.
    pub name: String,

    /// Field is excluded from the document.
    pub skip: bool,

    /// Field embeds a record whose fields are promoted into the parent.
    pub inline: bool,

    /// Zero values are omitted when encoding.
    pub omit_empty: bool,

    /// Integers are encoded in the smallest width that fits.
    pub min_size: bool,

    /// Floats may be truncated when decoding into narrower types.
    pub truncate: bool
}

impl TagSettings {
    /// Check if the resolved key is the reserved identity key.
    pub fn is_identity(&self) -> bool {
        self.name == IDENTITY_KEY
    }
}

/// Parse a raw tag into [`TagSettings`].
///
/// # Arguments
///
/// * `default_name` — Key used when the tag names none
/// * `raw` — Raw directive string, possibly empty
///
/// # Errors
///
/// Returns [`TagError::Malformed`] for a directive with an empty key
/// (`=value`) or a key override with an empty value (`name=`).
///
/// # Example
///
/// ```rust
/// use bson_entity_core::tag::parse_tag;
///
/// let settings = parse_tag("id", "_id,omitempty").unwrap();
/// assert_eq!(settings.name, "_id");
/// assert!(settings.is_identity());
/// assert!(settings.omit_empty);
/// ```
pub fn parse_tag(default_name: &str, raw: &str) -> Result<TagSettings, TagError> {
    let mut settings = TagSettings {
        name: default_name.to_string(),
        ..TagSettings::default()
    };

    for (position, token) in raw.split([',', ';']).map(str::trim).enumerate() {
        if let Some((key, value)) = token.split_once('=') {
            apply_setting(&mut settings, token, key.trim(), value.trim())?;
            continue;
        }

        match (position, token) {
            (_, "") => {}
            (0, "-") => settings.skip = true,
            (0, name) => settings.name = name.to_string(),
            (_, flag) => apply_flag(&mut settings, flag)
        }
    }

    Ok(settings)
}

fn apply_setting(
    settings: &mut TagSettings,
    token: &str,
    key: &str,
    value: &str
) -> Result<(), TagError> {
    if key.is_empty() {
        return Err(TagError::Malformed(token.to_string()));
    }

    if key.eq_ignore_ascii_case("name") || key.eq_ignore_ascii_case("key") {
        if value.is_empty() {
            return Err(TagError::Malformed(token.to_string()));
        }
        settings.name = value.to_string();
    }

    Ok(())
}

fn apply_flag(settings: &mut TagSettings, flag: &str) {
    match flag.to_ascii_lowercase().as_str() {
        "inline" => settings.inline = true,
        "omitempty" => settings.omit_empty = true,
        "minsize" => settings.min_size = true,
        "truncate" => settings.truncate = true,
        "skip" | "-" => settings.skip = true,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tag_keeps_default_name() {
        let settings = parse_tag("userPassword", "").unwrap();
        assert_eq!(settings.name, "userPassword");
        assert!(!settings.skip);
        assert!(!settings.inline);
        assert!(!settings.is_identity());
    }

    #[test]
    fn explicit_name() {
        let settings = parse_tag("age", "happy").unwrap();
        assert_eq!(settings.name, "happy");
    }

    #[test]
    fn identity_with_flags() {
        let settings = parse_tag("id", "_id,omitempty").unwrap();
        assert!(settings.is_identity());
        assert!(settings.omit_empty);
    }

    #[test]
    fn identity_is_case_sensitive() {
        let settings = parse_tag("id", "_ID").unwrap();
        assert!(!settings.is_identity());
    }

    #[test]
    fn dash_skips() {
        assert!(parse_tag("secret", "-").unwrap().skip);
        assert!(parse_tag("secret", " - ").unwrap().skip);
    }

    #[test]
    fn skip_flag() {
        assert!(parse_tag("secret", ",skip").unwrap().skip);
    }

    #[test]
    fn inline_with_default_name() {
        let settings = parse_tag("address", ",inline").unwrap();
        assert_eq!(settings.name, "address");
        assert!(settings.inline);
    }

    #[test]
    fn semicolon_separated_settings() {
        let settings = parse_tag("order_id", "name=orderId;omitempty;minsize").unwrap();
        assert_eq!(settings.name, "orderId");
        assert!(settings.omit_empty);
        assert!(settings.min_size);
        assert!(!settings.truncate);
    }

    #[test]
    fn key_override_wins_over_positional() {
        let settings = parse_tag("a", "first,key=second").unwrap();
        assert_eq!(settings.name, "second");
    }

    #[test]
    fn override_to_identity() {
        let settings = parse_tag("id", "name=_id").unwrap();
        assert!(settings.is_identity());
    }

    #[test]
    fn unknown_directives_ignored() {
        let settings = parse_tag("a", "b,frobnicate,color=red").unwrap();
        assert_eq!(settings.name, "b");
        assert_eq!(
            settings,
            TagSettings {
                name: "b".to_string(),
                ..TagSettings::default()
            }
        );
    }

    #[test]
    fn empty_key_is_malformed() {
        let err = parse_tag("a", "b,=x").unwrap_err();
        assert_eq!(err, TagError::Malformed("=x".to_string()));
    }

    #[test]
    fn empty_override_is_malformed() {
        assert!(parse_tag("a", "name=").is_err());
    }
}
