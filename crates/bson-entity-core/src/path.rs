// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Index paths from a root record to one of its (possibly embedded) fields.
//!
//! Each entry is a declared field position at one level of embedding:
//!
//! ```text
//! entry >= 0   descend into field `entry` by value
//! entry <  0   descend through the `Option<Box<_>>` field at `-entry - 1`
//! ```
//!
//! Paths are never extended in place. [`IndexPath::child`] and
//! [`IndexPath::linked_child`] copy into a fresh sequence so sibling paths
//! that share a prefix never alias each other's storage.

use std::fmt;

/// Ordered field positions leading from a root record to a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct IndexPath(Vec<isize>);

/// One decoded path entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    /// Declared field position at this level.
    pub position: usize,

    /// Step goes through an optional boxed link.
    pub linked: bool
}

impl IndexPath {
    /// The empty path of a root record.
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Build a path from raw entries.
    pub fn from_entries(entries: impl Into<Vec<isize>>) -> Self {
        Self(entries.into())
    }

    /// Copy this path and append a by-value step.
    pub fn child(&self, position: usize) -> Self {
        self.extended(encode(position, false))
    }

    /// Copy this path and append a step through an optional boxed link.
    pub fn linked_child(&self, position: usize) -> Self {
        self.extended(encode(position, true))
    }

    /// Raw entries, sign-encoded.
    pub fn entries(&self) -> &[isize] {
        &self.0
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if this is the root path.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decoded steps in order.
    pub fn steps(&self) -> impl ExactSizeIterator<Item = PathStep> + '_ {
        self.0.iter().map(|&entry| decode(entry))
    }

    /// Declared position of the field at the end of the path.
    pub fn last_position(&self) -> Option<usize> {
        self.0.last().map(|&entry| decode(entry).position)
    }

    fn extended(&self, entry: isize) -> Self {
        let mut entries = Vec::with_capacity(self.0.len() + 1);
        entries.extend_from_slice(&self.0);
        entries.push(entry);
        Self(entries)
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Encode a declared position into a path entry.
pub const fn encode(position: usize, linked: bool) -> isize {
    let position = position as isize;
    if linked { -position - 1 } else { position }
}

/// Decode a path entry into its declared position and link flag.
pub const fn decode(entry: isize) -> PathStep {
    if entry >= 0 {
        PathStep {
            position: entry as usize,
            linked:   false
        }
    } else {
        PathStep {
            position: (-entry - 1) as usize,
            linked:   true
        }
    }
}
