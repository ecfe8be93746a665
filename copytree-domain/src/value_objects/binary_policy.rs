// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Binary Policy Value Object

use std::fmt;
use std::str::FromStr;

/// How a binary (or excluded) file's body should be rendered, per spec
/// §4.12 / §4.16. Configurable per `BinaryCategory`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum BinaryPolicy {
    /// Replace content with a short notice (type, size, path).
    #[default]
    Placeholder,
    /// Encode the content as base64.
    Base64,
    /// Replace the entry with a null placeholder; its slot is reserved for
    /// formatter pass-through and excluded from file counts.
    Skip,
    /// Render as a format-appropriate comment at output time.
    Comment,
}

impl fmt::Display for BinaryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Placeholder => "placeholder",
            Self::Base64 => "base64",
            Self::Skip => "skip",
            Self::Comment => "comment",
        };
        f.write_str(s)
    }
}

impl FromStr for BinaryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "placeholder" => Ok(Self::Placeholder),
            "base64" => Ok(Self::Base64),
            "skip" => Ok(Self::Skip),
            "comment" => Ok(Self::Comment),
            other => Err(format!("unknown binary policy {other:?}")),
        }
    }
}
