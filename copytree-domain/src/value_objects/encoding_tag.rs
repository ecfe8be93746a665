// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Encoding Tag Value Object

use std::fmt;

/// How a `FileEntry`'s `content` field should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum EncodingTag {
    /// `content` is a UTF-8 string.
    Utf8,
    /// `content` is a base64-encoded payload (binary policy `base64`).
    Base64,
    /// `content` was replaced with a short human-readable notice.
    Placeholder,
}

impl fmt::Display for EncodingTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Utf8 => "utf-8",
            Self::Base64 => "base64",
            Self::Placeholder => "placeholder",
        };
        f.write_str(s)
    }
}
