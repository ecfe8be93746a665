// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Binary Category Value Object

use std::fmt;

/// Coarse classification of a binary file, used to pick a per-category
/// binary policy (spec §4.12) and to annotate formatter output (spec
/// §4.16, `binaryCategory` attribute).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum BinaryCategory {
    Image,
    Archive,
    Executable,
    Other,
}

impl BinaryCategory {
    /// Classifies a file by its extension. Falls back to `Other` for
    /// anything unrecognized; the actual binary/text decision is made
    /// separately by content sampling (spec §4.12), this only refines the
    /// category once a file is already known to be binary.
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "webp" | "ico" | "tiff" => Self::Image,
            "zip" | "tar" | "gz" | "bz2" | "xz" | "7z" | "rar" | "zst" => Self::Archive,
            "exe" | "dll" | "so" | "dylib" | "bin" | "o" | "a" => Self::Executable,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for BinaryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Image => "image",
            Self::Archive => "archive",
            Self::Executable => "executable",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_extensions() {
        assert_eq!(BinaryCategory::from_extension("png"), BinaryCategory::Image);
        assert_eq!(BinaryCategory::from_extension("ZIP"), BinaryCategory::Archive);
        assert_eq!(BinaryCategory::from_extension("so"), BinaryCategory::Executable);
        assert_eq!(BinaryCategory::from_extension("xyz"), BinaryCategory::Other);
    }
}
