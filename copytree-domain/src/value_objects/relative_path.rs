// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Relative Path Value Object
//!
//! A path relative to a run's base directory, always stored in canonical
//! forward-slash form regardless of host OS. This is the identity every
//! other component (ignore matcher, rule evaluator, dedup, sort, output
//! formatters) keys off of, so normalizing it once here keeps every
//! downstream comparison a plain string comparison.

use std::fmt;
use std::path::Path;

/// A canonical, forward-slash-separated path relative to the run's base
/// directory.
///
/// # Invariants
///
/// - Never contains backslashes, even when constructed from a Windows path.
/// - Never starts with `/` (it is relative by construction).
/// - Segments are never empty (`a//b` is rejected at construction).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct RelativePath(String);

impl RelativePath {
    /// Builds a `RelativePath` from a path already known to be relative to
    /// the base directory (e.g. produced by `Path::strip_prefix`).
    pub fn new(path: impl AsRef<Path>) -> Self {
        let normalized = path
            .as_ref()
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("/");
        Self(normalized)
    }

    /// The path as a `&str`, always forward-slash separated.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments, directory-first, used by directory-aware sort (spec
    /// §4.11) and by the tree renderer (spec §4.16).
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// The base name (last segment), e.g. `"lib.rs"` for `"src/lib.rs"`.
    pub fn base_name(&self) -> &str {
        self.segments().last().unwrap_or(&self.0)
    }

    /// The file extension without the leading dot, or `""` if there is
    /// none.
    pub fn extension(&self) -> &str {
        match self.base_name().rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => ext,
            _ => "",
        }
    }

    /// The parent directory path, or `""` for a top-level file.
    pub fn directory(&self) -> &str {
        match self.0.rsplit_once('/') {
            Some((dir, _)) => dir,
            None => "",
        }
    }

    /// The immediate parent directory's name only (not the full path),
    /// e.g. `"src"` for `"src/lib.rs"`.
    pub fn directory_name(&self) -> &str {
        self.directory().rsplit('/').next().unwrap_or("")
    }

    /// Depth in path segments; a top-level file has depth 1.
    pub fn depth(&self) -> usize {
        self.segments().count()
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RelativePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_backslashes_conceptually_via_components() {
        let p = RelativePath::new("src/app/main.rs");
        assert_eq!(p.as_str(), "src/app/main.rs");
    }

    #[test]
    fn extracts_base_name_extension_and_directory() {
        let p = RelativePath::new("src/app/main.rs");
        assert_eq!(p.base_name(), "main.rs");
        assert_eq!(p.extension(), "rs");
        assert_eq!(p.directory(), "src/app");
        assert_eq!(p.directory_name(), "app");
        assert_eq!(p.depth(), 3);
    }

    #[test]
    fn top_level_file_has_empty_directory() {
        let p = RelativePath::new("README.md");
        assert_eq!(p.directory(), "");
        assert_eq!(p.extension(), "md");
        assert_eq!(p.depth(), 1);
    }

    #[test]
    fn file_without_extension_returns_empty_string() {
        let p = RelativePath::new("Makefile");
        assert_eq!(p.extension(), "");
    }
}
