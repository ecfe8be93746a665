// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Filesystem-Backed Content Reader
//!
//! The concrete `ContentReader` the domain's `RuleEvaluator` reads
//! content-bearing fields through, backed by `std::fs`. Lives in
//! infrastructure, not domain, per `copytree_domain::services::
//! rule_evaluator`'s doc comment: "infrastructure::stages supplies the
//! concrete reader backed by std::fs."

use copytree_domain::entities::FileEntry;
use copytree_domain::error::{CopyTreeError, CopyTreeResult};
use copytree_domain::services::ContentReader;
use std::io::Read;

pub struct FilesystemContentReader;

impl FilesystemContentReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FilesystemContentReader {
    fn default() -> Self {
        Self::new()
    }
}

/// A small, dependency-free extension-to-MIME-type table covering the file
/// kinds the rule evaluator's `mimeType` field and the transformer
/// registry's mime-based matching need to recognize (spec §3, §4.3).
pub(crate) fn guess_mime_type(extension: &str) -> String {
    let mime = match extension.to_ascii_lowercase().as_str() {
        "txt" | "md" | "markdown" => "text/plain",
        "rs" | "py" | "js" | "ts" | "go" | "c" | "h" | "cpp" | "hpp" | "java" | "rb" | "sh" => "text/x-source",
        "json" => "application/json",
        "yaml" | "yml" => "application/yaml",
        "toml" => "application/toml",
        "xml" => "application/xml",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "csv" => "text/csv",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "zip" => "application/zip",
        "" => "application/octet-stream",
        other => return format!("application/x-{other}"),
    };
    mime.to_string()
}

impl ContentReader for FilesystemContentReader {
    fn read_contents(&self, file: &FileEntry) -> CopyTreeResult<String> {
        if let Some(content) = file.content() {
            return Ok(content.to_string());
        }
        std::fs::read_to_string(file.absolute_path()).map_err(|err| CopyTreeError::FieldRead {
            field: "contents".to_string(),
            path: file.absolute_path().to_path_buf(),
            message: err.to_string(),
        })
    }

    fn read_contents_slice(&self, file: &FileEntry, max_bytes: usize) -> CopyTreeResult<String> {
        if let Some(content) = file.content() {
            return Ok(content.chars().take(max_bytes).collect());
        }
        let mut f = std::fs::File::open(file.absolute_path()).map_err(|err| CopyTreeError::FieldRead {
            field: "contents_slice".to_string(),
            path: file.absolute_path().to_path_buf(),
            message: err.to_string(),
        })?;
        let mut buf = vec![0u8; max_bytes];
        let n = f.read(&mut buf).map_err(|err| CopyTreeError::FieldRead {
            field: "contents_slice".to_string(),
            path: file.absolute_path().to_path_buf(),
            message: err.to_string(),
        })?;
        buf.truncate(n);
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn mime_type(&self, file: &FileEntry) -> String {
        guess_mime_type(file.relative_path().extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use copytree_domain::value_objects::RelativePath;

    #[test]
    fn reads_contents_already_populated_on_the_entry() {
        let mut entry = FileEntry::discovered(RelativePath::new("a.txt"), "/tmp/a.txt".into(), 3, Utc::now());
        entry.set_content("abc".to_string(), copytree_domain::value_objects::EncodingTag::Utf8, copytree_domain::value_objects::ContentHash::of_bytes(b"abc"));
        let reader = FilesystemContentReader::new();
        assert_eq!(reader.read_contents(&entry).unwrap(), "abc");
    }

    #[test]
    fn mime_type_infers_from_extension() {
        let entry = FileEntry::discovered(RelativePath::new("a.json"), "/tmp/a.json".into(), 0, Utc::now());
        let reader = FilesystemContentReader::new();
        assert_eq!(reader.mime_type(&entry), "application/json");
    }
}
