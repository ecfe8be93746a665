// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # File Entry Entity
//!
//! One candidate file flowing through the pipeline (spec §3). Created with
//! metadata only during discovery, populated with content during
//! `FileLoadStage`, and mutated in place by transformers and by the limit/
//! char-limit stages. Exclusively owned by the pipeline's in-flight working
//! set (spec §3, "Ownership").

use crate::value_objects::{BinaryCategory, ContentHash, EncodingTag, GitStatus, RelativePath};
use chrono::{DateTime, Utc};

/// One file discovered under the run's base path.
///
/// # Lifecycle
///
/// 1. Created by `FileDiscoveryStage` with path + size + mtime only.
/// 2. `is_binary` / `binary_category` are set once by `FileLoadStage` and
///    never changed thereafter (spec §3 invariant).
/// 3. `content` is populated by `FileLoadStage`, then possibly replaced by
///    transformers (content replacement) or by `CharLimitStage`
///    (truncation).
/// 4. May become `excluded` at any stage; an excluded entry's slot is
///    still present in the working set until `Dedup`/filters drop it,
///    except under the `skip` binary policy where it is replaced with a
///    null placeholder (see `FileEntry::as_skipped`).
#[derive(Debug, Clone)]
pub struct FileEntry {
    relative_path: RelativePath,
    absolute_path: std::path::PathBuf,
    size: u64,
    modified_at: DateTime<Utc>,
    content_hash: Option<ContentHash>,
    git_status: Option<GitStatus>,
    is_binary: bool,
    binary_category: Option<BinaryCategory>,
    encoding: EncodingTag,
    content: Option<String>,
    truncated: bool,
    original_length: Option<usize>,
    line_count: Option<usize>,
    excluded: Option<String>,
    transform_failed: bool,
    line_numbers_skipped: bool,
}

impl FileEntry {
    /// Constructs a discovery-time entry: metadata only, no content yet.
    pub fn discovered(relative_path: RelativePath, absolute_path: std::path::PathBuf, size: u64, modified_at: DateTime<Utc>) -> Self {
        Self {
            relative_path,
            absolute_path,
            size,
            modified_at,
            content_hash: None,
            git_status: None,
            is_binary: false,
            binary_category: None,
            encoding: EncodingTag::Utf8,
            content: None,
            truncated: false,
            original_length: None,
            line_count: None,
            excluded: None,
            transform_failed: false,
            line_numbers_skipped: false,
        }
    }

    pub fn relative_path(&self) -> &RelativePath {
        &self.relative_path
    }

    pub fn absolute_path(&self) -> &std::path::Path {
        &self.absolute_path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    pub fn content_hash(&self) -> Option<&ContentHash> {
        self.content_hash.as_ref()
    }

    pub fn git_status(&self) -> Option<GitStatus> {
        self.git_status
    }

    pub fn set_git_status(&mut self, status: GitStatus) {
        self.git_status = Some(status);
    }

    pub fn is_binary(&self) -> bool {
        self.is_binary
    }

    pub fn binary_category(&self) -> Option<BinaryCategory> {
        self.binary_category
    }

    pub fn encoding(&self) -> EncodingTag {
        self.encoding
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn truncated(&self) -> bool {
        self.truncated
    }

    pub fn original_length(&self) -> Option<usize> {
        self.original_length
    }

    pub fn line_count(&self) -> Option<usize> {
        self.line_count
    }

    pub fn is_excluded(&self) -> bool {
        self.excluded.is_some()
    }

    pub fn exclusion_reason(&self) -> Option<&str> {
        self.excluded.as_deref()
    }

    pub fn transform_failed(&self) -> bool {
        self.transform_failed
    }

    pub fn line_numbers_skipped(&self) -> bool {
        self.line_numbers_skipped
    }

    /// Called exactly once, by `FileLoadStage`. Panics in debug builds if
    /// called twice, enforcing the spec §3 invariant that this classification
    /// never changes after being set.
    pub fn classify_binary(&mut self, is_binary: bool, category: Option<BinaryCategory>) {
        debug_assert!(
            self.content.is_none() && !self.is_binary,
            "binary classification must only be set once, by FileLoadStage"
        );
        self.is_binary = is_binary;
        self.binary_category = category;
    }

    pub fn set_content(&mut self, content: String, encoding: EncodingTag, content_hash: ContentHash) {
        self.content_hash = Some(content_hash);
        self.encoding = encoding;
        self.content = Some(content);
    }

    pub fn set_line_count(&mut self, count: usize) {
        self.line_count = Some(count);
    }

    /// Replaces content, e.g. from a transformer (spec §4.13).
    pub fn replace_content(&mut self, content: String) {
        self.content = Some(content);
    }

    pub fn mark_transform_failed(&mut self, notice: String) {
        self.transform_failed = true;
        self.content = Some(notice);
    }

    /// Truncates to `remaining_budget` characters and records the original
    /// length, per spec §4.14.
    pub fn truncate_to(&mut self, remaining_budget: usize) {
        if let Some(content) = &self.content {
            let original_length = content.chars().count();
            let truncated: String = content.chars().take(remaining_budget).collect();
            self.original_length = Some(original_length);
            self.content = Some(truncated);
            self.truncated = true;
        }
    }

    pub fn exclude(&mut self, reason: impl Into<String>) {
        self.excluded = Some(reason.into());
    }

    pub fn skip_line_numbers(&mut self) {
        self.line_numbers_skipped = true;
    }

    /// A placeholder entry representing a `skip`-policy binary file: its
    /// slot is reserved for formatter pass-through but excluded from file
    /// counts (spec §4.12).
    pub fn is_null_placeholder(&self) -> bool {
        self.excluded.as_deref() == Some("skip")
    }

    pub fn mark_skipped(&mut self) {
        self.content = None;
        self.excluded = Some("skip".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FileEntry {
        FileEntry::discovered(RelativePath::new("src/main.rs"), "/abs/src/main.rs".into(), 42, Utc::now())
    }

    #[test]
    fn truncate_to_preserves_original_length() {
        let mut entry = sample();
        entry.set_content("0123456789".to_string(), EncodingTag::Utf8, ContentHash::of_bytes(b"0123456789"));
        entry.truncate_to(4);
        assert_eq!(entry.content(), Some("0123"));
        assert_eq!(entry.original_length(), Some(10));
        assert!(entry.truncated());
    }

    #[test]
    fn mark_skipped_clears_content_and_marks_placeholder() {
        let mut entry = sample();
        entry.set_content("binary".to_string(), EncodingTag::Base64, ContentHash::of_bytes(b"binary"));
        entry.mark_skipped();
        assert!(entry.content().is_none());
        assert!(entry.is_null_placeholder());
    }
}
