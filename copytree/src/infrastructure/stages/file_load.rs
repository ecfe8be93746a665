// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # FileLoadStage
//!
//! Spec §4.12: reads each entry's content (streaming I/O above a size
//! threshold), classifies binary by sampling up to 512 bytes, and applies
//! the configured per-category binary policy. Line count is computed
//! only below a size threshold.

use async_trait::async_trait;
use base64::Engine;
use copytree_domain::aggregates::WorkingSet;
use copytree_domain::error::{CopyTreeError, CopyTreeResult};
use copytree_domain::repositories::Stage;
use copytree_domain::value_objects::{BinaryCategory, BinaryPolicy, ContentHash, EncodingTag};
use copytree_domain::RunContext;
use memmap2::Mmap;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;

const BINARY_SAMPLE_SIZE: usize = 512;
const BINARY_NON_PRINTABLE_THRESHOLD: f64 = 0.30;
const STREAMING_THRESHOLD_BYTES: u64 = 10 * 1024 * 1024;
const LINE_COUNT_THRESHOLD_BYTES: u64 = 2 * 1024 * 1024;

pub struct FileLoadStage {
    /// Binary policy keyed by category name (`"image"`, `"archive"`,
    /// `"executable"`, `"other"`); missing categories fall back to
    /// `BinaryPolicy::default()` (placeholder).
    pub binary_policies: HashMap<String, BinaryPolicy>,
    /// Per-file size cap (spec §8: a file exactly at the limit is
    /// loaded, one byte over is skipped). `None` disables the check.
    pub max_file_size_bytes: Option<u64>,
}

impl FileLoadStage {
    pub fn new(binary_policies: HashMap<String, BinaryPolicy>) -> Self {
        Self { binary_policies, max_file_size_bytes: None }
    }

    pub fn with_max_file_size(mut self, max_file_size_bytes: Option<u64>) -> Self {
        self.max_file_size_bytes = max_file_size_bytes;
        self
    }

    fn policy_for(&self, category: BinaryCategory) -> BinaryPolicy {
        self.binary_policies.get(&category.to_string()).copied().unwrap_or_default()
    }

    fn read_bytes(path: &std::path::Path, size: u64) -> CopyTreeResult<Vec<u8>> {
        if size > STREAMING_THRESHOLD_BYTES {
            let file = File::open(path).map_err(|err| io_err(path, err))?;
            let mmap = unsafe { Mmap::map(&file) }.map_err(|err| io_err(path, err))?;
            Ok(mmap.to_vec())
        } else {
            std::fs::read(path).map_err(|err| io_err(path, err))
        }
    }

    fn is_binary_sample(bytes: &[u8]) -> bool {
        let sample = &bytes[..bytes.len().min(BINARY_SAMPLE_SIZE)];
        if sample.is_empty() {
            return false;
        }
        if sample.contains(&0u8) {
            return true;
        }
        let non_printable = sample
            .iter()
            .filter(|&&b| b != b'\n' && b != b'\r' && b != b'\t' && !(0x20..=0x7e).contains(&b))
            .count();
        (non_printable as f64 / sample.len() as f64) > BINARY_NON_PRINTABLE_THRESHOLD
    }
}

fn io_err(path: &std::path::Path, err: std::io::Error) -> CopyTreeError {
    CopyTreeError::Path {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[async_trait]
impl Stage for FileLoadStage {
    fn name(&self) -> &str {
        "FileLoad"
    }

    async fn process(&self, mut input: WorkingSet, context: &RunContext) -> CopyTreeResult<WorkingSet> {
        let mut dropped = 0usize;

        for file in input.files_mut().iter_mut() {
            if context.is_cancelled() {
                break;
            }

            if let Some(max_size) = self.max_file_size_bytes {
                if file.size() > max_size {
                    file.exclude(format!("exceeds max file size ({} > {} bytes)", file.size(), max_size));
                    dropped += 1;
                    continue;
                }
            }

            let bytes = match Self::read_bytes(file.absolute_path(), file.size()) {
                Ok(bytes) => bytes,
                Err(err) => {
                    if context.continue_on_error {
                        file.exclude(err.to_string());
                        dropped += 1;
                        continue;
                    }
                    return Err(err);
                }
            };

            let is_binary = Self::is_binary_sample(&bytes);
            let category = if is_binary {
                Some(BinaryCategory::from_extension(file.relative_path().extension()))
            } else {
                None
            };
            file.classify_binary(is_binary, category);

            let content_hash = ContentHash::of_bytes(&bytes);

            if is_binary {
                let category = category.unwrap_or(BinaryCategory::Other);
                match self.policy_for(category) {
                    BinaryPolicy::Placeholder => {
                        let notice = format!("[binary file: {category}, {} bytes, {}]", bytes.len(), file.relative_path());
                        file.set_content(notice, EncodingTag::Placeholder, content_hash);
                    }
                    BinaryPolicy::Base64 => {
                        let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
                        file.set_content(encoded, EncodingTag::Base64, content_hash);
                        file.skip_line_numbers();
                    }
                    BinaryPolicy::Skip => {
                        file.mark_skipped();
                    }
                    BinaryPolicy::Comment => {
                        let notice = format!("binary file {} ({} bytes)", file.relative_path(), bytes.len());
                        file.set_content(notice, EncodingTag::Placeholder, content_hash);
                    }
                }
            } else {
                let text = String::from_utf8_lossy(&bytes).into_owned();
                if file.size() <= LINE_COUNT_THRESHOLD_BYTES {
                    file.set_line_count(text.lines().count());
                }
                file.set_content(text, EncodingTag::Utf8, content_hash);
            }
        }

        // Entries excluded during this stage (oversized, unreadable) never
        // reach a later filter stage in the canonical order (spec §2 runs
        // FileLoad after Dedup/Sort/Limit), so drop them here. `skip`
        // binary-policy placeholders are kept: their slot is reserved for
        // formatter pass-through (spec §4.12).
        input.files_mut().retain(|file| !file.is_excluded() || file.is_null_placeholder());

        input.record_dropped(dropped);
        Ok(input)
    }
}
