// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # DedupStage
//!
//! Spec §4.11: groups entries by content hash, retaining the entry with
//! the shortest relative path (ties broken lexicographically). Content
//! hashes are computed here from disk since `Dedup` runs ahead of
//! `FileLoadStage` in the canonical order.

use async_trait::async_trait;
use copytree_domain::aggregates::WorkingSet;
use copytree_domain::entities::FileEntry;
use copytree_domain::error::CopyTreeResult;
use copytree_domain::repositories::Stage;
use copytree_domain::value_objects::ContentHash;
use copytree_domain::RunContext;
use std::collections::HashMap;

pub struct DedupStage;

impl DedupStage {
    fn content_hash_of(file: &FileEntry) -> Option<ContentHash> {
        if let Some(existing) = file.content_hash() {
            return Some(*existing);
        }
        std::fs::read(file.absolute_path()).ok().map(|bytes| ContentHash::of_bytes(&bytes))
    }
}

#[async_trait]
impl Stage for DedupStage {
    fn name(&self) -> &str {
        "Dedup"
    }

    async fn process(&self, input: WorkingSet, _context: &RunContext) -> CopyTreeResult<WorkingSet> {
        let mut by_hash: HashMap<ContentHash, FileEntry> = HashMap::new();
        let mut duplicates_removed = 0usize;

        for file in input.into_files() {
            let Some(hash) = Self::content_hash_of(&file) else {
                // Unreadable at this point; keep it, later stages surface the read error.
                by_hash.insert(ContentHash::of_bytes(file.relative_path().as_str().as_bytes()), file);
                continue;
            };
            match by_hash.get(&hash) {
                Some(existing) => {
                    duplicates_removed += 1;
                    let existing_path = existing.relative_path().as_str();
                    let candidate_path = file.relative_path().as_str();
                    let candidate_is_shorter = candidate_path.len() < existing_path.len()
                        || (candidate_path.len() == existing_path.len() && candidate_path < existing_path);
                    if candidate_is_shorter {
                        by_hash.insert(hash, file);
                    }
                }
                None => {
                    by_hash.insert(hash, file);
                }
            }
        }

        let mut output = WorkingSet::new(by_hash.into_values().collect());
        output.record_duplicates_removed(duplicates_removed);
        Ok(output)
    }
}
