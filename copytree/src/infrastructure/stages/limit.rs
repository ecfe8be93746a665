// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # LimitStage
//!
//! Spec §4.11: truncates the list to a configured maximum file count and
//! enforces a maximum total aggregate size by dropping the largest files
//! last until the budget holds. Both limits are independently
//! configurable; dropped entries are recorded on the working set.

use async_trait::async_trait;
use copytree_domain::aggregates::WorkingSet;
use copytree_domain::error::CopyTreeResult;
use copytree_domain::repositories::Stage;
use copytree_domain::RunContext;

pub struct LimitStage {
    pub max_files: Option<usize>,
    pub max_total_size: Option<u64>,
}

impl LimitStage {
    pub fn new(max_files: Option<usize>, max_total_size: Option<u64>) -> Self {
        Self { max_files, max_total_size }
    }
}

#[async_trait]
impl Stage for LimitStage {
    fn name(&self) -> &str {
        "Limit"
    }

    async fn process(&self, input: WorkingSet, _context: &RunContext) -> CopyTreeResult<WorkingSet> {
        let mut files = input.into_files();
        let mut dropped = 0usize;

        if let Some(max_files) = self.max_files {
            if files.len() > max_files {
                dropped += files.len() - max_files;
                files.truncate(max_files);
            }
        }

        if let Some(max_total_size) = self.max_total_size {
            let mut total: u64 = files.iter().map(|f| f.size()).sum();
            while total > max_total_size && !files.is_empty() {
                let (largest_index, _) = files
                    .iter()
                    .enumerate()
                    .max_by_key(|(_, f)| f.size())
                    .expect("files is non-empty");
                let removed = files.remove(largest_index);
                total -= removed.size();
                dropped += 1;
            }
        }

        let mut output = WorkingSet::new(files);
        output.record_dropped(dropped);
        Ok(output)
    }
}
