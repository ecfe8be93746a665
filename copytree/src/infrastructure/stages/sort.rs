// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # SortStage
//!
//! Spec §4.11: deterministic, directory-aware lexicographic ordering by
//! relative path, segment by segment (`--order-by modified` reorders by
//! modification time instead, per spec §6).

use async_trait::async_trait;
use copytree_domain::aggregates::WorkingSet;
use copytree_domain::error::CopyTreeResult;
use copytree_domain::repositories::Stage;
use copytree_domain::RunContext;

pub struct SortStage {
    pub order_by_modified: bool,
}

impl SortStage {
    pub fn new(order_by_modified: bool) -> Self {
        Self { order_by_modified }
    }
}

#[async_trait]
impl Stage for SortStage {
    fn name(&self) -> &str {
        "Sort"
    }

    async fn process(&self, mut input: WorkingSet, _context: &RunContext) -> CopyTreeResult<WorkingSet> {
        if self.order_by_modified {
            input.files_mut().sort_by_key(|f| f.modified_at());
        } else {
            input.files_mut().sort_by(|a, b| {
                let a_segments: Vec<&str> = a.relative_path().segments().collect();
                let b_segments: Vec<&str> = b.relative_path().segments().collect();
                a_segments.cmp(&b_segments)
            });
        }
        Ok(input)
    }
}
