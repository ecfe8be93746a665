// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # CharLimitStage
//!
//! Spec §4.14: applies a global character budget across all files. Sums
//! current content lengths in sorted order; once the running total would
//! exceed the budget, the offending file is truncated at the remaining
//! budget and all subsequent files are dropped.

use async_trait::async_trait;
use copytree_domain::aggregates::WorkingSet;
use copytree_domain::error::CopyTreeResult;
use copytree_domain::repositories::Stage;
use copytree_domain::RunContext;

pub struct CharLimitStage {
    pub max_total_chars: Option<usize>,
}

impl CharLimitStage {
    pub fn new(max_total_chars: Option<usize>) -> Self {
        Self { max_total_chars }
    }
}

#[async_trait]
impl Stage for CharLimitStage {
    fn name(&self) -> &str {
        "CharLimit"
    }

    async fn process(&self, mut input: WorkingSet, _context: &RunContext) -> CopyTreeResult<WorkingSet> {
        let Some(budget) = self.max_total_chars else {
            return Ok(input);
        };

        let mut running_total = 0usize;
        let mut truncated_at: Option<usize> = None;

        for (index, file) in input.files().iter().enumerate() {
            let content_len = file.content().map(str::len).unwrap_or(0);
            if running_total + content_len > budget {
                truncated_at = Some(index);
                break;
            }
            running_total += content_len;
        }

        if let Some(index) = truncated_at {
            let remaining_budget = budget.saturating_sub(running_total);
            let dropped = input.files().len() - index - 1;

            input.files_mut()[index].truncate_to(remaining_budget);
            input.files_mut().truncate(index + 1);
            input.record_truncated();
            input.record_dropped(dropped);
        }

        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use copytree_domain::entities::FileEntry;
    use copytree_domain::value_objects::{ContentHash, EncodingTag, RelativePath};

    fn file_with_content(path: &str, content: &str) -> FileEntry {
        let mut entry = FileEntry::discovered(RelativePath::new(path), path.into(), content.len() as u64, Utc::now());
        entry.set_content(content.to_string(), EncodingTag::Utf8, ContentHash::of_bytes(content.as_bytes()));
        entry
    }

    #[tokio::test]
    async fn truncates_the_offending_file_and_drops_the_rest() {
        let input = WorkingSet::new(vec![
            file_with_content("a.txt", "0123456789"),
            file_with_content("b.txt", "0123456789"),
            file_with_content("c.txt", "0123456789"),
        ]);
        let stage = CharLimitStage::new(Some(15));
        let context = super::super::test_support::null_context(std::env::temp_dir());
        let output = stage.process(input, &context).await.unwrap();

        assert_eq!(output.files().len(), 2);
        assert!(output.files()[1].truncated());
        assert_eq!(output.files()[1].content(), Some("01234"));
        assert_eq!(output.files_truncated(), 1);
        assert_eq!(output.files_dropped(), 1);
    }

    #[tokio::test]
    async fn leaves_content_untouched_when_under_budget() {
        let input = WorkingSet::new(vec![file_with_content("a.txt", "short")]);
        let stage = CharLimitStage::new(Some(1000));
        let context = super::super::test_support::null_context(std::env::temp_dir());
        let output = stage.process(input, &context).await.unwrap();
        assert!(!output.files()[0].truncated());
    }
}
