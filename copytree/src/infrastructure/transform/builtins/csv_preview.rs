// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Renders the first N rows of a CSV file as a compact table, so a large
//! dataset doesn't blow the prompt's character budget.

use crate::infrastructure::transform::registry::Transformer;
use async_trait::async_trait;
use copytree_domain::entities::FileEntry;
use copytree_domain::error::CopyTreeResult;
use std::collections::HashMap;

const DEFAULT_PREVIEW_ROWS: usize = 10;

pub struct CsvPreviewTransformer;

impl CsvPreviewTransformer {
    fn preview_rows(options: &HashMap<String, String>) -> usize {
        options.get("rows").and_then(|value| value.parse().ok()).unwrap_or(DEFAULT_PREVIEW_ROWS)
    }
}

#[async_trait]
impl Transformer for CsvPreviewTransformer {
    fn name(&self) -> &str {
        "csv-preview"
    }

    async fn transform(&self, file: &FileEntry, options: &HashMap<String, String>) -> CopyTreeResult<String> {
        let content = file.content().unwrap_or_default();
        let rows_to_keep = Self::preview_rows(options);
        let lines: Vec<&str> = content.lines().collect();
        let total = lines.len();
        let kept: Vec<&str> = lines.into_iter().take(rows_to_keep + 1).collect();
        let mut preview = kept.join("\n");
        if total > rows_to_keep + 1 {
            preview.push_str(&format!("\n... ({} more rows omitted)", total - rows_to_keep - 1));
        }
        Ok(preview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use copytree_domain::value_objects::{ContentHash, EncodingTag, RelativePath};

    #[tokio::test]
    async fn truncates_after_header_plus_configured_rows() {
        let csv = (0..20).map(|i| format!("row{i}")).collect::<Vec<_>>().join("\n");
        let mut entry = FileEntry::discovered(RelativePath::new("a.csv"), "/a.csv".into(), 0, Utc::now());
        entry.set_content(csv.clone(), EncodingTag::Utf8, ContentHash::of_bytes(csv.as_bytes()));
        let mut options = HashMap::new();
        options.insert("rows".to_string(), "3".to_string());
        let transformer = CsvPreviewTransformer;
        let result = transformer.transform(&entry, &options).await.unwrap();
        assert!(result.contains("more rows omitted"));
        assert_eq!(result.lines().filter(|l| l.starts_with("row")).count(), 4);
    }
}
