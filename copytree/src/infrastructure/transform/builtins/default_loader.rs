// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Identity passthrough transformer. Grounded on the teacher's
//! `PassThroughService`: a stage present purely so every file has a
//! resolvable default transformer.

use crate::infrastructure::transform::registry::Transformer;
use async_trait::async_trait;
use copytree_domain::entities::FileEntry;
use copytree_domain::error::CopyTreeResult;
use std::collections::HashMap;

pub struct DefaultLoaderTransformer;

#[async_trait]
impl Transformer for DefaultLoaderTransformer {
    fn name(&self) -> &str {
        "default-loader"
    }

    async fn transform(&self, file: &FileEntry, _options: &HashMap<String, String>) -> CopyTreeResult<String> {
        Ok(file.content().unwrap_or_default().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use copytree_domain::value_objects::{ContentHash, EncodingTag, RelativePath};

    #[tokio::test]
    async fn returns_content_unchanged() {
        let mut entry = FileEntry::discovered(RelativePath::new("a.txt"), "/a.txt".into(), 5, Utc::now());
        entry.set_content("hello".to_string(), EncodingTag::Utf8, ContentHash::of_bytes(b"hello"));
        let transformer = DefaultLoaderTransformer;
        let result = transformer.transform(&entry, &HashMap::new()).await.unwrap();
        assert_eq!(result, "hello");
    }
}
