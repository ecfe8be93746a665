// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Strips Markdown formatting down to plain text, for token economy.

use crate::infrastructure::transform::registry::Transformer;
use async_trait::async_trait;
use copytree_domain::entities::FileEntry;
use copytree_domain::error::CopyTreeResult;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#{1,6}\s*").unwrap());
static EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\*{1,3}|_{1,3})([^*_]+)\1").unwrap());
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").unwrap());
static CODE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^```[^\n]*\n").unwrap());
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]*)`").unwrap());

pub struct MarkdownStripTransformer;

#[async_trait]
impl Transformer for MarkdownStripTransformer {
    fn name(&self) -> &str {
        "markdown-strip"
    }

    async fn transform(&self, file: &FileEntry, _options: &HashMap<String, String>) -> CopyTreeResult<String> {
        let content = file.content().unwrap_or_default();
        let stripped = CODE_FENCE.replace_all(content, "");
        let stripped = HEADING.replace_all(&stripped, "");
        let stripped = LINK.replace_all(&stripped, "$1");
        let stripped = INLINE_CODE.replace_all(&stripped, "$1");
        let stripped = EMPHASIS.replace_all(&stripped, "$2");
        Ok(stripped.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use copytree_domain::value_objects::{ContentHash, EncodingTag, RelativePath};

    #[tokio::test]
    async fn strips_headings_and_emphasis() {
        let mut entry = FileEntry::discovered(RelativePath::new("a.md"), "/a.md".into(), 0, Utc::now());
        let raw = "# Title\n\nSome **bold** and [a link](http://example.com).";
        entry.set_content(raw.to_string(), EncodingTag::Utf8, ContentHash::of_bytes(raw.as_bytes()));
        let transformer = MarkdownStripTransformer;
        let result = transformer.transform(&entry, &HashMap::new()).await.unwrap();
        assert!(!result.contains('#'));
        assert!(!result.contains("**"));
        assert!(result.contains("a link"));
    }
}
