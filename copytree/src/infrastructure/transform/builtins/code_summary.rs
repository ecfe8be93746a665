// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Heavy, order-insensitive transformers that summarize source and test
//! files. Both call the pluggable LLM provider interface (Design Notes
//! §9) when one is configured; without one they fall back to a
//! regex-based syntactic scan, never touching the network on their own.

use crate::infrastructure::transform::registry::Transformer;
use async_trait::async_trait;
use copytree_domain::entities::FileEntry;
use copytree_domain::error::CopyTreeResult;
use copytree_domain::repositories::{LlmOptions, LlmProvider};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

static RUST_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*(?:pub\s+)?(?:async\s+)?(fn|struct|enum|trait|impl)\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap());
static TEST_FN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*(?:#\[\w+\]\s*)*(?:pub\s+)?(?:async\s+)?fn\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap());

fn syntactic_item_list(content: &str, pattern: &Regex) -> String {
    let items: Vec<String> = pattern
        .captures_iter(content)
        .map(|captures| {
            if captures.len() > 2 {
                format!("{} {}", &captures[1], &captures[2])
            } else {
                captures[1].to_string()
            }
        })
        .collect();
    if items.is_empty() {
        "(no top-level items found)".to_string()
    } else {
        items.join("\n")
    }
}

pub struct CodeSummaryTransformer {
    llm_provider: Option<Arc<dyn LlmProvider>>,
}

impl CodeSummaryTransformer {
    pub fn new(llm_provider: Option<Arc<dyn LlmProvider>>) -> Self {
        Self { llm_provider }
    }
}

#[async_trait]
impl Transformer for CodeSummaryTransformer {
    fn name(&self) -> &str {
        "code-summary"
    }

    async fn transform(&self, file: &FileEntry, _options: &HashMap<String, String>) -> CopyTreeResult<String> {
        let content = file.content().unwrap_or_default();
        if let Some(provider) = &self.llm_provider {
            let prompt = format!("Summarize the purpose and public API of this source file in a few sentences:\n\n{content}");
            return provider.text(&prompt, &LlmOptions::default()).await;
        }
        Ok(syntactic_item_list(content, &RUST_ITEM))
    }
}

pub struct UnitTestSummaryTransformer {
    llm_provider: Option<Arc<dyn LlmProvider>>,
}

impl UnitTestSummaryTransformer {
    pub fn new(llm_provider: Option<Arc<dyn LlmProvider>>) -> Self {
        Self { llm_provider }
    }
}

#[async_trait]
impl Transformer for UnitTestSummaryTransformer {
    fn name(&self) -> &str {
        "unit-test-summary"
    }

    async fn transform(&self, file: &FileEntry, _options: &HashMap<String, String>) -> CopyTreeResult<String> {
        let content = file.content().unwrap_or_default();
        if let Some(provider) = &self.llm_provider {
            let prompt = format!("List the behaviors this test file verifies, one line per test:\n\n{content}");
            return provider.text(&prompt, &LlmOptions::default()).await;
        }
        Ok(syntactic_item_list(content, &TEST_FN))
    }
}
