// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # OptionalLLMFilterStage
//!
//! Spec §4.10: given a natural-language description and the candidate
//! file list (path + size), asks the configured `LlmProvider` which
//! paths to keep. Input is chunked to respect a token budget; outputs
//! are unioned across chunks; paths not returned by any batch are
//! dropped. Skipped entirely in dry-run mode.

use async_trait::async_trait;
use copytree_domain::aggregates::WorkingSet;
use copytree_domain::error::{CopyTreeError, CopyTreeResult};
use copytree_domain::repositories::{LlmOptions, Stage};
use copytree_domain::RunContext;
use std::collections::HashSet;

/// Conservative characters-per-chunk budget; one path line averages well
/// under 80 characters so this keeps each prompt under a few thousand
/// tokens without needing a real tokenizer.
const CHUNK_CHAR_BUDGET: usize = 6000;

pub struct OptionalLlmFilterStage {
    pub description: Option<String>,
}

impl OptionalLlmFilterStage {
    pub fn new(description: Option<String>) -> Self {
        Self { description }
    }

    fn build_prompt(description: &str, chunk: &[(&str, u64)]) -> String {
        let mut prompt = format!(
            "You are filtering a list of source files for inclusion in an LLM prompt.\n\
             Keep only files relevant to this request: {description}\n\n\
             Files (path, size in bytes):\n"
        );
        for (path, size) in chunk {
            prompt.push_str(&format!("{path}\t{size}\n"));
        }
        prompt.push_str("\nReturn exactly the paths to keep, one per line, nothing else.");
        prompt
    }

    fn parse_response(response: &str) -> HashSet<String> {
        response
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[async_trait]
impl Stage for OptionalLlmFilterStage {
    fn name(&self) -> &str {
        "OptionalLLMFilter"
    }

    async fn process(&self, input: WorkingSet, context: &RunContext) -> CopyTreeResult<WorkingSet> {
        let Some(description) = &self.description else {
            return Ok(input);
        };
        if context.dry_run {
            return Ok(input);
        }

        let candidates: Vec<(&str, u64)> = input.files().iter().map(|f| (f.relative_path().as_str(), f.size())).collect();

        let mut chunks: Vec<Vec<(&str, u64)>> = Vec::new();
        let mut current = Vec::new();
        let mut current_len = 0usize;
        for candidate in candidates {
            let line_len = candidate.0.len() + 24;
            if current_len + line_len > CHUNK_CHAR_BUDGET && !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            current_len += line_len;
            current.push(candidate);
        }
        if !current.is_empty() {
            chunks.push(current);
        }

        let mut kept_paths = HashSet::new();
        for chunk in &chunks {
            let prompt = Self::build_prompt(description, chunk);
            let response = context
                .llm_provider
                .text(&prompt, &LlmOptions::default())
                .await
                .map_err(|err| CopyTreeError::LlmProvider { message: err.to_string() })?;
            let returned = Self::parse_response(&response);
            if returned.is_empty() {
                return Err(CopyTreeError::LlmFilter {
                    message: "LLM returned no parseable paths".to_string(),
                });
            }
            kept_paths.extend(returned);
        }

        let mut kept = input.into_files();
        kept.retain(|file| kept_paths.contains(file.relative_path().as_str()));
        Ok(WorkingSet::new(kept))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_one_path_per_line() {
        let parsed = OptionalLlmFilterStage::parse_response("a.rs\n  b.rs  \n\nc.rs\n");
        assert_eq!(parsed.len(), 3);
        assert!(parsed.contains("b.rs"));
    }

    #[test]
    fn builds_a_prompt_listing_every_file() {
        let prompt = OptionalLlmFilterStage::build_prompt("find the parser", &[("src/parser.rs", 100)]);
        assert!(prompt.contains("find the parser"));
        assert!(prompt.contains("src/parser.rs"));
    }
}
