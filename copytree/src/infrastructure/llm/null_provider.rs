// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Null LLM Provider
//!
//! Default when no LLM is configured (Design Notes §9). Any invocation is
//! a configuration mistake — `OptionalLLMFilterStage` and the summary
//! transformers only call into a provider when the user has opted in, so
//! reaching this one means an option was accepted without a provider
//! being wired up.

use async_trait::async_trait;
use copytree_domain::error::{CopyTreeError, CopyTreeResult};
use copytree_domain::repositories::{LlmOptions, LlmProvider};

#[derive(Debug, Default, Clone, Copy)]
pub struct NullLlmProvider;

#[async_trait]
impl LlmProvider for NullLlmProvider {
    async fn text(&self, _prompt: &str, _options: &LlmOptions) -> CopyTreeResult<String> {
        Err(CopyTreeError::LlmProvider {
            message: "no LLM provider configured; pass --llm-provider or set the relevant environment variable".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_errors() {
        let provider = NullLlmProvider;
        let result = provider.text("hello", &LlmOptions::default()).await;
        assert!(matches!(result, Err(CopyTreeError::LlmProvider { .. })));
    }
}
