// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # LLM Provider Trait
//!
//! Design Notes §9: "LLM integrations are isolated behind a provider
//! interface with `text(prompt, options)`; provider selection is a
//! configuration value; no provider library detail leaks to stages."
//! Consumed by `OptionalLLMFilterStage` (spec §4.10) and by the
//! `CodeSummaryTransformer`/`UnitTestSummaryTransformer` built-ins.

use crate::error::CopyTreeResult;
use async_trait::async_trait;

#[derive(Debug, Clone, Default)]
pub struct LlmOptions {
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn text(&self, prompt: &str, options: &LlmOptions) -> CopyTreeResult<String>;
}
