// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # HTTP LLM Provider
//!
//! Config-selected (spec §6) provider speaking an OpenAI-compatible chat
//! completions API over `reqwest`, behind the same `LlmProvider` trait
//! object the `NullLlmProvider` implements, so `OptionalLLMFilterStage`
//! and the summary transformers never see a concrete HTTP client
//! (Design Notes §9).

use async_trait::async_trait;
use copytree_domain::error::{CopyTreeError, CopyTreeResult};
use copytree_domain::repositories::{LlmOptions, LlmProvider};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

pub struct HttpLlmProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    default_model: String,
}

impl HttpLlmProvider {
    pub fn new(endpoint: String, api_key: String, default_model: String) -> CopyTreeResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|err| CopyTreeError::LlmProvider { message: format!("failed to build HTTP client: {err}") })?;
        Ok(Self { client, endpoint, api_key, default_model })
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[async_trait]
impl LlmProvider for HttpLlmProvider {
    async fn text(&self, prompt: &str, options: &LlmOptions) -> CopyTreeResult<String> {
        let model = options.model.clone().unwrap_or_else(|| self.default_model.clone());
        let mut body = json!({
            "model": model,
            "messages": [{ "role": "user", "content": prompt }],
        });
        if let Some(max_tokens) = options.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if let Some(temperature) = options.temperature {
            body["temperature"] = json!(temperature);
        }

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| CopyTreeError::LlmProvider { message: format!("LLM request failed: {err}") })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(CopyTreeError::LlmProvider {
                message: format!("LLM provider returned {status}: {text}"),
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| CopyTreeError::LlmProvider { message: format!("malformed LLM response: {err}") })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| CopyTreeError::LlmProvider { message: "LLM response contained no choices".to_string() })
    }
}
