// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Ask Use Case
//!
//! SPEC_FULL.md: a single follow-up question against a previously
//! produced copy, answered by the configured `LlmProvider` and appended
//! to that conversation's persisted turn history. One invocation, one
//! turn — no long-lived server mode (spec §1 non-goal).

use crate::application::commands::AskCommand;
use crate::application::services::ConversationState;
use crate::infrastructure::config::Settings;
use crate::infrastructure::llm::{HttpLlmProvider, NullLlmProvider};
use copytree_bootstrap::Platform;
use copytree_domain::error::{CopyTreeError, CopyTreeResult};
use copytree_domain::repositories::{LlmOptions, LlmProvider};
use std::sync::Arc;

fn build_llm_provider(settings: &Settings) -> CopyTreeResult<Arc<dyn LlmProvider>> {
    match settings.llm_provider.as_deref() {
        None | Some("none") => Ok(Arc::new(NullLlmProvider)),
        Some("http") => {
            let endpoint = settings.llm_endpoint.clone().ok_or_else(|| CopyTreeError::Configuration {
                message: "llm_provider = \"http\" requires llm_endpoint to be set".to_string(),
            })?;
            let api_key = settings.llm_api_key.clone().unwrap_or_default();
            let model = settings.llm_model.clone().unwrap_or_else(|| "default".to_string());
            Ok(Arc::new(HttpLlmProvider::new(endpoint, api_key, model)?))
        }
        Some(other) => Err(CopyTreeError::Configuration {
            message: format!("unknown llm_provider {other:?}; expected \"none\" or \"http\""),
        }),
    }
}

/// Answers one prompt against the conversation state keyed by
/// `command.state_key`, recording the turn before returning the reply.
pub async fn ask(command: AskCommand, platform: &dyn Platform) -> CopyTreeResult<String> {
    let config_dir = platform.config_dir().map_err(|err| CopyTreeError::Configuration { message: err.to_string() })?;
    let settings = Settings::load(&config_dir, &config_dir, command.explicit_config.as_deref())
        .map_err(|err| CopyTreeError::Configuration { message: err.to_string() })?;

    let mut state = ConversationState::load_or_new(&config_dir, &command.state_key)?;
    let provider = build_llm_provider(&settings)?;
    let reply = provider.text(&command.prompt, &LlmOptions::default()).await?;

    state.record_turn(command.prompt, reply.clone());
    state.save(&config_dir)?;

    Ok(reply)
}
