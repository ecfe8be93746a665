// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Conversation State
//!
//! Persists the `ask` subcommand's conversation context as a keyed JSON
//! blob under the platform config directory's `conversations/`
//! subdirectory (spec §6: "conversation state files stored as keyed
//! JSON blobs"). No interactive loop lives here — per the explicit
//! non-goal of a long-lived server mode, `ask` appends one prompt/reply
//! pair per invocation and returns.

use copytree_domain::error::{CopyTreeError, CopyTreeResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Turn {
    pub prompt: String,
    pub reply: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConversationState {
    pub key: String,
    pub turns: Vec<Turn>,
}

impl ConversationState {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into(), turns: Vec::new() }
    }

    pub fn load_or_new(config_dir: &Path, key: &str) -> CopyTreeResult<Self> {
        let path = state_path(config_dir, key);
        if !path.is_file() {
            return Ok(Self::new(key));
        }

        let raw = std::fs::read_to_string(&path).map_err(|err| CopyTreeError::Path {
            path: path.clone(),
            message: err.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|err| CopyTreeError::Configuration {
            message: format!("corrupt conversation state {}: {err}", path.display()),
        })
    }

    pub fn record_turn(&mut self, prompt: impl Into<String>, reply: impl Into<String>) {
        self.turns.push(Turn { prompt: prompt.into(), reply: reply.into() });
    }

    pub fn save(&self, config_dir: &Path) -> CopyTreeResult<()> {
        let path = state_path(config_dir, &self.key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| CopyTreeError::Path {
                path: parent.to_path_buf(),
                message: err.to_string(),
            })?;
        }

        let raw = serde_json::to_string_pretty(self).map_err(|err| CopyTreeError::Configuration {
            message: err.to_string(),
        })?;
        std::fs::write(&path, raw).map_err(|err| CopyTreeError::Path {
            path,
            message: err.to_string(),
        })
    }
}

fn state_path(config_dir: &Path, key: &str) -> PathBuf {
    config_dir.join("conversations").join(format!("{key}.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn a_fresh_key_loads_as_an_empty_conversation() {
        let dir = tempdir().unwrap();
        let state = ConversationState::load_or_new(dir.path(), "session-1").unwrap();
        assert!(state.turns.is_empty());
    }

    #[test]
    fn recorded_turns_round_trip_through_save_and_load() {
        let dir = tempdir().unwrap();
        let mut state = ConversationState::load_or_new(dir.path(), "session-1").unwrap();
        state.record_turn("hello", "hi there");
        state.save(dir.path()).unwrap();

        let reloaded = ConversationState::load_or_new(dir.path(), "session-1").unwrap();
        assert_eq!(reloaded.turns.len(), 1);
        assert_eq!(reloaded.turns[0].prompt, "hello");
    }
}
