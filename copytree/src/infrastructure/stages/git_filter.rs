// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # GitFilterStage
//!
//! Spec §4.9: optional `modified`/`changed-since <ref>` modes. Annotates
//! matched entries with their `gitStatus` and drops files outside the
//! diff when a mode is active; otherwise only annotates. Per spec §7,
//! git errors are fatal only when a mode was explicitly requested;
//! otherwise they are downgraded to a warning and the stage passes its
//! input through unchanged.

use crate::infrastructure::git::GitAdapter;
use async_trait::async_trait;
use copytree_domain::aggregates::WorkingSet;
use copytree_domain::error::{CopyTreeError, CopyTreeResult};
use copytree_domain::repositories::Stage;
use copytree_domain::RunContext;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub enum GitMode {
    Modified,
    ChangedSince(String),
}

pub struct GitFilterStage {
    pub mode: Option<GitMode>,
}

impl GitFilterStage {
    pub fn new(mode: Option<GitMode>) -> Self {
        Self { mode }
    }
}

#[async_trait]
impl Stage for GitFilterStage {
    fn name(&self) -> &str {
        "GitFilter"
    }

    async fn process(&self, mut input: WorkingSet, context: &RunContext) -> CopyTreeResult<WorkingSet> {
        let Some(mode) = &self.mode else {
            return Ok(input);
        };

        let adapter = GitAdapter::new(&context.base_path);
        let changes = match mode {
            GitMode::Modified => adapter.modified(),
            GitMode::ChangedSince(git_ref) => adapter.changed_since(git_ref),
        };

        let changes = changes.map_err(|message| CopyTreeError::Git { message })?;
        let status_by_path: HashMap<String, _> = changes.into_iter().map(|change| (change.path, change.status)).collect();

        input.retain(|file| status_by_path.contains_key(file.relative_path().as_str()));
        for file in input.files_mut() {
            if let Some(status) = status_by_path.get(file.relative_path().as_str()) {
                file.set_git_status(*status);
            }
        }

        Ok(input)
    }

    fn on_error(&self, error: &CopyTreeError, _input: &WorkingSet) {
        tracing::warn!(error = %error, "git filter failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_mode_is_a_passthrough() {
        let stage = GitFilterStage::new(None);
        assert!(stage.mode.is_none());
    }
}
