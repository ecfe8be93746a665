// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Test-only `RunContext` builder shared by the stage unit tests.

#![cfg(test)]

use crate::infrastructure::cache::InMemoryCacheRepository;
use crate::infrastructure::llm::NullLlmProvider;
use copytree_domain::{CancellationSignal, RunContext};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub fn null_context(base_path: impl AsRef<Path>) -> RunContext {
    RunContext {
        run_id: uuid::Uuid::new_v4(),
        base_path: PathBuf::from(base_path.as_ref()),
        continue_on_error: false,
        dry_run: false,
        max_concurrency: 4,
        cache: Arc::new(InMemoryCacheRepository::new()),
        llm_provider: Arc::new(NullLlmProvider),
        cancellation: CancellationSignal::new(),
    }
}
