// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Run Context
//!
//! Carries everything a run's stages need but must not read from global
//! state (Design Notes §9: "Dynamic facades and runtime config lookups
//! become an explicit immutable configuration snapshot passed through the
//! run context; stages never read global state"). One per run; never
//! shared across runs (spec §3).

use crate::repositories::{CacheRepository, LlmProvider};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Per-stage timings, sizes, memory deltas, file counts, errors, success
/// rate, and total duration (spec §3, `Statistics`).
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    pub stage_durations_ms: Vec<(String, u64)>,
    pub input_file_count: usize,
    pub output_file_count: usize,
    pub errors: Vec<String>,
    pub total_duration_ms: u64,
}

impl Statistics {
    pub fn record_stage(&mut self, stage: impl Into<String>, duration_ms: u64) {
        self.stage_durations_ms.push((stage.into(), duration_ms));
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn success_rate(&self) -> f32 {
        if self.input_file_count == 0 {
            1.0
        } else {
            self.output_file_count as f32 / self.input_file_count as f32
        }
    }
}

/// A cooperative cancellation flag shared between the signal handler
/// (`copytree-bootstrap::signals`) and every stage's per-file and
/// per-suspension-point checks (spec §5).
#[derive(Debug, Clone, Default)]
pub struct CancellationSignal(Arc<AtomicBool>);

impl CancellationSignal {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Immutable, per-run bundle threaded through every stage (spec §3).
///
/// Not `Clone`-cheap by accident: the registry and cache are `Arc`-shared
/// so cloning a `RunContext` is legitimately cheap, matching how the
/// teacher's `ProcessingContext` is passed by reference/clone through
/// `StageService::process_chunk`.
#[derive(Clone)]
pub struct RunContext {
    pub run_id: Uuid,
    pub base_path: PathBuf,
    pub continue_on_error: bool,
    pub dry_run: bool,
    pub max_concurrency: usize,
    pub cache: Arc<dyn CacheRepository>,
    pub llm_provider: Arc<dyn LlmProvider>,
    pub cancellation: CancellationSignal,
}

impl RunContext {
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}
