// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Stage Trait
//!
//! The base contract every pipeline stage implements (spec §4.5), mirroring
//! the teacher's `StageService` trait role: a single, uniform interface
//! every stage (built-in or custom) satisfies, so the driver
//! (`infrastructure::runtime`) never matches on a stage's concrete type.

use crate::aggregates::WorkingSet;
use crate::error::CopyTreeResult;
use async_trait::async_trait;

/// Outcome of a recovered stage (spec §4.18: `running -> recovered`
/// requires a non-undefined return from `handleError`).
pub struct StageOutcome {
    pub working_set: WorkingSet,
    pub recovered_from: String,
}

/// A single pipeline stage (spec §2's canonical stage list, §4.5's
/// contract).
///
/// Every hook has a default so a stage only needs to override `process`
/// plus whichever lifecycle hooks it actually uses — the same shape as
/// the teacher's `StageService` trait, which gives every method a
/// sensible default and lets concrete services override only what they
/// need.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Stable name used in events, logs, and plan validation.
    fn name(&self) -> &str;

    /// Called once per run, before any file is processed.
    async fn init(&self, _context: &crate::RunContext) -> CopyTreeResult<()> {
        Ok(())
    }

    /// Per-`process` pre-validation; failures surface as `ValidationError`.
    fn validate(&self, _input: &WorkingSet) -> CopyTreeResult<()> {
        Ok(())
    }

    /// Called immediately before `process`.
    async fn before_run(&self, input: WorkingSet) -> CopyTreeResult<WorkingSet> {
        Ok(input)
    }

    /// The stage's core transformation of the working set. Mandatory.
    async fn process(&self, input: WorkingSet, context: &crate::RunContext) -> CopyTreeResult<WorkingSet>;

    /// Called after a successful `process`.
    async fn after_run(&self, output: WorkingSet) -> CopyTreeResult<WorkingSet> {
        Ok(output)
    }

    /// Logged, never alters control flow.
    fn on_error(&self, _error: &crate::error::CopyTreeError, _input: &WorkingSet) {}

    /// Optional recovery: returning `Some` allows the driver to continue
    /// with the recovered working set instead of aborting (spec §4.18).
    async fn handle_error(&self, _error: &crate::error::CopyTreeError, _input: WorkingSet) -> Option<WorkingSet> {
        None
    }
}
