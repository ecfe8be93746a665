// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Pipeline Event
//!
//! The typed message-passing event kinds emitted by the stage framework
//! (spec §4.5). Design Notes §9: "Event emission through an emitter object
//! becomes message passing on typed channels" — `infrastructure::runtime`
//! publishes these on a `tokio::sync::broadcast` channel rather than
//! calling listener callbacks directly, following the same restructuring
//! the teacher applies to its `generic_event` system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate timing/size/memory statistics attached to a `StageComplete`
/// event (spec §4.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageCompleteStats {
    pub duration_ms: u64,
    pub input_count: usize,
    pub output_count: usize,
    pub memory_delta_bytes: i64,
}

/// One event raised by a stage or by the pipeline driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PipelineEvent {
    StageStart { stage: String, at: DateTime<Utc> },
    StageProgress { stage: String, percent: f32, message: String },
    StageComplete { stage: String, stats: StageCompleteStats },
    StageError { stage: String, kind: String, message: String },
    StageRecover { stage: String },
    FileBatch { stage: String, count: usize },
    PipelineCancelled { stage: String },
}

impl PipelineEvent {
    pub fn stage_name(&self) -> &str {
        match self {
            Self::StageStart { stage, .. }
            | Self::StageProgress { stage, .. }
            | Self::StageComplete { stage, .. }
            | Self::StageError { stage, .. }
            | Self::StageRecover { stage }
            | Self::FileBatch { stage, .. }
            | Self::PipelineCancelled { stage } => stage,
        }
    }
}
