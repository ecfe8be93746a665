// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Repository Traits
//!
//! Domain-defined ports implemented by `infrastructure` (Design Notes §9:
//! dependency inversion at the domain/infrastructure boundary), mirroring
//! `adaptive_pipeline_domain::repositories` (`pipeline_repository.rs`,
//! `stage_executor.rs`).

mod cache_repository;
mod llm_provider;
mod stage;

pub use cache_repository::{CacheKey, CacheRepository};
pub use llm_provider::{LlmOptions, LlmProvider};
pub use stage::{Stage, StageOutcome};
