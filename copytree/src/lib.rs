// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # copytree
//!
//! Packages a filtered, transformed view of a source tree into a single
//! document for LLM prompts (spec §1). Three layers, mirroring
//! `adaptive_pipeline`'s own Clean Architecture split:
//!
//! - [`application`]: request objects and use cases (`run_copy`, `ask`).
//! - [`infrastructure`]: every adapter to the outside world — the
//!   filesystem, git, the content cache, the optional LLM provider, the
//!   secret scanner, the output formatters, delivery, the transformer
//!   registry and its builtins, the fourteen pipeline stages, and the
//!   driver that runs them.
//! - [`presentation`]: terminal output for a completed run.
//!
//! `copytree-domain` holds the pure domain (entities, value objects,
//! the profile and rule model, the `Stage`/`CacheRepository`/
//! `LlmProvider` ports); `copytree-bootstrap` holds CLI parsing,
//! platform abstraction, signal handling, and process exit codes.

pub mod application;
pub mod infrastructure;
pub mod presentation;
