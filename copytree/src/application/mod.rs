// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Application Layer
//!
//! Orchestrates the domain and infrastructure layers into the two
//! commands `main.rs` exposes, without itself touching the filesystem,
//! a database, or a network socket directly — mirrors the teacher's
//! `application` layer split between `commands` (request objects),
//! `services` (cross-cutting helpers used by more than one use case),
//! and `use_cases` (one orchestration function per command).

pub mod commands;
pub mod services;
pub mod use_cases;

pub use commands::{AskCommand, DeliveryChoice, RunCopyCommand};
