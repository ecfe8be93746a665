// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # copytree-bootstrap
//!
//! Platform plumbing: CLI parsing and validation, process exit codes,
//! signal handling, graceful shutdown coordination, logging
//! initialization, and the OS abstraction layer. Mirrors
//! `adaptive_pipeline_bootstrap`'s scope — everything `copytree`'s
//! `main.rs` needs before the pipeline engine itself starts running.

pub mod cli;
pub mod exit_code;
pub mod logger;
pub mod platform;
pub mod shutdown;
pub mod signals;

pub use cli::{parse_and_validate, ParseError, ValidatedCli, ValidatedCommand};
pub use exit_code::{map_error_to_exit_code, result_to_exit_code, ExitCode};
pub use logger::{init_tracing, BootstrapLogger, ConsoleLogger, LogFormat};
pub use platform::{create_platform, Platform, PlatformError};
pub use shutdown::ShutdownCoordinator;
pub use signals::{create_signal_handler, SystemSignals};
