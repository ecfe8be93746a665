// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Bootstrap Logger
//!
//! Grounded on `adaptive_pipeline_bootstrap::logger`: a minimal
//! `BootstrapLogger` trait for bootstrap-phase messages (before
//! `tracing-subscriber` is installed), plus the `tracing-subscriber`
//! initialization itself — env-filter driven level selection, a compact
//! human formatter for terminals and a JSON formatter for
//! `--format-logs json` or non-tty stdout (SPEC_FULL.md, "Logging and
//! tracing").

use tracing_subscriber::EnvFilter;

/// Bootstrap-phase logging abstraction, used before `init_tracing` has
/// run (argument parsing, config-dir resolution failures).
pub trait BootstrapLogger: Send + Sync {
    fn error(&self, message: &str);
    fn warn(&self, message: &str);
    fn info(&self, message: &str);
    fn debug(&self, message: &str);
}

/// Routes bootstrap logs through `tracing`, so messages emitted before
/// `init_tracing` still end up on whatever subscriber is eventually
/// installed (tracing buffers nothing, but the call sites are
/// uniform either way).
pub struct ConsoleLogger;

impl ConsoleLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl BootstrapLogger for ConsoleLogger {
    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn debug(&self, message: &str) {
        tracing::debug!("{message}");
    }
}

/// Output shape for the process-wide `tracing-subscriber` the bootstrap
/// layer installs once, at the start of `main`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

/// Installs the global `tracing` subscriber. `RUST_LOG` (or
/// `COPYTREE_LOG`) drives level selection via `EnvFilter`; `format`
/// selects between the compact human formatter and the JSON formatter
/// (spec §6 env var precedence applies to whichever CLI flag resolves
/// this value before it reaches here).
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_env("COPYTREE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    match format {
        LogFormat::Human => {
            let _ = subscriber.compact().try_init();
        }
        LogFormat::Json => {
            let _ = subscriber.json().try_init();
        }
    }
}
