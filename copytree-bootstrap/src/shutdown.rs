// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Shutdown Coordination
//!
//! A close adaptation of `adaptive_pipeline_bootstrap::shutdown::
//! ShutdownCoordinator`: `tokio::sync::Notify` + `AtomicBool` + grace
//! period. The coordinator's cancellation token drives the same
//! `copytree_domain::CancellationSignal` a `RunContext` carries (spec §5),
//! so a Ctrl-C during a run is indistinguishable, from the pipeline's
//! point of view, from a programmatic cancellation.

use copytree_domain::CancellationSignal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

pub const DEFAULT_GRACE_PERIOD_SECS: u64 = 5;

/// Manages graceful shutdown with grace-period and timeout enforcement.
#[derive(Clone)]
pub struct ShutdownCoordinator {
    signal: CancellationSignal,
    grace_period: Duration,
    shutdown_initiated: Arc<AtomicBool>,
    shutdown_complete: Arc<Notify>,
}

impl ShutdownCoordinator {
    pub fn new(grace_period: Duration) -> Self {
        Self {
            signal: CancellationSignal::new(),
            grace_period,
            shutdown_initiated: Arc::new(AtomicBool::new(false)),
            shutdown_complete: Arc::new(Notify::new()),
        }
    }

    /// The cancellation signal a `RunContext` is constructed with.
    pub fn cancellation_signal(&self) -> CancellationSignal {
        self.signal.clone()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown_initiated.load(Ordering::SeqCst)
    }

    /// Sets the shutdown-initiated flag and trips the cancellation
    /// signal exactly once.
    pub fn initiate_shutdown(&self) {
        if self.shutdown_initiated.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst).is_ok() {
            tracing::info!(grace_period_secs = self.grace_period.as_secs(), "initiating graceful shutdown");
            self.signal.cancel();
        }
    }

    /// Races shutdown completion against the grace period. Returns
    /// `true` if the run acknowledged cancellation within the grace
    /// period, `false` if the grace period expired first.
    pub async fn wait_for_shutdown(&self) -> bool {
        if !self.is_shutting_down() {
            tracing::warn!("wait_for_shutdown called but shutdown was never initiated");
            return true;
        }

        tokio::select! {
            _ = self.shutdown_complete.notified() => {
                tracing::info!("shutdown completed gracefully");
                true
            }
            _ = tokio::time::sleep(self.grace_period) => {
                tracing::warn!("shutdown grace period expired, forcing exit");
                false
            }
        }
    }

    pub fn complete_shutdown(&self) {
        self.shutdown_complete.notify_waiters();
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_GRACE_PERIOD_SECS))
    }
}
