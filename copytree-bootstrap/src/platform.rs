// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Platform Abstraction Module
//!
//! Abstracts the handful of OS-sensitive operations CopyTree needs
//! outside the pure pipeline: the user config directory, available
//! parallelism, and the "file reference" delivery mode (spec §4.17) on
//! platforms that support it. Grounded on
//! `adaptive_pipeline_bootstrap::platform`'s `Platform` trait +
//! Unix/Windows split, narrowed to CopyTree's actual needs (the teacher's
//! version also covers memory info and privilege checks, which nothing
//! here reads).

use std::path::PathBuf;
use thiserror::Error;

#[cfg(windows)]
mod windows;

#[cfg(windows)]
pub use windows::WindowsPlatform;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("not supported on this platform: {0}")]
    NotSupported(String),
}

/// OS-sensitive operations needed outside the pure pipeline engine.
pub trait Platform: Send + Sync {
    /// Human-readable platform name, used in `--info` output and logs.
    fn platform_name(&self) -> &'static str;

    /// The user config root (`~/.config/copytree` on Unix,
    /// `%APPDATA%\copytree` on Windows), used for cache, outputs, and
    /// conversation-state storage (spec §6).
    fn config_dir(&self) -> Result<PathBuf, PlatformError>;

    /// Available parallelism, used as the `maxConcurrency` default when
    /// the user hasn't overridden it (spec §5).
    fn available_parallelism(&self) -> usize {
        std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
    }

    /// Whether this platform supports the "file reference" delivery mode
    /// (spec §4.17) — a lightweight pointer a desktop shell can resolve,
    /// distinct from writing to an arbitrary file path.
    fn supports_file_reference(&self) -> bool;
}

#[cfg(unix)]
pub struct UnixPlatform;

#[cfg(unix)]
impl UnixPlatform {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
impl Default for UnixPlatform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
impl Platform for UnixPlatform {
    fn platform_name(&self) -> &'static str {
        if cfg!(target_os = "macos") {
            "macos"
        } else {
            "unix"
        }
    }

    fn config_dir(&self) -> Result<PathBuf, PlatformError> {
        dirs::config_dir()
            .map(|dir| dir.join("copytree"))
            .ok_or_else(|| PlatformError::NotSupported("no config directory for this user".to_string()))
    }

    fn supports_file_reference(&self) -> bool {
        false
    }
}

/// Resolves the platform implementation for the host this process is
/// running on.
pub fn create_platform() -> Box<dyn Platform> {
    #[cfg(unix)]
    {
        Box::new(UnixPlatform::new())
    }

    #[cfg(windows)]
    {
        Box::new(WindowsPlatform::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_parallelism_is_at_least_one() {
        let platform = create_platform();
        assert!(platform.available_parallelism() >= 1);
    }
}
