// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Windows Platform Implementation
//!
//! Grounded on `adaptive_pipeline_bootstrap::platform::windows`, narrowed
//! to the `Platform` trait's three operations.

use super::{Platform, PlatformError};
use std::path::PathBuf;

pub struct WindowsPlatform;

impl WindowsPlatform {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for WindowsPlatform {
    fn platform_name(&self) -> &'static str {
        "windows"
    }

    fn config_dir(&self) -> Result<PathBuf, PlatformError> {
        dirs::config_dir()
            .map(|dir| dir.join("copytree"))
            .ok_or_else(|| PlatformError::NotSupported("no config directory for this user".to_string()))
    }

    fn supports_file_reference(&self) -> bool {
        // Windows Explorer can resolve a `.url`/shell-link style file
        // reference; implemented at the delivery boundary, not here.
        true
    }
}
