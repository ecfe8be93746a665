// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Profile Loader
//!
//! Reads a `Profile` (spec §3, §6 "Profile file") from a YAML or TOML
//! document, selected by the file's extension. A bare profile name with
//! no path separator and no recognized extension is resolved against
//! the user config directory's `profiles/` subdirectory, trying `.yml`,
//! `.yaml`, then `.toml` in that order.

use copytree_domain::error::{CopyTreeError, CopyTreeResult};
use copytree_domain::profile::Profile;
use std::path::{Path, PathBuf};

pub fn load_profile(name_or_path: &str, user_config_dir: &Path) -> CopyTreeResult<Profile> {
    let path = resolve_profile_path(name_or_path, user_config_dir)?;
    let raw = std::fs::read_to_string(&path).map_err(|err| CopyTreeError::Path {
        path: path.clone(),
        message: err.to_string(),
    })?;

    parse_profile(&raw, &path)
}

fn resolve_profile_path(name_or_path: &str, user_config_dir: &Path) -> CopyTreeResult<PathBuf> {
    let candidate = Path::new(name_or_path);
    if candidate.exists() {
        return Ok(candidate.to_path_buf());
    }

    if candidate.extension().is_some() || name_or_path.contains(std::path::MAIN_SEPARATOR) {
        return Ok(candidate.to_path_buf());
    }

    let profiles_dir = user_config_dir.join("profiles");
    for extension in ["yml", "yaml", "toml"] {
        let candidate = profiles_dir.join(format!("{name_or_path}.{extension}"));
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(CopyTreeError::Configuration {
        message: format!("no profile named {name_or_path:?} was found under {}", profiles_dir.display()),
    })
}

fn parse_profile(raw: &str, path: &Path) -> CopyTreeResult<Profile> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(raw).map_err(|err| CopyTreeError::Configuration {
            message: format!("invalid TOML profile {}: {err}", path.display()),
        }),
        _ => serde_yaml::from_str(raw).map_err(|err| CopyTreeError::Configuration {
            message: format!("invalid YAML profile {}: {err}", path.display()),
        }),
    }
}
