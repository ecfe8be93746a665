// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Configuration
//!
//! Layers settings with the `config` crate, last-wins, in the order spec
//! §6 names: builtin defaults < user config file (`~/.config/copytree/
//! config.toml`) < project config file (`.copytree.toml`, walked upward
//! from the base path) < `COPYTREE_*` env vars < CLI flag overrides.
//! CLI overrides are applied last, inline by the `run_copy` use case,
//! rather than through the `config` crate's own layering, since CLI
//! flags arrive as already-validated `ValidatedCopyArgs`, not raw
//! config sources the `config` crate could merge on its own.

use config::{Config, Environment, File, FileFormat};
use copytree_domain::value_objects::{BinaryCategory, BinaryPolicy, OutputFormatKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The resolved, layered configuration for one run. Field names mirror
/// the TOML/env keys users write, so `Settings` doubles as the
/// `config` crate's deserialization target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory excludes applied on every run regardless of profile
    /// (spec §4.7, "Global directory excludes").
    pub global_excludes: Vec<String>,
    pub max_file_size_bytes: u64,
    pub max_total_size_bytes: Option<u64>,
    pub max_files: Option<usize>,
    pub cache_enabled: bool,
    pub cache_path: Option<PathBuf>,
    pub outputs_dir: Option<PathBuf>,
    pub max_concurrency: Option<usize>,
    pub llm_provider: Option<String>,
    pub llm_endpoint: Option<String>,
    pub llm_api_key: Option<String>,
    pub llm_model: Option<String>,
    pub default_format: OutputFormatKind,
    pub binary_policies: HashMap<String, BinaryPolicy>,
    pub secret_scan_allowlist: Vec<String>,
    pub secret_scan_denylist: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        let mut binary_policies = HashMap::new();
        binary_policies.insert(BinaryCategory::Image.to_string(), BinaryPolicy::Placeholder);
        binary_policies.insert(BinaryCategory::Archive.to_string(), BinaryPolicy::Placeholder);
        binary_policies.insert(BinaryCategory::Executable.to_string(), BinaryPolicy::Placeholder);
        binary_policies.insert(BinaryCategory::Other.to_string(), BinaryPolicy::Placeholder);

        Self {
            global_excludes: vec![".git".to_string(), "node_modules".to_string(), "target".to_string()],
            max_file_size_bytes: 10 * 1024 * 1024,
            max_total_size_bytes: None,
            max_files: None,
            cache_enabled: true,
            cache_path: None,
            outputs_dir: None,
            max_concurrency: None,
            llm_provider: None,
            llm_endpoint: None,
            llm_api_key: None,
            llm_model: None,
            default_format: OutputFormatKind::Xml,
            binary_policies,
            secret_scan_allowlist: Vec::new(),
            secret_scan_denylist: Vec::new(),
        }
    }
}

impl Settings {
    /// Builds the layered configuration: builtin defaults, then the user
    /// config file, then the nearest `.copytree.toml` found walking
    /// upward from `base_path`, then `COPYTREE_*` env vars. An explicit
    /// `--config` path (from the CLI's global `--config` flag) is
    /// layered in between the project file and env, matching how the
    /// teacher's own config loader treats an explicit path as an
    /// override of the discovered project file rather than a third tier.
    pub fn load(user_config_dir: &Path, base_path: &Path, explicit_config: Option<&Path>) -> Result<Self, config::ConfigError> {
        let defaults = Settings::default();
        let mut builder = Config::builder().add_source(Config::try_from(&defaults)?);

        let user_config_file = user_config_dir.join("config.toml");
        if user_config_file.is_file() {
            builder = builder.add_source(File::from(user_config_file).format(FileFormat::Toml));
        }

        if let Some(project_config) = find_project_config(base_path) {
            builder = builder.add_source(File::from(project_config).format(FileFormat::Toml));
        }

        if let Some(explicit) = explicit_config {
            builder = builder.add_source(File::from(explicit.to_path_buf()).format(FileFormat::Toml));
        }

        builder = builder.add_source(Environment::with_prefix("COPYTREE").separator("_"));

        builder.build()?.try_deserialize()
    }
}

/// Walks upward from `start` looking for `.copytree.toml`, stopping at
/// the first match or the filesystem root.
fn find_project_config(start: &Path) -> Option<PathBuf> {
    let mut dir = if start.is_file() { start.parent()?.to_path_buf() } else { start.to_path_buf() };

    loop {
        let candidate = dir.join(".copytree.toml");
        if candidate.is_file() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn defaults_carry_a_placeholder_policy_for_every_binary_category() {
        let settings = Settings::default();
        assert_eq!(settings.binary_policies.len(), 4);
        assert!(settings.cache_enabled);
    }

    #[test]
    fn project_config_is_found_by_walking_upward() {
        let root = tempdir().unwrap();
        let nested = root.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();
        fs::write(root.path().join(".copytree.toml"), "max_file_size_bytes = 123\n").unwrap();

        let found = find_project_config(&nested).expect("should find the project config above the nested dir");
        assert_eq!(found, root.path().join(".copytree.toml"));
    }

    #[test]
    fn missing_project_config_returns_none() {
        let root = tempdir().unwrap();
        assert!(find_project_config(root.path()).is_none());
    }

    #[test]
    fn env_vars_override_builtin_defaults() {
        std::env::set_var("COPYTREE_CACHE_ENABLED", "false");
        let root = tempdir().unwrap();
        let settings = Settings::load(root.path(), root.path(), None).unwrap();
        assert!(!settings.cache_enabled);
        std::env::remove_var("COPYTREE_CACHE_ENABLED");
    }
}
