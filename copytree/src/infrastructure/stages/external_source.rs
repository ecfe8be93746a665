// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # ExternalSourceStage
//!
//! SPEC_FULL.md: resolves `--external` entries into synthetic
//! `FileEntry` values. Only local paths and `file://` URLs resolve;
//! remote HTTP fetch is out of scope per spec §1 ("no network indexing
//! beyond optional per-file LLM calls") and any other scheme is a
//! `ConfigurationError`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use copytree_domain::aggregates::WorkingSet;
use copytree_domain::error::{CopyTreeError, CopyTreeResult};
use copytree_domain::repositories::Stage;
use copytree_domain::value_objects::RelativePath;
use copytree_domain::{entities::FileEntry, RunContext};
use std::path::{Path, PathBuf};

pub struct ExternalSourceStage {
    pub sources: Vec<String>,
}

impl ExternalSourceStage {
    pub fn new(sources: Vec<String>) -> Self {
        Self { sources }
    }

    fn resolve_one(&self, raw: &str, base_path: &Path) -> CopyTreeResult<FileEntry> {
        let path = if let Some(local) = raw.strip_prefix("file://") {
            PathBuf::from(local)
        } else if raw.contains("://") {
            return Err(CopyTreeError::Configuration {
                message: format!("unsupported external source scheme in {raw:?}; only local paths and file:// URLs resolve"),
            });
        } else {
            PathBuf::from(raw)
        };

        let metadata = std::fs::metadata(&path).map_err(|err| CopyTreeError::Path {
            path: path.clone(),
            message: format!("external source unreadable: {err}"),
        })?;
        let modified = metadata.modified().map(DateTime::<Utc>::from).unwrap_or_else(|_| Utc::now());
        let relative = path.strip_prefix(base_path).unwrap_or(&path);
        Ok(FileEntry::discovered(RelativePath::new(relative), path, metadata.len(), modified))
    }
}

#[async_trait]
impl Stage for ExternalSourceStage {
    fn name(&self) -> &str {
        "ExternalSource"
    }

    async fn process(&self, mut input: WorkingSet, context: &RunContext) -> CopyTreeResult<WorkingSet> {
        for raw in &self.sources {
            let entry = self.resolve_one(raw, &context.base_path)?;
            input.files_mut().push(entry);
        }
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unsupported_schemes() {
        let stage = ExternalSourceStage::new(vec!["https://example.com/a.txt".to_string()]);
        let result = stage.resolve_one("https://example.com/a.txt", Path::new("/tmp"));
        assert!(matches!(result, Err(CopyTreeError::Configuration { .. })));
    }

    #[test]
    fn resolves_a_local_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("extra.txt");
        std::fs::write(&file_path, "content").unwrap();
        let stage = ExternalSourceStage::new(vec![file_path.display().to_string()]);
        let entry = stage.resolve_one(&file_path.display().to_string(), dir.path()).unwrap();
        assert_eq!(entry.relative_path().as_str(), "extra.txt");
    }
}
