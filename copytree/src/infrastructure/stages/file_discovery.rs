// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # FileDiscoveryStage
//!
//! Spec §4.7: walks `basePath`, applying global/base-path directory
//! excludes, global file name excludes, an optional max depth, the
//! `.gitignore`/`.ctreeignore` matcher, and an "always include" list that
//! bypasses every exclusion except unreadable files. Emits a deduplicated
//! `FileEntry` list with path/size/mtime only.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use copytree_domain::aggregates::WorkingSet;
use copytree_domain::error::{CopyTreeError, CopyTreeResult};
use copytree_domain::repositories::Stage;
use copytree_domain::services::IgnoreMatcher;
use copytree_domain::value_objects::RelativePath;
use copytree_domain::{entities::FileEntry, RunContext};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const GLOBAL_DIRECTORY_EXCLUDES: &[&str] = &[".git", "node_modules", "target", ".hg", ".svn"];
const GLOBAL_FILE_EXCLUDES: &[&str] = &[".DS_Store", "Thumbs.db"];
const IGNORE_FILE_NAMES: &[&str] = &[".gitignore", ".ctreeignore"];

pub struct FileDiscoveryStage {
    pub base_path_excludes: Vec<String>,
    pub max_depth: Option<usize>,
    pub always_include: Vec<String>,
}

impl FileDiscoveryStage {
    pub fn new(base_path_excludes: Vec<String>, max_depth: Option<usize>, always_include: Vec<String>) -> Self {
        Self { base_path_excludes, max_depth, always_include }
    }

    fn walk(&self, base_path: &Path) -> CopyTreeResult<Vec<FileEntry>> {
        let mut matcher = IgnoreMatcher::new();
        let mut entries = Vec::new();
        let mut seen = HashSet::new();
        self.walk_dir(base_path, base_path, "", 1, &mut matcher, &mut entries, &mut seen)?;

        for always in &self.always_include {
            let candidate = base_path.join(always);
            if candidate.is_file() && !seen.contains(always) {
                if let Ok(metadata) = candidate.metadata() {
                    let modified = metadata.modified().map(DateTime::<Utc>::from).unwrap_or_else(|_| Utc::now());
                    entries.push(FileEntry::discovered(RelativePath::new(always), candidate, metadata.len(), modified));
                    seen.insert(always.clone());
                }
            }
        }

        Ok(entries)
    }

    #[allow(clippy::too_many_arguments)]
    fn walk_dir(
        &self,
        base_path: &Path,
        dir: &Path,
        relative_dir: &str,
        depth: usize,
        matcher: &mut IgnoreMatcher,
        entries: &mut Vec<FileEntry>,
        seen: &mut HashSet<String>,
    ) -> CopyTreeResult<()> {
        if let Some(max_depth) = self.max_depth {
            if depth > max_depth {
                return Ok(());
            }
        }

        for ignore_name in IGNORE_FILE_NAMES {
            let ignore_path = dir.join(ignore_name);
            if let Ok(contents) = std::fs::read_to_string(&ignore_path) {
                let lines: Vec<&str> = contents.lines().collect();
                matcher.add_patterns(relative_dir, &lines)?;
            }
        }

        let read_dir = std::fs::read_dir(dir).map_err(|err| CopyTreeError::Path {
            path: dir.to_path_buf(),
            message: err.to_string(),
        })?;

        for entry in read_dir {
            let Ok(entry) = entry else { continue };
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            let Ok(file_type) = entry.file_type() else { continue };
            let relative_path = path.strip_prefix(base_path).unwrap_or(&path);
            let relative_str = RelativePath::new(relative_path).as_str().to_string();

            if file_type.is_dir() {
                if depth == 1 && self.base_path_excludes.iter().any(|e| e == &name) {
                    continue;
                }
                if GLOBAL_DIRECTORY_EXCLUDES.contains(&name.as_str()) {
                    continue;
                }
                if matcher.is_ignored(&relative_str, true).ignored {
                    continue;
                }
                self.walk_dir(base_path, &path, &relative_str, depth + 1, matcher, entries, seen)?;
            } else if file_type.is_file() {
                if GLOBAL_FILE_EXCLUDES.contains(&name.as_str()) {
                    continue;
                }
                if matcher.is_ignored(&relative_str, false).ignored {
                    continue;
                }
                if seen.contains(&relative_str) {
                    continue;
                }
                let Ok(metadata) = entry.metadata() else { continue };
                let modified = metadata.modified().map(DateTime::<Utc>::from).unwrap_or_else(|_| Utc::now());
                entries.push(FileEntry::discovered(RelativePath::new(relative_path), path.clone(), metadata.len(), modified));
                seen.insert(relative_str);
            }
        }

        Ok(())
    }
}

#[async_trait]
impl Stage for FileDiscoveryStage {
    fn name(&self) -> &str {
        "FileDiscovery"
    }

    async fn process(&self, _input: WorkingSet, context: &RunContext) -> CopyTreeResult<WorkingSet> {
        let base_path: PathBuf = context.base_path.clone();
        if !base_path.is_dir() {
            return Err(CopyTreeError::Path {
                path: base_path,
                message: "base path is not a directory".to_string(),
            });
        }
        let entries = self.walk(&base_path)?;
        Ok(WorkingSet::new(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use copytree_domain::repositories::CacheRepository;
    use copytree_domain::CancellationSignal;
    use std::sync::Arc;

    struct NullCache;
    #[async_trait]
    impl CacheRepository for NullCache {
        async fn get(&self, _key: &copytree_domain::repositories::CacheKey) -> CopyTreeResult<Option<String>> {
            Ok(None)
        }
        async fn put(&self, _key: &copytree_domain::repositories::CacheKey, _value: &str) -> CopyTreeResult<()> {
            Ok(())
        }
    }

    fn context(base_path: PathBuf) -> RunContext {
        RunContext {
            run_id: uuid::Uuid::new_v4(),
            base_path,
            continue_on_error: false,
            dry_run: false,
            max_concurrency: 4,
            cache: Arc::new(NullCache),
            llm_provider: Arc::new(crate::infrastructure::llm::NullLlmProvider),
            cancellation: CancellationSignal::new(),
        }
    }

    #[tokio::test]
    async fn discovers_files_and_skips_global_excludes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "hello").unwrap();
        std::fs::create_dir(dir.path().join("node_modules")).unwrap();
        std::fs::write(dir.path().join("node_modules/ignored.js"), "x").unwrap();

        let stage = FileDiscoveryStage::new(Vec::new(), None, Vec::new());
        let output = stage.process(WorkingSet::empty(), &context(dir.path().to_path_buf())).await.unwrap();
        let paths: Vec<&str> = output.files().iter().map(|f| f.relative_path().as_str()).collect();
        assert_eq!(paths, vec!["a.txt"]);
    }

    #[tokio::test]
    async fn respects_gitignore_patterns() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".gitignore"), "*.log\n").unwrap();
        std::fs::write(dir.path().join("a.log"), "x").unwrap();
        std::fs::write(dir.path().join("a.txt"), "x").unwrap();

        let stage = FileDiscoveryStage::new(Vec::new(), None, Vec::new());
        let output = stage.process(WorkingSet::empty(), &context(dir.path().to_path_buf())).await.unwrap();
        let paths: Vec<&str> = output.files().iter().map(|f| f.relative_path().as_str()).collect();
        assert_eq!(paths, vec!["a.txt"]);
    }
}
