// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # TransformStage
//!
//! Spec §4.13: resolves a transformer per file via the registry (§4.3)
//! and runs it. A profile's `transformers` bindings (§3, glob ->
//! transformer name + options) are tried first in declaration order;
//! the first whose glob matches the file's relative path wins. A file
//! matched by no binding falls back to the registry's extension/
//! priority resolution (`get_for_file`). Per-file concurrency is
//! bounded by `max_concurrency`; within one file transformation is
//! sequential (only one transformer binding is applied per file in this
//! model — chained bindings are a sequence of `TransformStage` runs
//! upstream, not internal looping here). Every transformation goes
//! through the content cache (§4.4). Failure policy: a failing
//! transformer replaces the file's content with a short failure notice
//! and sets `transform_failed=true`; the pipeline continues.

use async_trait::async_trait;
use copytree_domain::aggregates::WorkingSet;
use copytree_domain::entities::FileEntry;
use copytree_domain::error::CopyTreeResult;
use copytree_domain::profile::TransformerBinding;
use copytree_domain::repositories::{CacheKey, Stage};
use copytree_domain::services::matches_glob;
use copytree_domain::value_objects::OptionsHash;
use copytree_domain::RunContext;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;

use crate::infrastructure::transform::registry::{Transformer, TransformerRegistry};

pub struct TransformStage {
    registry: Arc<TransformerRegistry>,
    bindings: Vec<TransformerBinding>,
}

impl TransformStage {
    pub fn new(registry: Arc<TransformerRegistry>, bindings: Vec<TransformerBinding>) -> Self {
        Self { registry, bindings }
    }

    /// The first binding whose glob matches, else the registry's own
    /// extension/priority resolution with no per-file options.
    fn resolve(&self, file: &FileEntry) -> CopyTreeResult<(Arc<dyn Transformer>, HashMap<String, String>)> {
        for binding in &self.bindings {
            if matches_glob(&binding.glob, file.relative_path().as_str()).unwrap_or(false) {
                if let Some(instance) = self.registry.instance(&binding.transformer) {
                    return Ok((instance, binding.options.clone()));
                }
            }
        }
        self.registry.get_for_file(file).map(|transformer| (transformer, HashMap::new()))
    }
}

#[async_trait]
impl Stage for TransformStage {
    fn name(&self) -> &str {
        "Transform"
    }

    async fn process(&self, mut input: WorkingSet, context: &RunContext) -> CopyTreeResult<WorkingSet> {
        let snapshot: Vec<(usize, copytree_domain::entities::FileEntry)> = input
            .files()
            .iter()
            .enumerate()
            .filter(|(_, file)| !file.is_excluded() && !file.is_binary())
            .map(|(index, file)| (index, file.clone()))
            .collect();

        let max_concurrency = context.max_concurrency.max(1);
        let cache = Arc::clone(&context.cache);
        let this = self;

        let results: Vec<(usize, String, bool)> = stream::iter(snapshot)
            .map(move |(index, file)| {
                let cache = Arc::clone(&cache);
                async move {
                    let (transformer, options) = match this.resolve(&file) {
                        Ok(resolved) => resolved,
                        Err(err) => return (index, format!("[transform failed: {err}]"), true),
                    };
                    let options_hash = {
                        let mut pairs: Vec<(String, String)> = options.clone().into_iter().collect();
                        pairs.sort_by(|a, b| a.0.cmp(&b.0));
                        OptionsHash::of_sorted_pairs(&pairs)
                    };

                    let cache_key = file.content_hash().map(|hash| {
                        CacheKey(hash.derive_cache_key(&transformer.identity(), &file.absolute_path().to_string_lossy(), options_hash.as_str()))
                    });

                    if let Some(key) = &cache_key {
                        if let Ok(Some(cached)) = cache.get(key).await {
                            return (index, cached, false);
                        }
                    }

                    match transformer.transform(&file, &options).await {
                        Ok(content) => {
                            if let Some(key) = &cache_key {
                                let _ = cache.put(key, &content).await;
                            }
                            (index, content, false)
                        }
                        Err(err) => (index, format!("[transform failed: {err}]"), true),
                    }
                }
            })
            .buffer_unordered(max_concurrency)
            .collect()
            .await;

        for (index, content, failed) in results {
            let file = &mut input.files_mut()[index];
            if failed {
                file.mark_transform_failed(content);
            } else {
                file.replace_content(content);
            }
        }

        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::transform::builtins::MarkdownStripTransformer;
    use chrono::Utc;
    use copytree_domain::entities::{FileEntry, TransformerSpec};
    use copytree_domain::value_objects::{ContentHash, EncodingTag, RelativePath};

    fn context() -> RunContext {
        super::super::test_support::null_context(std::env::temp_dir())
    }

    #[tokio::test]
    async fn applies_the_matched_transformer() {
        let mut registry = TransformerRegistry::new();
        registry.register(
            TransformerSpec::new("markdown-strip").with_extensions(["md"]).as_default(),
            Arc::new(MarkdownStripTransformer),
        );

        let mut entry = FileEntry::discovered(RelativePath::new("a.md"), "/a.md".into(), 0, Utc::now());
        let raw = "# Title\ntext";
        entry.set_content(raw.to_string(), EncodingTag::Utf8, ContentHash::of_bytes(raw.as_bytes()));

        let stage = TransformStage::new(Arc::new(registry), Vec::new());
        let output = stage.process(WorkingSet::new(vec![entry]), &context()).await.unwrap();
        assert!(!output.files()[0].content().unwrap().contains('#'));
        assert!(!output.files()[0].transform_failed());
    }

    #[tokio::test]
    async fn a_matching_profile_binding_overrides_extension_resolution() {
        let mut registry = TransformerRegistry::new();
        registry.register(TransformerSpec::new("default-loader").as_default(), Arc::new(crate::infrastructure::transform::builtins::DefaultLoaderTransformer));
        registry.register(TransformerSpec::new("markdown-strip"), Arc::new(MarkdownStripTransformer));

        let mut entry = FileEntry::discovered(RelativePath::new("docs/readme.txt"), "/docs/readme.txt".into(), 0, Utc::now());
        let raw = "# Title\ntext";
        entry.set_content(raw.to_string(), EncodingTag::Utf8, ContentHash::of_bytes(raw.as_bytes()));

        let bindings = vec![TransformerBinding {
            glob: "docs/**".to_string(),
            transformer: "markdown-strip".to_string(),
            options: HashMap::new(),
        }];
        let stage = TransformStage::new(Arc::new(registry), bindings);
        let output = stage.process(WorkingSet::new(vec![entry]), &context()).await.unwrap();
        assert!(!output.files()[0].content().unwrap().contains('#'));
    }
}
