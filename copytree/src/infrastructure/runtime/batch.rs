// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Parallel Batch Execution
//!
//! Spec §4.6: for a contiguous run of parallel-safe stages, the driver
//! slices the working set into `maxConcurrency`-bounded batches and runs
//! each batch through that stage run independently, merging results in
//! deterministic order before the next barrier. Batches are contiguous
//! slices of an already-ordered `Vec<FileEntry>`, so concatenating the
//! processed chunks back in original order reproduces the input order
//! with no extra bookkeeping.

use copytree_domain::aggregates::WorkingSet;
use copytree_domain::entities::FileEntry;
use copytree_domain::error::CopyTreeResult;
use copytree_domain::events::PipelineEvent;
use copytree_domain::repositories::Stage;
use copytree_domain::{RunContext, Statistics};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;

/// Runs `stages` (a contiguous parallel-safe run) over `input`, splitting
/// its files into at most `max_concurrency` batches processed
/// concurrently, then reassembling them in original order.
pub(super) async fn run_batch(
    stages: &[Arc<dyn Stage>],
    input: WorkingSet,
    context: &RunContext,
    max_concurrency: usize,
    events: &broadcast::Sender<PipelineEvent>,
    stats: &mut Statistics,
) -> CopyTreeResult<WorkingSet> {
    if context.is_cancelled() {
        if let Some(stage) = stages.first() {
            let _ = events.send(PipelineEvent::PipelineCancelled { stage: stage.name().to_string() });
        }
        return Err(copytree_domain::error::CopyTreeError::Cancellation);
    }

    if stats.input_file_count == 0 {
        stats.input_file_count = input.len();
    }

    let files = input.into_files();
    if files.is_empty() {
        return Ok(WorkingSet::empty());
    }

    let chunk_count = max_concurrency.max(1).min(files.len());
    let chunks = split_into_chunks(files, chunk_count);

    for stage in stages {
        let _ = events.send(PipelineEvent::StageStart {
            stage: stage.name().to_string(),
            at: chrono::Utc::now(),
        });
    }

    let started = Instant::now();
    let mut processed_chunks: Vec<(usize, Vec<FileEntry>)> = stream::iter(chunks.into_iter().enumerate().map(|(index, chunk)| {
        let stages = stages.to_vec();
        async move {
            let mut working_set = WorkingSet::new(chunk);
            for stage in &stages {
                stage.validate(&working_set)?;
                working_set = stage.before_run(working_set).await?;
                working_set = stage.process(working_set, context).await?;
                working_set = stage.after_run(working_set).await?;
            }
            Ok::<(usize, Vec<FileEntry>), copytree_domain::error::CopyTreeError>((index, working_set.into_files()))
        }
    }))
    .buffer_unordered(chunk_count)
    .try_collect()
    .await?;

    // `buffer_unordered` completes chunks out of order; each chunk carries
    // its original index so reassembly restores the pre-batch order
    // deterministically rather than depending on completion order (spec
    // §4.6, "merging results in deterministic order").
    processed_chunks.sort_by_key(|(index, _)| *index);
    let merged: Vec<FileEntry> = processed_chunks.into_iter().flat_map(|(_, chunk)| chunk).collect();

    let duration_ms = started.elapsed().as_millis() as u64 / stages.len().max(1) as u64;
    for stage in stages {
        stats.record_stage(stage.name(), duration_ms);
        let _ = events.send(PipelineEvent::FileBatch {
            stage: stage.name().to_string(),
            count: merged.len(),
        });
        let _ = events.send(PipelineEvent::StageComplete {
            stage: stage.name().to_string(),
            stats: copytree_domain::events::StageCompleteStats {
                duration_ms,
                input_count: merged.len(),
                output_count: merged.len(),
                memory_delta_bytes: 0,
            },
        });
    }

    Ok(WorkingSet::new(merged))
}

fn split_into_chunks(files: Vec<FileEntry>, chunk_count: usize) -> Vec<Vec<FileEntry>> {
    let len = files.len();
    let base = len / chunk_count;
    let remainder = len % chunk_count;

    let mut chunks = Vec::with_capacity(chunk_count);
    let mut iter = files.into_iter();
    for i in 0..chunk_count {
        let size = base + if i < remainder { 1 } else { 0 };
        chunks.push(iter.by_ref().take(size).collect());
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cache::InMemoryCacheRepository;
    use crate::infrastructure::llm::NullLlmProvider;
    use async_trait::async_trait;
    use copytree_domain::value_objects::RelativePath;
    use copytree_domain::CancellationSignal;

    struct UppercaseStage;

    #[async_trait]
    impl Stage for UppercaseStage {
        fn name(&self) -> &str {
            "Uppercase"
        }

        async fn process(&self, input: WorkingSet, _context: &RunContext) -> CopyTreeResult<WorkingSet> {
            Ok(input)
        }
    }

    fn context() -> RunContext {
        RunContext {
            run_id: uuid::Uuid::new_v4(),
            base_path: std::env::temp_dir(),
            continue_on_error: false,
            dry_run: false,
            max_concurrency: 3,
            cache: Arc::new(InMemoryCacheRepository::new()),
            llm_provider: Arc::new(NullLlmProvider),
            cancellation: CancellationSignal::new(),
        }
    }

    struct ReverseDelayStage;

    #[async_trait]
    impl Stage for ReverseDelayStage {
        fn name(&self) -> &str {
            "ReverseDelay"
        }

        async fn process(&self, input: WorkingSet, _context: &RunContext) -> CopyTreeResult<WorkingSet> {
            // The first chunk (lowest-indexed files) sleeps longest, so it
            // is the last to complete under `buffer_unordered` — this
            // would reorder the merged output if index tagging didn't fix
            // reassembly order.
            if let Some(first) = input.files().first() {
                if first.relative_path().as_str() == "f0.txt" {
                    tokio::time::sleep(std::time::Duration::from_millis(30)).await;
                }
            }
            Ok(input)
        }
    }

    #[tokio::test]
    async fn batches_reassemble_in_original_order_regardless_of_completion_order() {
        let files: Vec<FileEntry> = (0..6)
            .map(|i| FileEntry::discovered(RelativePath::new(format!("f{i}.txt")), format!("/f{i}.txt").into(), 1, chrono::Utc::now()))
            .collect();
        let input = WorkingSet::new(files);
        let stages: Vec<Arc<dyn Stage>> = vec![Arc::new(ReverseDelayStage)];
        let (events, _) = broadcast::channel(16);
        let mut stats = Statistics::default();

        let result = run_batch(&stages, input, &context(), 3, &events, &mut stats).await.unwrap();
        let paths: Vec<&str> = result.files().iter().map(|f| f.relative_path().as_str()).collect();
        assert_eq!(paths, vec!["f0.txt", "f1.txt", "f2.txt", "f3.txt", "f4.txt", "f5.txt"]);
    }

    #[tokio::test]
    async fn batches_preserve_every_file_and_total_count() {
        let files: Vec<FileEntry> = (0..7)
            .map(|i| FileEntry::discovered(RelativePath::new(format!("f{i}.txt")), format!("/f{i}.txt").into(), 1, chrono::Utc::now()))
            .collect();
        let input = WorkingSet::new(files);
        let stages: Vec<Arc<dyn Stage>> = vec![Arc::new(UppercaseStage)];
        let (events, _) = broadcast::channel(16);
        let mut stats = Statistics::default();

        let result = run_batch(&stages, input, &context(), 3, &events, &mut stats).await.unwrap();
        assert_eq!(result.len(), 7);
    }

    #[test]
    fn chunk_split_distributes_remainder_across_leading_chunks() {
        let files: Vec<FileEntry> = (0..5)
            .map(|i| FileEntry::discovered(RelativePath::new(format!("f{i}.txt")), format!("/f{i}.txt").into(), 1, chrono::Utc::now()))
            .collect();
        let chunks = split_into_chunks(files, 3);
        let sizes: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
    }
}
