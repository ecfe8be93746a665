// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Pipeline Driver
//!
//! Spec §4.6, grounded on `adaptive_pipeline::infrastructure::runtime::
//! stage_executor::BasicStageExecutor`: drives an ordered list of `Stage`
//! trait objects over a `WorkingSet`, publishing `PipelineEvent`s on a
//! `tokio::sync::broadcast` channel (Design Notes §9: "event emission
//! through an emitter object becomes message passing on typed channels")
//! and accumulating `Statistics`. `OutputFormattingStage` and
//! `DeliverStage` are invoked directly after the stage loop rather than
//! through the `Stage` trait, per their own doc comments.

mod batch;

use crate::infrastructure::delivery::{DeliveryOutcome, DeliveryTarget};
use crate::infrastructure::formatters::FormatterContext;
use crate::infrastructure::stages::{DeliverStage, OutputFormattingStage};
use copytree_domain::aggregates::WorkingSet;
use copytree_domain::error::{CopyTreeError, CopyTreeResult};
use copytree_domain::events::{PipelineEvent, StageCompleteStats};
use copytree_domain::repositories::Stage;
use copytree_domain::{RunContext, Statistics};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;

use batch::run_batch;

/// Stages whose per-file work has no whole-set invariant, so a parallel
/// run may slice the working set into batches and run each batch through
/// them independently (spec §4.6: "Only stages marked safe for parallel
/// execution participate; order-sensitive stages force a barrier").
/// Every other stage in the canonical order reasons about the complete
/// file list (dedup, sort, limits, rule evaluation) and always runs as a
/// single whole-set step even in parallel mode.
const PARALLEL_SAFE_STAGES: &[&str] = &["FileLoad", "Transform"];

/// Capacity of the broadcast channel; events that outlive every receiver
/// (no `--info`, no test subscriber) are simply dropped, which
/// `broadcast` treats as a lagged receiver rather than a backpressure
/// failure, so a generous buffer only matters for listeners that are
/// actually subscribed.
const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    #[default]
    Sequential,
    Parallel,
}

/// Drives the twelve `Stage`-trait stages of the canonical order (spec
/// §2): `FileDiscovery` through `CharLimit`. `OutputFormat` and `Deliver`
/// are handled by `run_pipeline` below, after this runner returns.
pub struct PipelineRunner {
    stages: Vec<Arc<dyn Stage>>,
    mode: ExecutionMode,
    continue_on_error: bool,
    events: broadcast::Sender<PipelineEvent>,
}

impl PipelineRunner {
    pub fn new(stages: Vec<Arc<dyn Stage>>, mode: ExecutionMode, continue_on_error: bool) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { stages, mode, continue_on_error, events }
    }

    /// Subscribes to the pipeline's event stream (spec §4.5). The
    /// `--info` summary and tests are the intended consumers; `tracing`
    /// spans remain the human-facing log regardless of subscription.
    pub fn subscribe(&self) -> broadcast::Receiver<PipelineEvent> {
        self.events.subscribe()
    }

    pub async fn run(&self, context: &RunContext) -> CopyTreeResult<(WorkingSet, Statistics)> {
        for stage in &self.stages {
            stage.init(context).await?;
        }

        match self.mode {
            ExecutionMode::Sequential => self.run_sequential(context).await,
            ExecutionMode::Parallel => self.run_parallel(context).await,
        }
    }

    async fn run_sequential(&self, context: &RunContext) -> CopyTreeResult<(WorkingSet, Statistics)> {
        let mut working_set = WorkingSet::empty();
        let mut stats = Statistics::default();

        for stage in &self.stages {
            working_set = self.run_one_stage(stage.as_ref(), working_set, context, &mut stats).await?;
        }

        stats.output_file_count = working_set.len();
        Ok((working_set, stats))
    }

    /// Spec §4.6: runs whole-set stages in sequence as usual, but slices
    /// the working set into `maxConcurrency`-bounded batches for any
    /// contiguous run of parallel-safe stages, processing each batch
    /// concurrently and rejoining in original order before the next
    /// whole-set stage (or output formatting) sees the merged result.
    async fn run_parallel(&self, context: &RunContext) -> CopyTreeResult<(WorkingSet, Statistics)> {
        let mut working_set = WorkingSet::empty();
        let mut stats = Statistics::default();
        stats.input_file_count = 0;

        let mut index = 0;
        while index < self.stages.len() {
            let stage = self.stages[index].as_ref();

            if PARALLEL_SAFE_STAGES.contains(&stage.name()) {
                let start = index;
                while index < self.stages.len() && PARALLEL_SAFE_STAGES.contains(&self.stages[index].name()) {
                    index += 1;
                }
                let batch_stages = &self.stages[start..index];
                working_set = run_batch(batch_stages, working_set, context, context.max_concurrency.max(1), &self.events, &mut stats).await?;
            } else {
                working_set = self.run_one_stage(stage, working_set, context, &mut stats).await?;
                index += 1;
            }
        }

        stats.output_file_count = working_set.len();
        Ok((working_set, stats))
    }

    async fn run_one_stage(&self, stage: &dyn Stage, input: WorkingSet, context: &RunContext, stats: &mut Statistics) -> CopyTreeResult<WorkingSet> {
        if context.is_cancelled() {
            let _ = self.events.send(PipelineEvent::PipelineCancelled { stage: stage.name().to_string() });
            return Err(CopyTreeError::Cancellation);
        }

        if stats.input_file_count == 0 {
            stats.input_file_count = input.len();
        }

        let _ = self.events.send(PipelineEvent::StageStart {
            stage: stage.name().to_string(),
            at: chrono::Utc::now(),
        });

        let input_count = input.len();
        let started = Instant::now();

        if let Err(err) = stage.validate(&input) {
            return self.resolve_failure(stage, err, input, stats).await;
        }

        let original_input = input.clone();
        let outcome = async {
            let prepared = stage.before_run(input).await?;
            let processed = stage.process(prepared, context).await?;
            stage.after_run(processed).await
        }
        .await;

        match outcome {
            Ok(output) => {
                let duration_ms = started.elapsed().as_millis() as u64;
                stats.record_stage(stage.name(), duration_ms);
                let _ = self.events.send(PipelineEvent::FileBatch {
                    stage: stage.name().to_string(),
                    count: output.len(),
                });
                let _ = self.events.send(PipelineEvent::StageComplete {
                    stage: stage.name().to_string(),
                    stats: StageCompleteStats {
                        duration_ms,
                        input_count,
                        output_count: output.len(),
                        memory_delta_bytes: 0,
                    },
                });
                Ok(output)
            }
            Err(err) => {
                // `before_run`/`process`/`after_run` re-run from the
                // original input is not attempted; `on_error`/
                // `handle_error`/continue-on-error all see the stage's
                // original, pre-`before_run` input.
                self.resolve_failure(stage, err, original_input, stats).await
            }
        }
    }

    /// Spec §4.18: `failed` is terminal unless `handleError` recovers, or
    /// `continueOnError` passes the stage's input through unchanged.
    async fn resolve_failure(&self, stage: &dyn Stage, err: CopyTreeError, input: WorkingSet, stats: &mut Statistics) -> CopyTreeResult<WorkingSet> {
        stage.on_error(&err, &input);
        stats.record_error(format!("{}: {}", stage.name(), err));
        let _ = self.events.send(PipelineEvent::StageError {
            stage: stage.name().to_string(),
            kind: err.kind().to_string(),
            message: err.to_string(),
        });

        if !err.is_recoverable() {
            return Err(err);
        }

        if let Some(recovered) = stage.handle_error(&err, input.clone()).await {
            let _ = self.events.send(PipelineEvent::StageRecover { stage: stage.name().to_string() });
            return Ok(recovered);
        }

        if self.continue_on_error {
            let _ = self.events.send(PipelineEvent::StageRecover { stage: stage.name().to_string() });
            return Ok(input);
        }

        Err(err)
    }
}

/// Bundles everything a use case needs to report after a run completes.
pub struct PipelineRunResult {
    pub working_set: WorkingSet,
    pub statistics: Statistics,
    pub rendered: String,
    /// `None` when `context.dry_run` suppressed delivery.
    pub delivery: Option<DeliveryOutcome>,
}

/// Runs the stage engine to completion, then formats and (unless
/// `context.dry_run`) delivers the result. This free function, not a
/// method on `PipelineRunner`, is the thing `stages::mod`'s doc comment
/// means by "invoked directly by `infrastructure::runtime`" for the two
/// non-`Stage` steps.
#[allow(clippy::too_many_arguments)]
pub async fn run_pipeline(
    runner: &PipelineRunner,
    context: &RunContext,
    output_stage: &OutputFormattingStage,
    formatter_context: &FormatterContext<'_>,
    deliver_stage: &DeliverStage<'_>,
    target: DeliveryTarget,
) -> CopyTreeResult<PipelineRunResult> {
    let (working_set, statistics) = runner.run(context).await?;
    let rendered = output_stage.render(&working_set, formatter_context)?;

    let delivery = if context.dry_run {
        None
    } else {
        Some(deliver_stage.deliver(&working_set, &rendered, target)?)
    };

    Ok(PipelineRunResult { working_set, statistics, rendered, delivery })
}
