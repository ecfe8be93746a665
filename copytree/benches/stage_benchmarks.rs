// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Benchmarks for the whole-set stages (dedup, sort, limit) that scale
//! with the size of a run's working set rather than per-file I/O,
//! mirroring the teacher's `file_io_benchmark.rs`.

use copytree::infrastructure::cache::InMemoryCacheRepository;
use copytree::infrastructure::llm::NullLlmProvider;
use copytree::infrastructure::stages::{DedupStage, LimitStage, SortStage};
use copytree_domain::aggregates::WorkingSet;
use copytree_domain::entities::FileEntry;
use copytree_domain::value_objects::{ContentHash, EncodingTag, RelativePath};
use copytree_domain::repositories::Stage;
use copytree_domain::{CancellationSignal, RunContext};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

fn context() -> RunContext {
    RunContext {
        run_id: uuid::Uuid::new_v4(),
        base_path: std::env::temp_dir(),
        continue_on_error: true,
        dry_run: false,
        max_concurrency: 4,
        cache: Arc::new(InMemoryCacheRepository::new()),
        llm_provider: Arc::new(NullLlmProvider),
        cancellation: CancellationSignal::new(),
    }
}

fn working_set_with_duplicates(count: usize) -> WorkingSet {
    let files = (0..count)
        .map(|i| {
            let path = format!("dir{}/file{}.txt", i % 16, i);
            let content = format!("content-{}", i % (count / 4).max(1));
            let mut entry = FileEntry::discovered(RelativePath::new(&path), path.clone().into(), content.len() as u64, chrono::Utc::now());
            entry.set_content(content.clone(), EncodingTag::Utf8, ContentHash::of_bytes(content.as_bytes()));
            entry
        })
        .collect();
    WorkingSet::new(files)
}

fn bench_dedup(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let ctx = context();
    let mut group = c.benchmark_group("dedup_stage");
    for size in [100usize, 1_000, 5_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter_batched(
                || working_set_with_duplicates(size),
                |working_set| runtime.block_on(async { black_box(DedupStage.process(working_set, &ctx).await.unwrap()) }),
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_sort(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let ctx = context();
    let mut group = c.benchmark_group("sort_stage");
    for size in [100usize, 1_000, 5_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter_batched(
                || working_set_with_duplicates(size),
                |working_set| {
                    let stage = SortStage::new(false);
                    runtime.block_on(async { black_box(stage.process(working_set, &ctx).await.unwrap()) })
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_limit(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let ctx = context();
    let mut group = c.benchmark_group("limit_stage");
    for size in [100usize, 1_000, 5_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter_batched(
                || working_set_with_duplicates(size),
                |working_set| {
                    let stage = LimitStage::new(Some(size / 2), None);
                    runtime.block_on(async { black_box(stage.process(working_set, &ctx).await.unwrap()) })
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_dedup, bench_sort, bench_limit);
criterion_main!(benches);
