// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Run Copy Use Case
//!
//! Orchestrates one `copy` invocation end to end: resolves the profile
//! and layered settings, builds the run's collaborators (cache, LLM
//! provider, transformer registry), assembles the canonical stage order
//! (spec §2), and drives it through `infrastructure::runtime::run_pipeline`.
//! Grounded on the teacher's `application::use_cases::process_file`: one
//! function per command, building its `RunContext`/equivalent up front
//! and delegating the actual execution to the infrastructure layer.

use crate::application::commands::{DeliveryChoice, RunCopyCommand};
use crate::application::services::load_profile;
use crate::infrastructure::cache::{InMemoryCacheRepository, SqliteCacheRepository};
use crate::infrastructure::config::Settings;
use crate::infrastructure::delivery::DeliveryTarget;
use crate::infrastructure::formatters::FormatterContext;
use crate::infrastructure::llm::{HttpLlmProvider, NullLlmProvider};
use crate::infrastructure::runtime::{run_pipeline, ExecutionMode, PipelineRunResult, PipelineRunner};
use crate::infrastructure::secret_scan::{AllowDenyLists, SecretScanner};
use crate::infrastructure::stages::{
    CharLimitStage, DedupStage, DeliverStage, ExternalSourceStage, FileDiscoveryStage, FileLoadStage, GitFilterStage, GitMode,
    LimitStage, OptionalLlmFilterStage, OutputFormattingStage, ProfileFilterStage, RulesetFilterStage, SortStage, TransformStage,
};
use crate::infrastructure::transform::builtins::{
    CodeSummaryTransformer, CsvPreviewTransformer, DefaultLoaderTransformer, ImageToTextTransformer, MarkdownStripTransformer,
    PdfToTextTransformer, PiiMaskingTransformer, UnitTestSummaryTransformer,
};
use crate::infrastructure::transform::registry::TransformerRegistry;
use copytree_bootstrap::Platform;
use copytree_domain::entities::TransformerSpec;
use copytree_domain::error::{CopyTreeError, CopyTreeResult};
use copytree_domain::profile::Profile;
use copytree_domain::repositories::{CacheRepository, LlmProvider, Stage};
use copytree_domain::{CancellationSignal, RunContext};
use std::sync::Arc;
use uuid::Uuid;

/// Registers every built-in transformer (spec §4.3). `PdfToTextTransformer`
/// and `ImageToTextTransformer` are reachable only through an explicit
/// profile binding (`Profile.transformers`), never through extension
/// resolution: `FileLoadStage` classifies PDFs and images as binary, and
/// `TransformStage`'s snapshot filter skips binary entries before
/// `resolve()` ever runs (spec §4.13, "binary files do not reach the
/// transform stage unless a profile explicitly routes them there" —
/// see DESIGN.md). Registering them without extensions keeps them out of
/// `get_for_file`'s resolution path entirely, so only a named binding can
/// select them.
fn build_transformer_registry(llm_provider: Arc<dyn LlmProvider>) -> CopyTreeResult<Arc<TransformerRegistry>> {
    let mut registry = TransformerRegistry::new();

    registry.register(
        TransformerSpec::new("default-loader").as_default().with_priority(0),
        Arc::new(DefaultLoaderTransformer),
    );
    registry.register(
        TransformerSpec::new("markdown-strip").with_extensions(["md", "markdown"]).with_priority(10),
        Arc::new(MarkdownStripTransformer),
    );
    registry.register(
        TransformerSpec::new("csv-preview").with_extensions(["csv"]).with_priority(10),
        Arc::new(CsvPreviewTransformer),
    );
    registry.register(TransformerSpec::new("pdf-to-text"), Arc::new(PdfToTextTransformer));
    registry.register(TransformerSpec::new("image-to-text"), Arc::new(ImageToTextTransformer));
    registry.register(
        TransformerSpec::new("code-summary").with_priority(5),
        Arc::new(CodeSummaryTransformer::new(Some(Arc::clone(&llm_provider)))),
    );
    registry.register(
        TransformerSpec::new("unit-test-summary").with_priority(5),
        Arc::new(UnitTestSummaryTransformer::new(Some(llm_provider))),
    );
    registry.register(TransformerSpec::new("pii-masking"), Arc::new(PiiMaskingTransformer));

    registry.validate_dependencies()?;
    Ok(Arc::new(registry))
}

async fn build_cache(settings: &Settings) -> CopyTreeResult<Arc<dyn CacheRepository>> {
    if !settings.cache_enabled {
        return Ok(Arc::new(InMemoryCacheRepository::new()));
    }

    match &settings.cache_path {
        Some(path) => {
            let repository = SqliteCacheRepository::open(path).await?;
            Ok(Arc::new(repository))
        }
        None => Ok(Arc::new(InMemoryCacheRepository::new())),
    }
}

fn build_llm_provider(settings: &Settings) -> CopyTreeResult<Arc<dyn LlmProvider>> {
    match settings.llm_provider.as_deref() {
        None | Some("none") => Ok(Arc::new(NullLlmProvider)),
        Some("http") => {
            let endpoint = settings.llm_endpoint.clone().ok_or_else(|| CopyTreeError::Configuration {
                message: "llm_provider = \"http\" requires llm_endpoint to be set".to_string(),
            })?;
            let api_key = settings.llm_api_key.clone().unwrap_or_default();
            let model = settings.llm_model.clone().unwrap_or_else(|| "default".to_string());
            Ok(Arc::new(HttpLlmProvider::new(endpoint, api_key, model)?))
        }
        Some(other) => Err(CopyTreeError::Configuration {
            message: format!("unknown llm_provider {other:?}; expected \"none\" or \"http\""),
        }),
    }
}

fn resolve_profile(command: &RunCopyCommand, user_config_dir: &std::path::Path) -> CopyTreeResult<Profile> {
    let mut profile = match &command.profile {
        Some(name) => load_profile(name, user_config_dir)?,
        None => Profile::empty(),
    };

    profile.include.extend(command.filters.iter().cloned());
    profile.exclude.extend(command.excludes.iter().cloned());
    Ok(profile)
}

fn resolve_git_mode(command: &RunCopyCommand) -> Option<GitMode> {
    if command.modified {
        Some(GitMode::Modified)
    } else {
        command.changed.clone().map(GitMode::ChangedSince)
    }
}

fn resolve_delivery_target(choice: &DeliveryChoice, platform: &dyn Platform) -> DeliveryTarget {
    match choice {
        DeliveryChoice::Clipboard => DeliveryTarget::Clipboard,
        DeliveryChoice::Stdout => DeliveryTarget::Stdout,
        DeliveryChoice::File(path) => DeliveryTarget::File(path.clone()),
        DeliveryChoice::FileReference if platform.supports_file_reference() => DeliveryTarget::FileReference,
        DeliveryChoice::FileReference => DeliveryTarget::Clipboard,
    }
}

/// Runs one `copy` invocation (spec §2, §6) and returns the engine's
/// full result for `presentation` to report.
pub async fn run_copy(
    command: RunCopyCommand,
    platform: &dyn Platform,
    cancellation: CancellationSignal,
) -> CopyTreeResult<PipelineRunResult> {
    let user_config_dir = platform.config_dir().map_err(|err| CopyTreeError::Configuration { message: err.to_string() })?;
    let settings = Settings::load(&user_config_dir, &command.base_path, command.explicit_config.as_deref())
        .map_err(|err| CopyTreeError::Configuration { message: err.to_string() })?;

    let profile = resolve_profile(&command, &user_config_dir)?;
    let git_ref_label = command.changed.clone();

    let cache = build_cache(&settings).await?;
    let llm_provider = build_llm_provider(&settings)?;
    let registry = build_transformer_registry(Arc::clone(&llm_provider))?;

    let max_concurrency = command
        .max_concurrency
        .or(settings.max_concurrency)
        .unwrap_or_else(|| platform.available_parallelism());

    let context = RunContext {
        run_id: Uuid::new_v4(),
        base_path: command.base_path.clone(),
        continue_on_error: true,
        dry_run: command.dry_run,
        max_concurrency,
        cache,
        llm_provider,
        cancellation,
    };

    let mut base_path_excludes = settings.global_excludes.clone();
    base_path_excludes.extend(profile.always_exclude.iter().cloned());

    let stages: Vec<Arc<dyn Stage>> = vec![
        Arc::new(FileDiscoveryStage::new(base_path_excludes, command.depth, profile.always_include.clone())),
        Arc::new(ExternalSourceStage::new(command.externals.clone())),
        Arc::new(GitFilterStage::new(resolve_git_mode(&command))),
        Arc::new(ProfileFilterStage::new(profile.clone())),
        Arc::new(RulesetFilterStage::new(profile.clone())),
        Arc::new(OptionalLlmFilterStage::new(command.ai_filter.clone())),
        Arc::new(DedupStage),
        Arc::new(SortStage::new(command.order_by_modified)),
        Arc::new(LimitStage::new(settings.max_files, settings.max_total_size_bytes)),
        Arc::new(FileLoadStage::new(settings.binary_policies.clone()).with_max_file_size(Some(settings.max_file_size_bytes))),
        Arc::new(TransformStage::new(registry, profile.transformers.clone())),
        Arc::new(CharLimitStage::new(command.char_limit)),
    ];

    let mode = if command.parallel { ExecutionMode::Parallel } else { ExecutionMode::Sequential };
    let runner = PipelineRunner::new(stages, mode, context.continue_on_error);

    let output_stage = OutputFormattingStage::new(command.format);
    let formatter_context = FormatterContext {
        base_path: &command.base_path,
        profile_name: &profile.name,
        instructions: None,
        git_ref: git_ref_label.as_deref(),
        add_line_numbers: command.add_line_numbers,
        only_tree: command.only_tree,
        generated_at: chrono::Utc::now(),
    };

    let allow_deny = AllowDenyLists {
        allowlist: settings.secret_scan_allowlist.clone(),
        denylist: settings.secret_scan_denylist.clone(),
    };
    let scanner = SecretScanner::new(allow_deny).map_err(|message| CopyTreeError::Configuration { message })?;
    let outputs_dir = settings.outputs_dir.clone().unwrap_or_else(|| user_config_dir.join("outputs"));
    let deliver_stage = DeliverStage::new(scanner, platform, &outputs_dir, command.allow_secrets);

    let target = resolve_delivery_target(&command.delivery, platform);

    run_pipeline(&runner, &context, &output_stage, &formatter_context, &deliver_stage, target).await
}
