// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # copytree CLI entry point
//!
//! Parses and validates argv, installs logging, wires Ctrl-C/SIGTERM
//! into the run's `CancellationSignal`, dispatches to the `run_copy` or
//! `ask` use case, prints the result, and exits with the spec's exit
//! code table (spec §6). Grounded on the teacher's `main.rs` dispatch
//! shape (`match cli.command { ... }` over async command handlers)
//! simplified to two subcommands and a single owned `anyhow::Result`
//! return per branch rather than per-branch `.unwrap()`.

use anyhow::Context;
use copytree::application::commands::{AskCommand, DeliveryChoice, RunCopyCommand};
use copytree::application::use_cases::{ask, run_copy};
use copytree::presentation;
use copytree_bootstrap::{create_platform, create_signal_handler, init_tracing, result_to_exit_code, LogFormat, ShutdownCoordinator};
use copytree_bootstrap::{ValidatedCommand, ValidatedCopyArgs};

#[tokio::main]
async fn main() {
    let cli = match copytree_bootstrap::parse_and_validate() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("copytree: {err}");
            std::process::exit(2);
        }
    };

    if cli.verbose && std::env::var("COPYTREE_LOG").is_err() {
        std::env::set_var("COPYTREE_LOG", "debug");
    }
    let log_format = match cli.format_logs.as_deref() {
        Some("json") => LogFormat::Json,
        _ => LogFormat::Human,
    };
    init_tracing(log_format);

    let platform = create_platform();
    let shutdown = ShutdownCoordinator::default();
    let signal_handler = create_signal_handler();

    let shutdown_for_signal = shutdown.clone();
    let signal_task = tokio::spawn(async move {
        signal_handler
            .wait_for_signal(Box::new(move || shutdown_for_signal.initiate_shutdown()))
            .await;
    });

    let explicit_config = cli.config.clone();
    let result: anyhow::Result<()> = match cli.command {
        ValidatedCommand::Copy(args) => run_copy_command(args, explicit_config, platform.as_ref(), &shutdown).await,
        ValidatedCommand::Ask(args) => {
            let command = AskCommand::new(args.state, args.prompt).with_explicit_config(cli.config.clone());
            ask(command, platform.as_ref()).await.map(|reply| presentation::print_ask_reply(&reply)).context("ask failed")
        }
    };

    if let Err(err) = &result {
        tracing::error!("{err:#}");
        eprintln!("copytree: {err}");
    }

    shutdown.complete_shutdown();
    signal_task.abort();

    std::process::exit(result_to_exit_code(&result).as_i32());
}

async fn run_copy_command(
    args: ValidatedCopyArgs,
    explicit_config: Option<std::path::PathBuf>,
    platform: &dyn copytree_bootstrap::Platform,
    shutdown: &ShutdownCoordinator,
) -> anyhow::Result<()> {
    let delivery = resolve_delivery_choice(&args);

    let command = RunCopyCommand::new(args.base_path)
        .with_profile(args.profile)
        .with_filters(args.filters)
        .with_excludes(args.excludes)
        .with_depth(args.depth)
        .with_git_mode(args.modified, args.changed)
        .with_externals(args.externals)
        .with_ai_filter(args.ai_filter)
        .with_order_by_modified(args.order_by_modified)
        .with_format(args.format)
        .with_delivery(delivery)
        .with_only_tree(args.only_tree)
        .with_char_limit(args.char_limit)
        .with_add_line_numbers(args.add_line_numbers)
        .with_dry_run(args.dry_run)
        .with_allow_secrets(args.allow_secrets)
        .with_parallel(args.parallel)
        .with_max_concurrency(args.max_concurrency)
        .with_explicit_config(explicit_config);

    let result = run_copy(command, platform, shutdown.cancellation_signal()).await.context("copy failed")?;

    if args.info {
        presentation::print_summary(&result);
    } else {
        presentation::print_delivery(result.delivery.as_ref());
    }

    Ok(())
}

/// Resolves delivery precedence: an explicit `--output` file wins, then
/// `--as-reference`, then `--display`/stdout, defaulting to the
/// clipboard (spec §4.17).
fn resolve_delivery_choice(args: &ValidatedCopyArgs) -> DeliveryChoice {
    if let Some(path) = &args.output {
        DeliveryChoice::File(path.clone())
    } else if args.as_reference {
        DeliveryChoice::FileReference
    } else if args.display {
        DeliveryChoice::Stdout
    } else {
        DeliveryChoice::Clipboard
    }
}
