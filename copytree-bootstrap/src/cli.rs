// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # CLI Module
//!
//! Ties `parser` (raw `clap` structure) and `validator` (range/pattern
//! checks) into the `ValidatedCli` that `copytree`'s `main.rs` consumes.
//! Mirrors `adaptive_pipeline_bootstrap::cli`'s split across the same two
//! submodules.

mod parser;
mod validator;

pub use parser::{parse_cli, Cli, Commands};
pub use validator::{validate_base_path, validate_char_limit, validate_concurrency, validate_depth, validate_glob, validate_order_by, validate_output_format, ParseError};

use copytree_domain::value_objects::OutputFormatKind;
use std::path::PathBuf;

/// A `Copy` invocation after every flag has been range-checked and every
/// pattern pre-compiled — safe for `copytree`'s application layer to
/// consume without re-validating.
#[derive(Debug, Clone)]
pub struct ValidatedCopyArgs {
    pub base_path: PathBuf,
    pub profile: Option<String>,
    pub filters: Vec<String>,
    pub excludes: Vec<String>,
    pub depth: Option<usize>,
    pub modified: bool,
    pub changed: Option<String>,
    pub externals: Vec<String>,
    pub ai_filter: Option<String>,
    pub order_by_modified: bool,
    pub format: OutputFormatKind,
    pub output: Option<PathBuf>,
    pub display: bool,
    pub as_reference: bool,
    pub only_tree: bool,
    pub char_limit: Option<usize>,
    pub add_line_numbers: bool,
    pub info: bool,
    pub dry_run: bool,
    pub allow_secrets: bool,
    pub parallel: bool,
    pub max_concurrency: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ValidatedAskArgs {
    pub state: String,
    pub prompt: String,
}

#[derive(Debug, Clone)]
pub enum ValidatedCommand {
    Copy(ValidatedCopyArgs),
    Ask(ValidatedAskArgs),
}

/// Global flags that apply regardless of subcommand, carried alongside
/// the validated command.
#[derive(Debug, Clone)]
pub struct ValidatedCli {
    pub command: ValidatedCommand,
    pub verbose: bool,
    pub config: Option<PathBuf>,
    pub format_logs: Option<String>,
}

/// Parses argv and runs every flag through `validator`, producing a
/// `ValidatedCli` or the first `ParseError` encountered.
pub fn parse_and_validate() -> Result<ValidatedCli, ParseError> {
    let cli = parse_cli();
    validate(cli)
}

fn validate(cli: Cli) -> Result<ValidatedCli, ParseError> {
    let command = match cli.command {
        Commands::Copy {
            path,
            profile,
            filters,
            excludes,
            depth,
            modified,
            changed,
            externals,
            ai_filter,
            order_by,
            format,
            output,
            display,
            as_reference,
            only_tree,
            char_limit,
            add_line_numbers,
            info,
            dry_run,
            allow_secrets,
            parallel,
            max_concurrency,
        } => {
            let base_path = validate_base_path(&path)?;
            let depth = validate_depth(depth)?;
            let char_limit = validate_char_limit(char_limit)?;
            let max_concurrency = validate_concurrency(max_concurrency)?;
            validate_order_by(&order_by)?;
            let format = validate_output_format(&format)?;
            for pattern in filters.iter().chain(excludes.iter()) {
                validate_glob(pattern)?;
            }

            ValidatedCommand::Copy(ValidatedCopyArgs {
                base_path,
                profile,
                filters,
                excludes,
                depth,
                modified,
                changed,
                externals,
                ai_filter,
                order_by_modified: order_by == "modified",
                format,
                output,
                display,
                as_reference,
                only_tree,
                char_limit,
                add_line_numbers,
                info,
                dry_run,
                allow_secrets,
                parallel,
                max_concurrency,
            })
        }
        Commands::Ask { state, prompt } => ValidatedCommand::Ask(ValidatedAskArgs { state, prompt }),
    };

    Ok(ValidatedCli {
        command,
        verbose: cli.verbose,
        config: cli.config,
        format_logs: cli.format_logs,
    })
}
