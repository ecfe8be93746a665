// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # CLI Parser
//!
//! Defines the CLI structure (spec §6) and handles raw argument parsing
//! with `clap`. Security validation happens in `validator` after parsing,
//! grounded on `adaptive_pipeline_bootstrap::cli::parser`'s split between
//! structure and validation.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "copytree")]
#[command(about = concat!("Package a filtered, transformed view of a source tree for LLM prompts (v", env!("CARGO_PKG_VERSION"), ")"))]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Attach stack traces and the failing file to error output (spec
    /// §7).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project config file path, overriding the walked-upward
    /// `.copytree.toml` discovery (spec §6 precedence).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON instead of the compact human formatter.
    #[arg(long, global = true)]
    pub format_logs: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Package a directory into a single document (spec §6's default
    /// flag table).
    Copy {
        /// Base path to package. Defaults to the current directory.
        #[arg(default_value = ".")]
        path: PathBuf,

        #[arg(long)]
        profile: Option<String>,

        #[arg(long = "filter")]
        filters: Vec<String>,

        #[arg(long = "exclude")]
        excludes: Vec<String>,

        #[arg(long)]
        depth: Option<usize>,

        #[arg(long)]
        modified: bool,

        #[arg(long)]
        changed: Option<String>,

        #[arg(long = "external")]
        externals: Vec<String>,

        #[arg(long = "ai-filter")]
        ai_filter: Option<String>,

        #[arg(long, default_value = "path")]
        order_by: String,

        #[arg(long, default_value = "xml")]
        format: String,

        #[arg(long)]
        output: Option<PathBuf>,

        #[arg(long)]
        display: bool,

        #[arg(long = "as-reference")]
        as_reference: bool,

        #[arg(long)]
        only_tree: bool,

        #[arg(long)]
        char_limit: Option<usize>,

        #[arg(long)]
        add_line_numbers: bool,

        #[arg(long)]
        info: bool,

        #[arg(long)]
        dry_run: bool,

        /// Acknowledges a high-severity secret finding, lowering the
        /// `SecretsDetected` failure to a warning (spec §4.15, §7).
        #[arg(long)]
        allow_secrets: bool,

        /// Opts into the parallel-mode driver (spec §4.6).
        #[arg(long)]
        parallel: bool,

        #[arg(long)]
        max_concurrency: Option<usize>,
    },

    /// Persist or continue an interactive conversation context (spec §6,
    /// `--state`). A thin external collaborator per spec §1's
    /// non-goals ("no long-lived server mode") — this only loads/saves a
    /// keyed JSON blob, it does not implement an interactive loop.
    Ask {
        #[arg(long)]
        state: String,

        /// The question or instruction for this turn.
        prompt: String,
    },
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_copy_invocation() {
        let cli = Cli::parse_from(["copytree", "copy", "."]);
        match cli.command {
            Commands::Copy { path, format, .. } => {
                assert_eq!(path, PathBuf::from("."));
                assert_eq!(format, "xml");
            }
            _ => panic!("expected Copy subcommand"),
        }
    }

    #[test]
    fn parses_repeated_filter_and_exclude_flags() {
        let cli = Cli::parse_from(["copytree", "copy", ".", "--filter", "**/*.rs", "--exclude", "target/**", "--exclude", "*.lock"]);
        match cli.command {
            Commands::Copy { filters, excludes, .. } => {
                assert_eq!(filters, vec!["**/*.rs".to_string()]);
                assert_eq!(excludes, vec!["target/**".to_string(), "*.lock".to_string()]);
            }
            _ => panic!("expected Copy subcommand"),
        }
    }

    #[test]
    fn parses_ask_subcommand() {
        let cli = Cli::parse_from(["copytree", "ask", "--state", "session-1", "what changed?"]);
        match cli.command {
            Commands::Ask { state, prompt } => {
                assert_eq!(state, "session-1");
                assert_eq!(prompt, "what changed?");
            }
            _ => panic!("expected Ask subcommand"),
        }
    }
}
