// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Application Commands
//!
//! `RunCopyCommand` is the application-layer request object for the
//! `Copy` use case — a flat, already-validated description of one run,
//! independent of `clap`'s `ValidatedCopyArgs` so the use case can be
//! driven directly (tests, a future non-CLI frontend) without going
//! through argument parsing at all. Builder-pattern shape grounded on
//! `adaptive_pipeline::application::commands::RestoreFileCommand`:
//! a plain `::new` with the handful of fields every run needs, plus
//! fluent `with_*` setters for everything optional.

use copytree_domain::value_objects::OutputFormatKind;
use std::path::PathBuf;

/// Where the rendered document should end up (spec §4.17). Mirrors
/// `infrastructure::delivery::DeliveryTarget` but is resolved from flags
/// alone, before a `Platform` is available to check
/// `supports_file_reference` — that check happens when the use case
/// turns this into a `DeliveryTarget`.
#[derive(Debug, Clone, Default)]
pub enum DeliveryChoice {
    #[default]
    Clipboard,
    Stdout,
    File(PathBuf),
    FileReference,
}

/// A fully-specified request to package a source tree into a single
/// document (spec §2, §6). Every field here has already been through
/// `copytree_bootstrap`'s validator; the use case does not re-validate
/// ranges or recompile patterns, only resolves the run's remaining
/// collaborators (profile, settings, cache, LLM provider).
#[derive(Debug, Clone)]
pub struct RunCopyCommand {
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
    pub delivery: DeliveryChoice,
    pub only_tree: bool,
    pub char_limit: Option<usize>,
    pub add_line_numbers: bool,
    pub dry_run: bool,
    pub allow_secrets: bool,
    pub parallel: bool,
    pub max_concurrency: Option<usize>,
    pub explicit_config: Option<PathBuf>,
}

impl RunCopyCommand {
    /// The minimal command: package `base_path` with every optional
    /// narrowing left at its default (no profile, no filters, XML to
    /// the clipboard). Every other field is set with the `with_*`
    /// builders below.
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            profile: None,
            filters: Vec::new(),
            excludes: Vec::new(),
            depth: None,
            modified: false,
            changed: None,
            externals: Vec::new(),
            ai_filter: None,
            order_by_modified: false,
            format: OutputFormatKind::Xml,
            delivery: DeliveryChoice::Clipboard,
            only_tree: false,
            char_limit: None,
            add_line_numbers: false,
            dry_run: false,
            allow_secrets: false,
            parallel: false,
            max_concurrency: None,
            explicit_config: None,
        }
    }

    pub fn with_profile(mut self, profile: Option<String>) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_filters(mut self, filters: Vec<String>) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_excludes(mut self, excludes: Vec<String>) -> Self {
        self.excludes = excludes;
        self
    }

    pub fn with_depth(mut self, depth: Option<usize>) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_git_mode(mut self, modified: bool, changed: Option<String>) -> Self {
        self.modified = modified;
        self.changed = changed;
        self
    }

    pub fn with_externals(mut self, externals: Vec<String>) -> Self {
        self.externals = externals;
        self
    }

    pub fn with_ai_filter(mut self, ai_filter: Option<String>) -> Self {
        self.ai_filter = ai_filter;
        self
    }

    pub fn with_order_by_modified(mut self, order_by_modified: bool) -> Self {
        self.order_by_modified = order_by_modified;
        self
    }

    pub fn with_format(mut self, format: OutputFormatKind) -> Self {
        self.format = format;
        self
    }

    pub fn with_delivery(mut self, delivery: DeliveryChoice) -> Self {
        self.delivery = delivery;
        self
    }

    pub fn with_only_tree(mut self, only_tree: bool) -> Self {
        self.only_tree = only_tree;
        self
    }

    pub fn with_char_limit(mut self, char_limit: Option<usize>) -> Self {
        self.char_limit = char_limit;
        self
    }

    pub fn with_add_line_numbers(mut self, add_line_numbers: bool) -> Self {
        self.add_line_numbers = add_line_numbers;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_allow_secrets(mut self, allow_secrets: bool) -> Self {
        self.allow_secrets = allow_secrets;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: Option<usize>) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn with_explicit_config(mut self, explicit_config: Option<PathBuf>) -> Self {
        self.explicit_config = explicit_config;
        self
    }
}

/// The `Ask` subcommand's request object: a conversation key and one
/// prompt (spec §6, §1 non-goal "no long-lived server mode" — one turn
/// per invocation).
#[derive(Debug, Clone)]
pub struct AskCommand {
    pub state_key: String,
    pub prompt: String,
    pub explicit_config: Option<PathBuf>,
}

impl AskCommand {
    pub fn new(state_key: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            state_key: state_key.into(),
            prompt: prompt.into(),
            explicit_config: None,
        }
    }

    pub fn with_explicit_config(mut self, explicit_config: Option<PathBuf>) -> Self {
        self.explicit_config = explicit_config;
        self
    }
}
