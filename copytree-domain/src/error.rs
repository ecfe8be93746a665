// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Error Types
//!
//! `CopyTreeError` is the single error type threaded through the domain and
//! application layers. It mirrors the error taxonomy of the pipeline
//! specification one-to-one so that a stage's failure can be matched on its
//! kind without string comparison, and so that the bootstrap layer can map
//! every variant to a process exit code deterministically.
//!
//! Infrastructure adapters (file I/O, HTTP, SQL) convert their own error
//! types into one of these variants at the boundary; nothing outside
//! `infrastructure` should construct a raw `std::io::Error` or propagate one
//! past a stage.

use std::path::PathBuf;

/// The unified error type for the CopyTree pipeline engine.
///
/// Variants are grouped by the stage or component that raises them. See the
/// module-level docs for the conversion contract at infrastructure
/// boundaries.
#[derive(Debug, thiserror::Error)]
pub enum CopyTreeError {
    /// Bad profile document, unknown CLI option, or an invalid regex
    /// supplied by the user.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// The base path is not a directory, or a file could not be read.
    #[error("path error at {path}: {message}")]
    Path { path: PathBuf, message: String },

    /// A `.gitignore`/`.ctreeignore` pattern could not be compiled.
    #[error("malformed ignore pattern {pattern:?}: {message}")]
    IgnorePattern { pattern: String, message: String },

    /// A rule set referenced an unknown field, operator, or mismatched
    /// value shape.
    #[error("rule error: {message}")]
    Rule { message: String },

    /// A content-bearing rule field (`contents`, `contents_slice`,
    /// `mimeType`) was evaluated against a file that could not be read.
    #[error("could not read field {field} for {path}: {message}")]
    FieldRead {
        field: String,
        path: PathBuf,
        message: String,
    },

    /// The registry has no transformer (extension, mime, or default) for a
    /// file.
    #[error("no transformer found for {path}")]
    TransformNotFound { path: PathBuf },

    /// A transformer invocation itself failed.
    #[error("transform {transformer} failed on {path}: {message}")]
    Transform {
        transformer: String,
        path: PathBuf,
        message: String,
    },

    /// A transformer invocation exceeded its per-call timeout.
    #[error("transform {transformer} timed out on {path}")]
    TransformTimeout { transformer: String, path: PathBuf },

    /// `validate_dependencies` found a cycle among registered transformers.
    #[error("circular dependency among transformers: {cycle}")]
    CircularDependency { cycle: String },

    /// A transformer declared a dependency on another transformer name
    /// that is not registered.
    #[error("transformer {transformer} depends on unregistered transformer {dependency}")]
    MissingDependency {
        transformer: String,
        dependency: String,
    },

    /// `validate_plan` rejected a proposed execution order.
    #[error("plan validation failed: {message}")]
    PlanValidation { message: String },

    /// A cache read or write failed. Logged, never fatal — the cache is
    /// bypassed on read error, and a write error does not fail the
    /// transform that produced the value.
    #[error("cache I/O error: {message}")]
    CacheIo { message: String },

    /// The LLM-assisted file filter returned output that could not be
    /// parsed into a set of kept paths.
    #[error("LLM filter error: {message}")]
    LlmFilter { message: String },

    /// The configured LLM provider itself failed (network, auth, quota).
    #[error("LLM provider error: {message}")]
    LlmProvider { message: String },

    /// The secret scanner found a high-severity finding and the run was
    /// not explicitly overridden.
    #[error("{count} secret(s) detected; pass the override flag to proceed")]
    SecretsDetected { count: usize },

    /// Git filtering was explicitly requested (`--modified`/`--changed`)
    /// and the underlying git invocation failed. When git filtering was
    /// not requested, the same underlying condition is logged as a
    /// warning instead of raised as this error.
    #[error("git error: {message}")]
    Git { message: String },

    /// A stage's `validate` hook rejected its input.
    #[error("validation error in stage {stage}: {message}")]
    Validation { stage: String, message: String },

    /// The run was cancelled via the shared cancellation signal.
    #[error("operation cancelled")]
    Cancellation,
}

impl CopyTreeError {
    /// Short, stable kind name used in single-line failure reporting
    /// (spec §7: "a single failure line is printed with the stage name and
    /// error kind").
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "ConfigurationError",
            Self::Path { .. } => "PathError",
            Self::IgnorePattern { .. } => "IgnorePatternError",
            Self::Rule { .. } => "RuleError",
            Self::FieldRead { .. } => "FieldReadError",
            Self::TransformNotFound { .. } => "TransformNotFound",
            Self::Transform { .. } => "TransformError",
            Self::TransformTimeout { .. } => "TransformTimeout",
            Self::CircularDependency { .. } => "CircularDependency",
            Self::MissingDependency { .. } => "MissingDependency",
            Self::PlanValidation { .. } => "PlanValidationError",
            Self::CacheIo { .. } => "CacheIOError",
            Self::LlmFilter { .. } => "LLMFilterError",
            Self::LlmProvider { .. } => "LLMProviderError",
            Self::SecretsDetected { .. } => "SecretsDetected",
            Self::Git { .. } => "GitError",
            Self::Validation { .. } => "ValidationError",
            Self::Cancellation => "CancellationError",
        }
    }

    /// Whether this error kind is safe to recover from under
    /// `continueOnError` without losing correctness guarantees. Secret
    /// detection and cancellation are never downgraded.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::SecretsDetected { .. } | Self::Cancellation)
    }
}

/// Convenience alias used throughout the domain and application layers.
pub type CopyTreeResult<T> = Result<T, CopyTreeError>;
