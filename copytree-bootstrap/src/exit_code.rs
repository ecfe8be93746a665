// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Exit Code Management
//!
//! Restates spec §6's exit code table as a typed enum, following the
//! teacher's `ExitCode`/`map_error_to_exit_code` pattern.

use copytree_domain::CopyTreeError;
use std::fmt;

/// Process exit codes (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum ExitCode {
    #[default]
    Success = 0,
    UnhandledError = 1,
    UserInputError = 2,
    ValidationError = 3,
    Cancelled = 4,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::UnhandledError => "unhandled error",
            Self::UserInputError => "user-input error (bad flags or path)",
            Self::ValidationError => "validation error (e.g. secrets detected without override)",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code.as_i32()
    }
}

/// Maps a domain error to its process exit code (spec §6, §7).
pub fn map_error_to_exit_code(error: &CopyTreeError) -> ExitCode {
    match error {
        CopyTreeError::Cancellation => ExitCode::Cancelled,
        CopyTreeError::SecretsDetected { .. } | CopyTreeError::Validation { .. } | CopyTreeError::PlanValidation { .. } => ExitCode::ValidationError,
        CopyTreeError::Configuration { .. } | CopyTreeError::Path { .. } | CopyTreeError::IgnorePattern { .. } | CopyTreeError::Rule { .. } => {
            ExitCode::UserInputError
        }
        _ => ExitCode::UnhandledError,
    }
}

/// `anyhow` errors at the outermost edge (CLI handlers, `main`) fall back
/// to `UnhandledError` unless they wrap a `CopyTreeError`, mirroring the
/// teacher's outer-edge `anyhow` usage (SPEC_FULL.md, "Error handling").
pub fn result_to_exit_code<T>(result: &anyhow::Result<T>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::Success,
        Err(err) => match err.downcast_ref::<CopyTreeError>() {
            Some(domain_err) => map_error_to_exit_code(domain_err),
            None => ExitCode::UnhandledError,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_values_match_spec_table() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::UnhandledError.as_i32(), 1);
        assert_eq!(ExitCode::UserInputError.as_i32(), 2);
        assert_eq!(ExitCode::ValidationError.as_i32(), 3);
        assert_eq!(ExitCode::Cancelled.as_i32(), 4);
    }

    #[test]
    fn secrets_detected_maps_to_validation_error() {
        let err = CopyTreeError::SecretsDetected { count: 2 };
        assert_eq!(map_error_to_exit_code(&err), ExitCode::ValidationError);
    }

    #[test]
    fn configuration_error_maps_to_user_input_error() {
        let err = CopyTreeError::Configuration { message: "bad profile".into() };
        assert_eq!(map_error_to_exit_code(&err), ExitCode::UserInputError);
    }

    #[test]
    fn cancellation_maps_to_cancelled() {
        assert_eq!(map_error_to_exit_code(&CopyTreeError::Cancellation), ExitCode::Cancelled);
    }
}
