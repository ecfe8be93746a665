// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Output Format Kind Value Object

use std::fmt;
use std::str::FromStr;

/// Selects one of the four output formatter contracts in spec §4.16.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum OutputFormatKind {
    #[default]
    Xml,
    Markdown,
    Ndjson,
    Sarif,
}

impl fmt::Display for OutputFormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Xml => "xml",
            Self::Markdown => "markdown",
            Self::Ndjson => "ndjson",
            Self::Sarif => "sarif",
        };
        f.write_str(s)
    }
}

impl FromStr for OutputFormatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xml" => Ok(Self::Xml),
            "markdown" | "md" => Ok(Self::Markdown),
            "ndjson" | "jsonl" => Ok(Self::Ndjson),
            "sarif" => Ok(Self::Sarif),
            other => Err(format!("unknown output format {other:?}")),
        }
    }
}
