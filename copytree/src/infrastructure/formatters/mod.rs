// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Output Formatters
//!
//! The four bit-exact output contracts of spec §4.16: XML, Markdown,
//! NDJSON, and SARIF. No direct teacher counterpart — the teacher writes
//! a single binary `.adapipe` container (`infrastructure::adapters::
//! binary_format`) rather than multiple text formats, so these are
//! grounded directly in spec §4.16's explicit per-formatter contracts,
//! hand-writing string builders for XML/Markdown the way the teacher
//! hand-writes its binary format instead of reaching for a generic
//! serializer, and using `serde_json` for NDJSON/SARIF where the target
//! really is JSON.

mod markdown;
mod ndjson;
mod sarif;
mod tree;
mod xml;

pub use markdown::MarkdownFormatter;
pub use ndjson::NdjsonFormatter;
pub use sarif::SarifFormatter;
pub use xml::XmlFormatter;
pub(crate) use tree::render_tree;

use chrono::{DateTime, Utc};
use copytree_domain::entities::FileEntry;
use copytree_domain::error::CopyTreeResult;
use copytree_domain::value_objects::OutputFormatKind;
use std::path::Path;

/// Everything every formatter needs beyond the file list itself (spec
/// §4.16: "Every formatter receives the file list, base path, profile
/// name, optional instructions text, optional git metadata, and option
/// flags").
pub struct FormatterContext<'a> {
    pub base_path: &'a Path,
    pub profile_name: &'a str,
    pub instructions: Option<&'a str>,
    pub git_ref: Option<&'a str>,
    pub add_line_numbers: bool,
    pub only_tree: bool,
    pub generated_at: DateTime<Utc>,
}

pub trait OutputFormatter: Send + Sync {
    fn render(&self, files: &[FileEntry], context: &FormatterContext) -> CopyTreeResult<String>;
}

/// Resolves the formatter implementation for a selected `OutputFormatKind`.
pub fn formatter_for(kind: OutputFormatKind) -> Box<dyn OutputFormatter> {
    match kind {
        OutputFormatKind::Xml => Box::new(XmlFormatter),
        OutputFormatKind::Markdown => Box::new(MarkdownFormatter),
        OutputFormatKind::Ndjson => Box::new(NdjsonFormatter),
        OutputFormatKind::Sarif => Box::new(SarifFormatter),
    }
}

/// Applies `--add-line-numbers`, prefixing each line with its 1-based
/// index (spec §6). Per spec §9's resolved open question, this is never
/// called for a file whose binary policy resolved to `base64` — callers
/// check `FileEntry::line_numbers_skipped` first.
pub(crate) fn add_line_numbers(content: &str) -> String {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| format!("{:>4} | {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Infers a Markdown fence language tag from a file extension (used by
/// the Markdown formatter's fenced code blocks).
pub(crate) fn language_for_extension(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "rs" => "rust",
        "py" => "python",
        "js" => "javascript",
        "ts" => "typescript",
        "go" => "go",
        "java" => "java",
        "c" => "c",
        "h" | "hpp" | "cpp" | "cc" => "cpp",
        "rb" => "ruby",
        "sh" | "bash" => "bash",
        "json" => "json",
        "yaml" | "yml" => "yaml",
        "toml" => "toml",
        "md" | "markdown" => "markdown",
        "html" | "htm" => "html",
        "css" => "css",
        "xml" => "xml",
        "sql" => "sql",
        _ => "text",
    }
}

pub(crate) fn to_rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_numbers_are_one_based_and_right_aligned() {
        let numbered = add_line_numbers("a\nb\nc");
        assert_eq!(numbered, "   1 | a\n   2 | b\n   3 | c");
    }

    #[test]
    fn language_inference_falls_back_to_text() {
        assert_eq!(language_for_extension("rs"), "rust");
        assert_eq!(language_for_extension("zzz"), "text");
    }
}
