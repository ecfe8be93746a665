// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # NDJSON Formatter
//!
//! Spec §4.16: one JSON object per line — a `metadata` record, one
//! `file` record per file, and a final `summary` record.

use super::{add_line_numbers, FormatterContext, OutputFormatter};
use base64::Engine;
use copytree_domain::entities::FileEntry;
use copytree_domain::error::{CopyTreeError, CopyTreeResult};
use serde_json::json;

pub struct NdjsonFormatter;

impl OutputFormatter for NdjsonFormatter {
    fn render(&self, files: &[FileEntry], context: &FormatterContext) -> CopyTreeResult<String> {
        let visible: Vec<&FileEntry> = files.iter().filter(|f| !f.is_null_placeholder()).collect();
        let total_size: u64 = visible.iter().map(|f| f.size()).sum();

        let mut lines = Vec::with_capacity(visible.len() + 2);

        let metadata = json!({
            "record": "metadata",
            "generated": context.generated_at.to_rfc3339(),
            "basePath": context.base_path.display().to_string(),
            "profile": context.profile_name,
            "fileCount": visible.len(),
            "totalSize": total_size,
            "gitRef": context.git_ref,
        });
        lines.push(serde_json::to_string(&metadata).map_err(json_err)?);

        if !context.only_tree {
            for file in &visible {
                let body = render_body(file, context);
                let record = json!({
                    "record": "file",
                    "path": file.relative_path().as_str(),
                    "size": file.size(),
                    "modified": file.modified_at().to_rfc3339(),
                    "binary": file.is_binary(),
                    "binaryCategory": file.binary_category().map(|c| c.to_string()),
                    "encoding": file.encoding().to_string(),
                    "gitStatus": file.git_status().map(|s| s.to_string()),
                    "truncated": file.truncated(),
                    "originalLength": file.original_length(),
                    "content": body,
                });
                lines.push(serde_json::to_string(&record).map_err(json_err)?);
            }
        }

        let summary = json!({
            "record": "summary",
            "fileCount": visible.len(),
            "totalSize": total_size,
        });
        lines.push(serde_json::to_string(&summary).map_err(json_err)?);

        Ok(lines.join("\n") + "\n")
    }
}

fn render_body(file: &FileEntry, context: &FormatterContext) -> Option<String> {
    let content = file.content()?;
    Some(match file.encoding() {
        copytree_domain::value_objects::EncodingTag::Base64 => base64::engine::general_purpose::STANDARD.encode(content),
        _ if context.add_line_numbers && !file.line_numbers_skipped() => add_line_numbers(content),
        _ => content.to_string(),
    })
}

fn json_err(err: serde_json::Error) -> CopyTreeError {
    CopyTreeError::Configuration { message: format!("NDJSON serialization failed: {err}") }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use copytree_domain::value_objects::RelativePath;

    #[test]
    fn empty_working_set_still_emits_metadata_and_summary() {
        let formatter = NdjsonFormatter;
        let context = FormatterContext {
            base_path: std::path::Path::new("/tmp"),
            profile_name: "default",
            instructions: None,
            git_ref: None,
            add_line_numbers: false,
            only_tree: false,
            generated_at: Utc::now(),
        };
        let rendered = formatter.render(&[], &context).unwrap();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"record\":\"metadata\""));
        assert!(lines[1].contains("\"record\":\"summary\""));
    }

    #[test]
    fn each_line_is_independently_valid_json() {
        let entry = FileEntry::discovered(RelativePath::new("a.txt"), "/tmp/a.txt".into(), 3, Utc::now());
        let formatter = NdjsonFormatter;
        let context = FormatterContext {
            base_path: std::path::Path::new("/tmp"),
            profile_name: "default",
            instructions: None,
            git_ref: None,
            add_line_numbers: false,
            only_tree: false,
            generated_at: Utc::now(),
        };
        let rendered = formatter.render(&[entry], &context).unwrap();
        for line in rendered.lines() {
            serde_json::from_str::<serde_json::Value>(line).expect("each NDJSON line must parse independently");
        }
    }
}
