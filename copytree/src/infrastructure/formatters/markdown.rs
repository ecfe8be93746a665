// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Markdown Formatter
//!
//! Spec §4.16: a front-matter block, a tree section, an optional
//! instructions section, then one section per file with a begin-marker
//! comment, a heading, and a fenced code block whose fence avoids
//! collision with the file's own content.

use super::{add_line_numbers, language_for_extension, render_tree, to_rfc3339, FormatterContext, OutputFormatter};
use base64::Engine;
use copytree_domain::entities::FileEntry;
use copytree_domain::error::CopyTreeResult;

pub struct MarkdownFormatter;

/// Picks a fence of backticks at least one longer than the longest run of
/// backticks already present in `content`, so the fence can never
/// prematurely close (spec §4.16: "a fence is chosen to avoid collision
/// with content").
fn pick_fence(content: &str) -> String {
    let mut longest_run = 0usize;
    let mut current_run = 0usize;
    for c in content.chars() {
        if c == '`' {
            current_run += 1;
            longest_run = longest_run.max(current_run);
        } else {
            current_run = 0;
        }
    }
    "`".repeat((longest_run + 1).max(3))
}

impl OutputFormatter for MarkdownFormatter {
    fn render(&self, files: &[FileEntry], context: &FormatterContext) -> CopyTreeResult<String> {
        let mut out = String::new();
        let visible: Vec<&FileEntry> = files.iter().filter(|f| !f.is_null_placeholder()).collect();
        let total_size: u64 = visible.iter().map(|f| f.size()).sum();
        let paths: Vec<&str> = visible.iter().map(|f| f.relative_path().as_str()).collect();

        out.push_str("---\n");
        out.push_str("format: copytree-markdown\n");
        out.push_str("tool: copytree\n");
        out.push_str(&format!("generated: {}\n", to_rfc3339(context.generated_at)));
        out.push_str(&format!("basePath: {}\n", context.base_path.display()));
        out.push_str(&format!("profile: {}\n", context.profile_name));
        out.push_str(&format!("fileCount: {}\n", visible.len()));
        out.push_str(&format!("totalSize: {total_size}\n"));
        out.push_str(&format!("onlyTree: {}\n", context.only_tree));
        out.push_str(&format!("addLineNumbers: {}\n", context.add_line_numbers));
        out.push_str("---\n\n");

        out.push_str("## Directory tree\n\n```\n");
        out.push_str(&render_tree(&context.base_path.display().to_string(), &paths));
        out.push_str("```\n\n");

        if let Some(instructions) = context.instructions {
            out.push_str("## Instructions\n\n");
            out.push_str(instructions);
            out.push_str("\n\n");
        }

        if !context.only_tree {
            for file in &visible {
                let hash = file.content_hash().map(|h| h.as_hex()).unwrap_or_default();
                out.push_str(&format!(
                    "<!-- @{} size={} modified={} sha256={} binary={}",
                    file.relative_path(),
                    file.size(),
                    to_rfc3339(file.modified_at()),
                    hash,
                    file.is_binary(),
                ));
                if let Some(status) = file.git_status() {
                    out.push_str(&format!(" gitStatus={status}"));
                }
                if file.truncated() {
                    out.push_str(&format!(" truncated=true originalLength={}", file.original_length().unwrap_or_default()));
                }
                out.push_str(" -->\n");

                out.push_str(&format!("### {}\n\n", file.relative_path()));

                let rendered = render_body(file, context);
                let fence = pick_fence(&rendered);
                let lang = language_for_extension(file.relative_path().extension());
                out.push_str(&format!("{fence}{lang}\n{rendered}\n{fence}\n\n"));
            }
        }

        Ok(out)
    }
}

fn render_body(file: &FileEntry, context: &FormatterContext) -> String {
    let Some(content) = file.content() else {
        return String::new();
    };
    match file.encoding() {
        copytree_domain::value_objects::EncodingTag::Base64 => base64::engine::general_purpose::STANDARD.encode(content),
        _ if context.add_line_numbers && !file.line_numbers_skipped() => add_line_numbers(content),
        _ => content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use copytree_domain::value_objects::{ContentHash, EncodingTag, RelativePath};

    #[test]
    fn fence_avoids_collision_with_embedded_backticks() {
        assert_eq!(pick_fence("plain text"), "```");
        assert_eq!(pick_fence("has ``` inside"), "````");
    }

    #[test]
    fn renders_front_matter_and_file_section() {
        let mut entry = FileEntry::discovered(RelativePath::new("a.rs"), "/tmp/a.rs".into(), 3, Utc::now());
        entry.set_content("fn x(){}".to_string(), EncodingTag::Utf8, ContentHash::of_bytes(b"fn x(){}"));
        let formatter = MarkdownFormatter;
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
        assert!(rendered.starts_with("---\n"));
        assert!(rendered.contains("### a.rs"));
        assert!(rendered.contains("```rust"));
    }
}
