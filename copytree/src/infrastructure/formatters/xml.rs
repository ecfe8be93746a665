// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # XML Formatter
//!
//! Spec §4.16: a namespaced `<directory>` document with a `<metadata>`
//! block, an optional `<instructions>` block, then one element per file.

use super::{add_line_numbers, render_tree, to_rfc3339, FormatterContext, OutputFormatter};
use base64::Engine;
use copytree_domain::entities::FileEntry;
use copytree_domain::error::CopyTreeResult;

pub struct XmlFormatter;

fn escape_xml_text(text: &str) -> String {
    // Strips control characters that would produce malformed XML (spec
    // §4.16: "control characters stripped") and escapes the five
    // predefined entities plus `]]>` so CDATA-adjacent content never
    // prematurely terminates a section.
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\n' | '\t' | '\r' => out.push(c),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

fn escape_xml_attr(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('"', "&quot;")
}

impl OutputFormatter for XmlFormatter {
    fn render(&self, files: &[FileEntry], context: &FormatterContext) -> CopyTreeResult<String> {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str(&format!("<directory path=\"{}\">\n", escape_xml_attr(&context.base_path.display().to_string())));

        let total_size: u64 = files.iter().filter(|f| !f.is_null_placeholder()).map(|f| f.size()).sum();
        let visible_count = files.iter().filter(|f| !f.is_null_placeholder()).count();
        let paths: Vec<&str> = files.iter().filter(|f| !f.is_null_placeholder()).map(|f| f.relative_path().as_str()).collect();

        out.push_str("  <metadata>\n");
        out.push_str(&format!("    <generated>{}</generated>\n", to_rfc3339(context.generated_at)));
        out.push_str(&format!("    <fileCount>{visible_count}</fileCount>\n"));
        out.push_str(&format!("    <totalSize>{total_size}</totalSize>\n"));
        out.push_str(&format!("    <profile>{}</profile>\n", escape_xml_text(context.profile_name)));
        if let Some(git_ref) = context.git_ref {
            out.push_str(&format!("    <git ref=\"{}\"/>\n", escape_xml_attr(git_ref)));
        }
        out.push_str("    <tree><![CDATA[\n");
        out.push_str(&render_tree(&context.base_path.display().to_string(), &paths));
        out.push_str("    ]]></tree>\n");
        out.push_str("  </metadata>\n");

        if let Some(instructions) = context.instructions {
            out.push_str("  <instructions><![CDATA[\n");
            out.push_str(instructions);
            out.push_str("\n  ]]></instructions>\n");
        }

        if !context.only_tree {
            for file in files {
                if file.is_null_placeholder() {
                    continue;
                }
                out.push_str(&format!(
                    "  <file path=\"{}\" size=\"{}\" modified=\"{}\" binary=\"{}\" encoding=\"{}\"",
                    escape_xml_attr(file.relative_path().as_str()),
                    file.size(),
                    to_rfc3339(file.modified_at()),
                    file.is_binary(),
                    file.encoding(),
                ));
                if let Some(category) = file.binary_category() {
                    out.push_str(&format!(" binaryCategory=\"{category}\""));
                }
                if let Some(status) = file.git_status() {
                    out.push_str(&format!(" gitStatus=\"{status}\""));
                }
                out.push_str(">\n");

                let rendered = render_body(file, context);
                out.push_str("<![CDATA[\n");
                out.push_str(&rendered);
                out.push_str("\n]]>\n");
                out.push_str("  </file>\n");
            }
        }

        out.push_str("</directory>\n");
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
    fn renders_a_minimal_document() {
        let mut entry = FileEntry::discovered(RelativePath::new("a.txt"), "/tmp/a.txt".into(), 3, Utc::now());
        entry.set_content("abc".to_string(), EncodingTag::Utf8, ContentHash::of_bytes(b"abc"));
        let formatter = XmlFormatter;
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
        assert!(rendered.starts_with("<?xml"));
        assert!(rendered.contains("<directory"));
        assert!(rendered.contains("path=\"a.txt\""));
        assert!(rendered.contains("abc"));
    }

    #[test]
    fn only_tree_omits_file_bodies() {
        let entry = FileEntry::discovered(RelativePath::new("a.txt"), "/tmp/a.txt".into(), 3, Utc::now());
        let formatter = XmlFormatter;
        let context = FormatterContext {
            base_path: std::path::Path::new("/tmp"),
            profile_name: "default",
            instructions: None,
            git_ref: None,
            add_line_numbers: false,
            only_tree: true,
            generated_at: Utc::now(),
        };
        let rendered = formatter.render(&[entry], &context).unwrap();
        assert!(!rendered.contains("<file "));
    }
}
