// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # SARIF v2.1.0 Formatter
//!
//! Spec §4.16: one run with one rule (`file-discovered`); each file
//! becomes a `result` with `level=note`, a relative forward-slash
//! `artifactLocation` URI, and an optional `region` covering the full
//! line range. Pretty-printed by default.

use super::{FormatterContext, OutputFormatter};
use copytree_domain::entities::FileEntry;
use copytree_domain::error::{CopyTreeError, CopyTreeResult};
use serde_json::json;

pub struct SarifFormatter;

impl OutputFormatter for SarifFormatter {
    fn render(&self, files: &[FileEntry], context: &FormatterContext) -> CopyTreeResult<String> {
        let visible: Vec<&FileEntry> = files.iter().filter(|f| !f.is_null_placeholder()).collect();

        let working_directory_uri = format!("file://{}", context.base_path.display());

        let results: Vec<serde_json::Value> = if context.only_tree {
            Vec::new()
        } else {
            visible
                .iter()
                .map(|file| {
                    let mut properties = json!({
                        "size": file.size(),
                        "modified": file.modified_at().to_rfc3339(),
                        "binary": file.is_binary(),
                        "truncated": file.truncated(),
                    });
                    if let Some(status) = file.git_status() {
                        properties["gitStatus"] = json!(status.to_string());
                    }

                    let mut result = json!({
                        "ruleId": "file-discovered",
                        "level": "note",
                        "message": { "text": format!("discovered {}", file.relative_path()) },
                        "locations": [{
                            "physicalLocation": {
                                "artifactLocation": { "uri": file.relative_path().as_str() },
                            }
                        }],
                        "properties": properties,
                    });

                    if let Some(line_count) = file.line_count() {
                        if line_count > 0 {
                            result["locations"][0]["physicalLocation"]["region"] = json!({
                                "startLine": 1,
                                "endLine": line_count,
                            });
                        }
                    }

                    result
                })
                .collect()
        };

        let document = json!({
            "$schema": "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json",
            "version": "2.1.0",
            "runs": [{
                "tool": {
                    "driver": {
                        "name": "copytree",
                        "informationUri": "https://github.com/copytree/copytree",
                        "rules": [{
                            "id": "file-discovered",
                            "shortDescription": { "text": "A file was discovered and included in this run." },
                        }],
                    }
                },
                "originalUriBaseIds": {
                    "WORKINGDIR": { "uri": working_directory_uri },
                },
                "results": results,
            }]
        });

        serde_json::to_string_pretty(&document).map_err(|err| CopyTreeError::Configuration {
            message: format!("SARIF serialization failed: {err}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use copytree_domain::value_objects::RelativePath;

    #[test]
    fn renders_one_rule_and_one_result_per_file() {
        let entry = FileEntry::discovered(RelativePath::new("a.txt"), "/tmp/a.txt".into(), 3, Utc::now());
        let formatter = SarifFormatter;
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
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["version"], "2.1.0");
        assert_eq!(parsed["runs"][0]["results"].as_array().unwrap().len(), 1);
        assert_eq!(parsed["runs"][0]["results"][0]["locations"][0]["physicalLocation"]["artifactLocation"]["uri"], "a.txt");
    }
}
