// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Transformers that shell out to an external binary (`pdftotext`,
//! `tesseract`). The dependency is informational per spec §4.3: if the
//! binary is absent at resolution time the transformer reports
//! `MissingDependency` rather than panicking, and the pipeline falls back
//! to its failure-notice policy (spec §4.13).

use crate::infrastructure::transform::registry::Transformer;
use async_trait::async_trait;
use copytree_domain::entities::FileEntry;
use copytree_domain::error::{CopyTreeError, CopyTreeResult};
use std::collections::HashMap;
use std::process::Stdio;
use tokio::process::Command;

async fn run_binary(binary: &str, args: &[&str]) -> CopyTreeResult<String> {
    let output = Command::new(binary)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|_| CopyTreeError::MissingDependency {
            transformer: binary.to_string(),
            dependency: binary.to_string(),
        })?;

    if !output.status.success() {
        return Err(CopyTreeError::Transform {
            transformer: binary.to_string(),
            path: args.last().map(Into::into).unwrap_or_default(),
            message: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

pub struct PdfToTextTransformer;

#[async_trait]
impl Transformer for PdfToTextTransformer {
    fn name(&self) -> &str {
        "pdf-to-text"
    }

    async fn transform(&self, file: &FileEntry, _options: &HashMap<String, String>) -> CopyTreeResult<String> {
        let path = file.absolute_path().to_string_lossy().into_owned();
        run_binary("pdftotext", &[&path, "-"]).await
    }
}

pub struct ImageToTextTransformer;

#[async_trait]
impl Transformer for ImageToTextTransformer {
    fn name(&self) -> &str {
        "image-to-text"
    }

    async fn transform(&self, file: &FileEntry, _options: &HashMap<String, String>) -> CopyTreeResult<String> {
        let path = file.absolute_path().to_string_lossy().into_owned();
        run_binary("tesseract", &[&path, "stdout"]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use copytree_domain::value_objects::RelativePath;

    #[tokio::test]
    async fn missing_binary_reports_missing_dependency() {
        let entry = FileEntry::discovered(RelativePath::new("a.pdf"), "/a.pdf".into(), 0, Utc::now());
        let transformer = PdfToTextTransformer;
        let err = transformer.transform(&entry, &HashMap::new()).await.unwrap_err();
        assert_eq!(err.kind(), "MissingDependency");
    }
}
