// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Delivery
//!
//! The terminal side effect of a run (spec §4.17): clipboard, stdout, a
//! file under a configured outputs directory, or a file reference on
//! platforms that support it. Clipboard falls back to a temp file when
//! the native clipboard is unavailable; the fallback counts as success.

use copytree_bootstrap::Platform;
use copytree_domain::error::{CopyTreeError, CopyTreeResult};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub enum DeliveryTarget {
    Clipboard,
    Stdout,
    File(PathBuf),
    FileReference,
}

#[derive(Debug, Clone)]
pub enum DeliveryOutcome {
    CopiedToClipboard,
    PrintedToStdout,
    WrittenToFile(PathBuf),
    ClipboardFallback(PathBuf),
    FileReference(PathBuf),
}

pub struct Deliverer<'a> {
    platform: &'a dyn Platform,
    outputs_dir: &'a Path,
}

impl<'a> Deliverer<'a> {
    pub fn new(platform: &'a dyn Platform, outputs_dir: &'a Path) -> Self {
        Self { platform, outputs_dir }
    }

    pub fn deliver(&self, target: DeliveryTarget, content: &str) -> CopyTreeResult<DeliveryOutcome> {
        match target {
            DeliveryTarget::Stdout => {
                print!("{content}");
                std::io::stdout().flush().map_err(|err| io_err("stdout", err))?;
                Ok(DeliveryOutcome::PrintedToStdout)
            }
            DeliveryTarget::File(path) => {
                write_file(&path, content)?;
                Ok(DeliveryOutcome::WrittenToFile(path))
            }
            DeliveryTarget::FileReference => {
                if !self.platform.supports_file_reference() {
                    return Err(CopyTreeError::Configuration {
                        message: "file references are not supported on this platform".to_string(),
                    });
                }
                let path = self.outputs_dir.join(format!("copytree-{}.txt", uuid::Uuid::new_v4()));
                write_file(&path, content)?;
                Ok(DeliveryOutcome::FileReference(path))
            }
            DeliveryTarget::Clipboard => self.deliver_to_clipboard(content),
        }
    }

    fn deliver_to_clipboard(&self, content: &str) -> CopyTreeResult<DeliveryOutcome> {
        match arboard::Clipboard::new() {
            Ok(mut clipboard) => match clipboard.set_text(content) {
                Ok(()) => Ok(DeliveryOutcome::CopiedToClipboard),
                Err(_) => self.clipboard_fallback(content),
            },
            Err(_) => self.clipboard_fallback(content),
        }
    }

    fn clipboard_fallback(&self, content: &str) -> CopyTreeResult<DeliveryOutcome> {
        let path = self.outputs_dir.join(format!("copytree-{}.txt", uuid::Uuid::new_v4()));
        write_file(&path, content)?;
        tracing::warn!(path = %path.display(), "clipboard unavailable; fell back to a temporary file");
        Ok(DeliveryOutcome::ClipboardFallback(path))
    }
}

fn write_file(path: &Path, content: &str) -> CopyTreeResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| io_err(parent.display().to_string(), err))?;
    }
    std::fs::write(path, content).map_err(|err| io_err(path.display().to_string(), err))
}

fn io_err(context: impl std::fmt::Display, err: std::io::Error) -> CopyTreeError {
    CopyTreeError::Path {
        path: PathBuf::from(context.to_string()),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use copytree_bootstrap::PlatformError;

    struct FakePlatform {
        file_reference_supported: bool,
    }

    impl Platform for FakePlatform {
        fn platform_name(&self) -> &'static str {
            "fake"
        }

        fn config_dir(&self) -> Result<PathBuf, PlatformError> {
            Ok(PathBuf::from("/tmp"))
        }

        fn available_parallelism(&self) -> usize {
            1
        }

        fn supports_file_reference(&self) -> bool {
            self.file_reference_supported
        }
    }

    #[test]
    fn stdout_delivery_always_succeeds() {
        let platform = FakePlatform { file_reference_supported: false };
        let outputs_dir = std::env::temp_dir();
        let deliverer = Deliverer::new(&platform, &outputs_dir);
        let outcome = deliverer.deliver(DeliveryTarget::Stdout, "hello").unwrap();
        assert!(matches!(outcome, DeliveryOutcome::PrintedToStdout));
    }

    #[test]
    fn file_delivery_writes_the_requested_path() {
        let platform = FakePlatform { file_reference_supported: false };
        let outputs_dir = std::env::temp_dir();
        let deliverer = Deliverer::new(&platform, &outputs_dir);
        let target_path = outputs_dir.join(format!("copytree-test-{}.txt", uuid::Uuid::new_v4()));
        let outcome = deliverer.deliver(DeliveryTarget::File(target_path.clone()), "content").unwrap();
        assert!(matches!(outcome, DeliveryOutcome::WrittenToFile(path) if path == target_path));
        assert_eq!(std::fs::read_to_string(&target_path).unwrap(), "content");
        let _ = std::fs::remove_file(&target_path);
    }

    #[test]
    fn file_reference_rejected_when_unsupported() {
        let platform = FakePlatform { file_reference_supported: false };
        let outputs_dir = std::env::temp_dir();
        let deliverer = Deliverer::new(&platform, &outputs_dir);
        let result = deliverer.deliver(DeliveryTarget::FileReference, "content");
        assert!(result.is_err());
    }
}
