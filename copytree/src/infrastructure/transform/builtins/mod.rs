// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Built-in transformers (SPEC_FULL.md TRANSFORMERS). All pluggable, all
//! registered by default, none part of the hard engineering core.

mod code_summary;
mod csv_preview;
mod default_loader;
mod external_binary;
mod markdown_strip;
mod pii_masking;

pub use code_summary::{CodeSummaryTransformer, UnitTestSummaryTransformer};
pub use csv_preview::CsvPreviewTransformer;
pub use default_loader::DefaultLoaderTransformer;
pub use external_binary::{ImageToTextTransformer, PdfToTextTransformer};
pub use markdown_strip::MarkdownStripTransformer;
pub use pii_masking::PiiMaskingTransformer;
