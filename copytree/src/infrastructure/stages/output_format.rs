// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # OutputFormattingStage
//!
//! Spec §4.16: selects one formatter by name and renders the working
//! set. Unlike the file-filtering/transforming stages, this step
//! produces a rendered string rather than another `WorkingSet`, so it
//! does not implement the `Stage` trait (whose `process` is strictly
//! `WorkingSet -> WorkingSet`); the runtime driver invokes it directly
//! as the pipeline's penultimate step, immediately before `Deliver`.

use crate::infrastructure::formatters::{formatter_for, FormatterContext};
use copytree_domain::aggregates::WorkingSet;
use copytree_domain::error::CopyTreeResult;
use copytree_domain::value_objects::OutputFormatKind;

pub struct OutputFormattingStage {
    pub format: OutputFormatKind,
}

impl OutputFormattingStage {
    pub fn new(format: OutputFormatKind) -> Self {
        Self { format }
    }

    pub fn render(&self, working_set: &WorkingSet, context: &FormatterContext) -> CopyTreeResult<String> {
        let formatter = formatter_for(self.format);
        formatter.render(working_set.files(), context)
    }
}
