// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # RulesetFilterStage
//!
//! Spec §4.8: evaluates the profile's rule sets via the domain rule
//! evaluator, reading content-bearing fields through
//! `FilesystemContentReader` so the evaluator itself stays I/O-free.

use crate::infrastructure::content_reader::FilesystemContentReader;
use async_trait::async_trait;
use copytree_domain::aggregates::WorkingSet;
use copytree_domain::error::CopyTreeResult;
use copytree_domain::profile::Profile;
use copytree_domain::repositories::Stage;
use copytree_domain::services::RuleEvaluator;
use copytree_domain::RunContext;

pub struct RulesetFilterStage {
    pub profile: Profile,
}

impl RulesetFilterStage {
    pub fn new(profile: Profile) -> Self {
        Self { profile }
    }
}

#[async_trait]
impl Stage for RulesetFilterStage {
    fn name(&self) -> &str {
        "RulesetFilter"
    }

    async fn process(&self, input: WorkingSet, _context: &RunContext) -> CopyTreeResult<WorkingSet> {
        let evaluator = RuleEvaluator::new();
        let reader = FilesystemContentReader;

        let mut kept = Vec::with_capacity(input.len());
        for file in input.into_files() {
            let accepted = evaluator.accept(
                &file,
                &reader,
                &self.profile.rules,
                &[],
                &self.profile.always_include,
                &self.profile.always_exclude,
            )?;
            if accepted {
                kept.push(file);
            }
        }
        Ok(WorkingSet::new(kept))
    }
}
