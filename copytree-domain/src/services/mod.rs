// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Services
//!
//! Concrete algorithmic services living in the domain layer, grounded on
//! `adaptive_pipeline_domain::services::checksum_service` and
//! `datetime_compliance_service` (concrete services, not just trait
//! contracts). `RuleEvaluator` and `IgnoreMatcher` need no infrastructure
//! dependency beyond local filesystem reads, so they are implemented here
//! rather than behind a trait + adapter pair.

mod ignore_matcher;
mod rule_evaluator;

pub use ignore_matcher::{expand_braces, matches_glob, IgnoreDecision, IgnoreMatcher, IgnoreRule};
pub use rule_evaluator::{ContentReader, RuleEvaluator};
