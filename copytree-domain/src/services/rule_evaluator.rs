// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Rule Evaluator
//!
//! Evaluates single predicates and rule sets over file metadata (spec
//! §4.1). Content-bearing fields (`contents`, `contentsSlice`,
//! `mimeType`) are read through the `ContentReader` port rather than
//! directly from the filesystem, keeping this domain service I/O-free;
//! `infrastructure::stages` supplies the concrete reader backed by
//! `std::fs`.

use crate::entities::FileEntry;
use crate::error::{CopyTreeError, CopyTreeResult};
use crate::profile::{ArrayCombinator, BaseOperator, Operator, RuleField, RuleSet};
use crate::services::ignore_matcher;
use crate::value_objects::RuleValue;
use regex::Regex;

/// Reads content-bearing fields for a file that may not yet have its
/// `content` populated (the rule evaluator runs in `ProfileFilter`/
/// `RulesetFilter`, both ahead of `FileLoadStage` in the canonical stage
/// order).
pub trait ContentReader {
    fn read_contents(&self, file: &FileEntry) -> CopyTreeResult<String>;
    fn read_contents_slice(&self, file: &FileEntry, max_bytes: usize) -> CopyTreeResult<String>;
    fn mime_type(&self, file: &FileEntry) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RuleEvaluator;

impl RuleEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// `accept(file, ruleSets, globalExcludeRuleSets, alwaysInclude,
    /// alwaysExclude) -> bool`, decision order per spec §4.1.
    pub fn accept(
        &self,
        file: &FileEntry,
        reader: &dyn ContentReader,
        rule_sets: &[RuleSet],
        global_exclude_rule_sets: &[RuleSet],
        always_include: &[String],
        always_exclude: &[String],
    ) -> CopyTreeResult<bool> {
        let path = file.relative_path().as_str();

        for glob in always_exclude {
            if ignore_matcher::matches_glob(glob, path)? {
                return Ok(false);
            }
        }
        for glob in always_include {
            if ignore_matcher::matches_glob(glob, path)? {
                return Ok(true);
            }
        }
        for rule_set in global_exclude_rule_sets {
            if self.matches_rule_set(file, reader, rule_set)? {
                return Ok(false);
            }
        }
        if rule_sets.is_empty() {
            return Ok(true);
        }
        for rule_set in rule_sets {
            if self.matches_rule_set(file, reader, rule_set)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn matches_rule_set(&self, file: &FileEntry, reader: &dyn ContentReader, rule_set: &RuleSet) -> CopyTreeResult<bool> {
        for rule in &rule_set.rules {
            if !self.matches_rule(file, reader, rule.field, &rule.operator, &rule.value)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn matches_rule(&self, file: &FileEntry, reader: &dyn ContentReader, field: RuleField, operator: &str, value: &RuleValue) -> CopyTreeResult<bool> {
        let parsed = Operator::parse(operator).map_err(|message| CopyTreeError::Rule { message })?;
        let result = if parsed.combinator != ArrayCombinator::None {
            let items = value.as_array().ok_or_else(|| CopyTreeError::Rule {
                message: format!("operator {operator:?} requires an array value"),
            })?;
            match parsed.combinator {
                ArrayCombinator::Any => {
                    let mut any = false;
                    for item in items {
                        if self.apply_base(file, reader, field, parsed.base, item)? {
                            any = true;
                            break;
                        }
                    }
                    any
                }
                ArrayCombinator::All => {
                    let mut all = true;
                    for item in items {
                        if !self.apply_base(file, reader, field, parsed.base, item)? {
                            all = false;
                            break;
                        }
                    }
                    all
                }
                ArrayCombinator::None => unreachable!(),
            }
        } else {
            self.apply_base(file, reader, field, parsed.base, value)?
        };
        Ok(result ^ parsed.negate)
    }

    fn apply_base(&self, file: &FileEntry, reader: &dyn ContentReader, field: RuleField, base: BaseOperator, value: &RuleValue) -> CopyTreeResult<bool> {
        use RuleField::*;

        if matches!(field, Contents | ContentsSlice | MimeType) {
            let text = match field {
                Contents => reader.read_contents(file).map_err(|_| CopyTreeError::FieldRead {
                    field: "contents".to_string(),
                    path: file.absolute_path().to_path_buf(),
                    message: "file unreadable".to_string(),
                })?,
                ContentsSlice => reader.read_contents_slice(file, 256).map_err(|_| CopyTreeError::FieldRead {
                    field: "contents_slice".to_string(),
                    path: file.absolute_path().to_path_buf(),
                    message: "file unreadable".to_string(),
                })?,
                MimeType => reader.mime_type(file),
                _ => unreachable!(),
            };
            return Self::compare_string(base, &text, value);
        }

        match field {
            RelativeFolder | FullRelativePath => {
                let text = if field == RelativeFolder {
                    file.relative_path().directory()
                } else {
                    file.relative_path().as_str()
                };
                Self::compare_string(base, text, value)
            }
            DirectoryName => Self::compare_string(base, file.relative_path().directory_name(), value),
            BaseName | FileName => Self::compare_string(base, file.relative_path().base_name(), value),
            Extension => Self::compare_string(base, file.relative_path().extension(), value),
            Size => Self::compare_number(base, file.size() as f64, value),
            ModifiedTime => Self::compare_number(base, file.modified_at().timestamp() as f64, value),
            Contents | ContentsSlice | MimeType => unreachable!(),
        }
    }

    fn compare_string(base: BaseOperator, text: &str, value: &RuleValue) -> CopyTreeResult<bool> {
        match base {
            BaseOperator::Eq => Ok(value.as_str().is_some_and(|v| text == v)),
            BaseOperator::Ne => Ok(value.as_str().is_some_and(|v| text != v)),
            BaseOperator::Contains => Ok(value.as_str().is_some_and(|v| text.contains(v))),
            BaseOperator::StartsWith => Ok(value.as_str().is_some_and(|v| text.starts_with(v))),
            BaseOperator::EndsWith => Ok(value.as_str().is_some_and(|v| text.ends_with(v))),
            BaseOperator::Glob => {
                let pattern = value.as_str().ok_or_else(|| CopyTreeError::Rule {
                    message: "glob operator requires a string value".to_string(),
                })?;
                ignore_matcher::matches_glob(pattern, text)
            }
            BaseOperator::Regex => {
                let pattern = value.as_str().ok_or_else(|| CopyTreeError::Rule {
                    message: "regex operator requires a string value".to_string(),
                })?;
                let compiled = Regex::new(pattern).map_err(|err| CopyTreeError::Rule { message: err.to_string() })?;
                Ok(compiled.is_match(text))
            }
            BaseOperator::OneOf => {
                let items = value.as_array().ok_or_else(|| CopyTreeError::Rule {
                    message: "oneOf operator requires an array value".to_string(),
                })?;
                Ok(items.iter().any(|item| item.as_str() == Some(text)))
            }
            BaseOperator::Lt | BaseOperator::Le | BaseOperator::Gt | BaseOperator::Ge => Err(CopyTreeError::Rule {
                message: "comparison operators require a numeric field".to_string(),
            }),
        }
    }

    fn compare_number(base: BaseOperator, number: f64, value: &RuleValue) -> CopyTreeResult<bool> {
        let target = value.as_number().ok_or_else(|| CopyTreeError::Rule {
            message: "numeric field compared against a non-numeric value".to_string(),
        })?;
        Ok(match base {
            BaseOperator::Eq => number == target,
            BaseOperator::Ne => number != target,
            BaseOperator::Lt => number < target,
            BaseOperator::Le => number <= target,
            BaseOperator::Gt => number > target,
            BaseOperator::Ge => number >= target,
            _ => {
                return Err(CopyTreeError::Rule {
                    message: "string operator applied to a numeric field".to_string(),
                })
            }
        })
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::profile::Rule;
    use crate::value_objects::RelativePath;
    use chrono::Utc;
    use proptest::prelude::*;

    struct NullReader;
    impl ContentReader for NullReader {
        fn read_contents(&self, _file: &FileEntry) -> CopyTreeResult<String> {
            Ok(String::new())
        }
        fn read_contents_slice(&self, _file: &FileEntry, _max_bytes: usize) -> CopyTreeResult<String> {
            Ok(String::new())
        }
        fn mime_type(&self, _file: &FileEntry) -> String {
            "text/plain".to_string()
        }
    }

    fn file(path: String) -> FileEntry {
        file_with_size(path, 10)
    }

    fn file_with_size(path: String, size: u64) -> FileEntry {
        FileEntry::discovered(RelativePath::new(&path), path.into(), size, Utc::now())
    }

    proptest! {
        /// Spec §4.1: "`not` prefix negates the base ... applied last".
        /// For every extension and candidate name, `startsWith` and
        /// `notStartsWith` must disagree on every file.
        #[test]
        fn not_prefix_is_always_the_negation(prefix in "[a-z]{1,5}", rest in "[a-z]{0,5}") {
            let evaluator = RuleEvaluator::new();
            let reader = NullReader;
            let path = format!("{prefix}{rest}.rs");
            let positive = RuleSet::new(vec![Rule {
                field: RuleField::BaseName,
                operator: "startsWith".to_string(),
                value: RuleValue::from(prefix.as_str()),
            }]);
            let negated = RuleSet::new(vec![Rule {
                field: RuleField::BaseName,
                operator: "notStartsWith".to_string(),
                value: RuleValue::from(prefix.as_str()),
            }]);
            let a = evaluator.matches_rule_set(&file(path.clone()), &reader, &positive).unwrap();
            let b = evaluator.matches_rule_set(&file(path), &reader, &negated).unwrap();
            prop_assert_ne!(a, b);
        }

        /// `containsAny` over a singleton array is equivalent to the bare
        /// `contains` operator applied to that one element.
        #[test]
        fn any_suffix_over_singleton_matches_plain_operator(needle in "[a-z]{1,6}", candidate in "[a-z]{0,10}") {
            let evaluator = RuleEvaluator::new();
            let reader = NullReader;
            let path = format!("{candidate}.rs");
            let plain = RuleSet::new(vec![Rule {
                field: RuleField::BaseName,
                operator: "contains".to_string(),
                value: RuleValue::from(needle.as_str()),
            }]);
            let any = RuleSet::new(vec![Rule {
                field: RuleField::BaseName,
                operator: "containsAny".to_string(),
                value: RuleValue::Array(vec![RuleValue::from(needle.as_str())]),
            }]);
            let a = evaluator.matches_rule_set(&file(path.clone()), &reader, &plain).unwrap();
            let b = evaluator.matches_rule_set(&file(path), &reader, &any).unwrap();
            prop_assert_eq!(a, b);
        }

        /// Size comparisons are mutually exclusive and exhaustive: for any
        /// file size and threshold, exactly one of `<`, `=`, `>` holds.
        #[test]
        fn size_operators_partition_the_number_line(size in 0u64..100_000, threshold in 0.0f64..100_000.0) {
            let evaluator = RuleEvaluator::new();
            let reader = NullReader;
            let lt = RuleSet::new(vec![Rule { field: RuleField::Size, operator: "<".to_string(), value: RuleValue::from(threshold) }]);
            let eq = RuleSet::new(vec![Rule { field: RuleField::Size, operator: "=".to_string(), value: RuleValue::from(threshold) }]);
            let gt = RuleSet::new(vec![Rule { field: RuleField::Size, operator: ">".to_string(), value: RuleValue::from(threshold) }]);
            let f = file_with_size("f.bin".to_string(), size);
            let hits = [
                evaluator.matches_rule_set(&f, &reader, &lt).unwrap(),
                evaluator.matches_rule_set(&f, &reader, &eq).unwrap(),
                evaluator.matches_rule_set(&f, &reader, &gt).unwrap(),
            ];
            prop_assert_eq!(hits.iter().filter(|b| **b).count(), 1);
        }
    }
}
