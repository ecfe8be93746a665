// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Profile and Rule Set
//!
//! `Profile` (spec §3) is immutable after load and read by multiple
//! stages; parsing it from YAML/TOML is an infrastructure/application
//! concern (`copytree::application::services::profile_loader`), but the
//! shape itself — and the rule-set evaluation model it carries — is
//! domain data, consumed directly by `RuleEvaluator`.

use crate::value_objects::RuleValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A field a rule predicate reads from a `FileEntry` (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleField {
    RelativeFolder,
    FullRelativePath,
    DirectoryName,
    BaseName,
    FileName,
    Extension,
    Contents,
    ContentsSlice,
    Size,
    ModifiedTime,
    MimeType,
}

/// The base comparison/string operator, before `not`/`Any`/`All` modifiers
/// are parsed off the wire string (spec §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BaseOperator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Contains,
    StartsWith,
    EndsWith,
    Glob,
    Regex,
    OneOf,
}

/// `Any`/`All` suffix combinator applied when the rule's value is an
/// array (spec §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArrayCombinator {
    None,
    Any,
    All,
}

/// A fully-parsed operator: base operator, negation flag, and array
/// combinator. Produced by `Operator::parse` from the wire string
/// (e.g. `"notStartsWithAny"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operator {
    pub base: BaseOperator,
    pub negate: bool,
    pub combinator: ArrayCombinator,
}

impl Operator {
    /// Parses an operator string per spec §4.1:
    /// - strip a `not` prefix if followed by an uppercase letter (negate,
    ///   lowercase the next letter),
    /// - strip an `Any`/`All` suffix (lowercase the preceding letter is
    ///   not needed since the suffix is removed wholesale),
    /// - map the remaining base token to a `BaseOperator`.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let mut rest = raw;
        let mut negate = false;

        if let Some(stripped) = rest.strip_prefix("not") {
            if stripped.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
                negate = true;
                rest = stripped;
            }
        }

        let mut combinator = ArrayCombinator::None;
        let mut base_token = rest.to_string();
        if let Some(stripped) = rest.strip_suffix("Any") {
            combinator = ArrayCombinator::Any;
            base_token = stripped.to_string();
        } else if let Some(stripped) = rest.strip_suffix("All") {
            combinator = ArrayCombinator::All;
            base_token = stripped.to_string();
        }

        // Lowercase the first letter of whatever remains after stripping
        // the `not` prefix, so `NotStartsWith` and `startsWith` both
        // normalize to the same base token.
        let mut chars = base_token.chars();
        let normalized = match chars.next() {
            Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
            None => base_token.clone(),
        };

        let base = match normalized.as_str() {
            "=" | "eq" => BaseOperator::Eq,
            "!=" | "ne" => BaseOperator::Ne,
            "<" | "lt" => BaseOperator::Lt,
            "<=" | "le" => BaseOperator::Le,
            ">" | "gt" => BaseOperator::Gt,
            ">=" | "ge" => BaseOperator::Ge,
            "contains" => BaseOperator::Contains,
            "startsWith" => BaseOperator::StartsWith,
            "endsWith" => BaseOperator::EndsWith,
            "glob" | "fnmatch" => BaseOperator::Glob,
            "regex" => BaseOperator::Regex,
            "oneOf" => BaseOperator::OneOf,
            other => return Err(format!("unknown rule operator {other:?}")),
        };

        Ok(Self { base, negate, combinator })
    }
}

/// One predicate in a rule set: `(field, operator, value)` (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    pub field: RuleField,
    pub operator: String,
    pub value: RuleValue,
}

/// An ordered list of rules; matches a file iff every rule matches (spec
/// §3: "A rule set matches a file iff every rule matches").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSet {
    pub rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }
}

/// Transformer binding: a file glob paired with the transformer name and
/// its options (spec §3, §6 "Profile file").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformerBinding {
    pub glob: String,
    pub transformer: String,
    #[serde(default)]
    pub options: HashMap<String, String>,
}

/// Named bundle of patterns and rules that tailors a run to a repository
/// shape (spec §3).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub rules: Vec<RuleSet>,
    #[serde(default)]
    pub always_include: Vec<String>,
    #[serde(default)]
    pub always_exclude: Vec<String>,
    #[serde(default)]
    pub transformers: Vec<TransformerBinding>,
    #[serde(default)]
    pub external: Vec<String>,
    #[serde(default)]
    pub output_format: Option<String>,
}

impl Profile {
    /// The profile used when none is selected: no include/exclude
    /// narrowing beyond the global stages.
    pub fn empty() -> Self {
        Self {
            name: "default".to_string(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_operator() {
        let op = Operator::parse("startsWith").unwrap();
        assert_eq!(op.base, BaseOperator::StartsWith);
        assert!(!op.negate);
        assert_eq!(op.combinator, ArrayCombinator::None);
    }

    #[test]
    fn parses_negated_any_operator() {
        let op = Operator::parse("notStartsWithAny").unwrap();
        assert_eq!(op.base, BaseOperator::StartsWith);
        assert!(op.negate);
        assert_eq!(op.combinator, ArrayCombinator::Any);
    }

    #[test]
    fn parses_all_suffix() {
        let op = Operator::parse("containsAll").unwrap();
        assert_eq!(op.base, BaseOperator::Contains);
        assert_eq!(op.combinator, ArrayCombinator::All);
    }

    #[test]
    fn rejects_unknown_operator() {
        assert!(Operator::parse("frobnicate").is_err());
    }
}
