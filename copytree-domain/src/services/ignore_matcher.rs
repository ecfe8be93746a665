// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Ignore Matcher
//!
//! Compiles and matches version-control-style ignore patterns (spec
//! §4.2): nested ignore files, negation, directory-only rules, `**`
//! wildcards, and brace expansion. Pure pattern logic — reading
//! `.gitignore`/`.ctreeignore` files from disk is `FileDiscoveryStage`'s
//! job (infrastructure); this service only ever sees pattern strings
//! already paired with the directory that scopes them, keeping the
//! domain crate free of filesystem I/O per the workspace's layering
//! rule.
//!
//! Also backs `ProfileFilterStage`'s include/exclude glob lists (spec
//! §4.8: "ProfileFilter applies the profile's include/exclude glob lists
//! using the ignore matcher's pattern engine") via `matches_glob`, a
//! single-pattern entry point with no directory-file scoping or negation
//! semantics.

use crate::error::{CopyTreeError, CopyTreeResult};
use regex::Regex;

/// A single compiled ignore pattern (spec §3, `IgnoreRule`).
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    pub raw_pattern: String,
    pub negation: bool,
    pub directory_only: bool,
    pub anchored: bool,
    pub origin_dir: String,
    compiled: Regex,
}

/// The result of evaluating a path against the accumulated rule set:
/// whether it's ignored, plus the originating rule for diagnostics (spec
/// §4.2).
#[derive(Debug, Clone)]
pub struct IgnoreDecision<'a> {
    pub ignored: bool,
    pub rule: Option<&'a IgnoreRule>,
}

/// Accumulates compiled rules across every ignore file discovered under a
/// walk, in outer-to-inner directory order.
#[derive(Debug, Clone, Default)]
pub struct IgnoreMatcher {
    rules: Vec<IgnoreRule>,
}

impl IgnoreMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles and appends the patterns of one ignore file, scoped to
    /// `origin_dir` (a `/`-relative directory path, `""` for the base).
    /// Call in outer-to-inner order as the walk descends, per spec §4.2
    /// ("walk rules from the outermost ignore file inward; later rules
    /// override earlier ones").
    pub fn add_patterns(&mut self, origin_dir: &str, patterns: &[&str]) -> CopyTreeResult<()> {
        for raw in patterns {
            let line = raw.trim_end();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            self.rules.push(compile_rule(origin_dir, line)?);
        }
        Ok(())
    }

    /// Decides whether `relative_path` is ignored. Per spec §4.2: the
    /// *last* matching rule wins; a file is rejected iff that rule is not
    /// a negation.
    pub fn is_ignored(&self, relative_path: &str, is_dir: bool) -> IgnoreDecision<'_> {
        let mut last_match: Option<&IgnoreRule> = None;
        for rule in &self.rules {
            if rule.directory_only && !is_dir {
                continue;
            }
            if rule_matches(rule, relative_path) {
                last_match = Some(rule);
            }
        }
        match last_match {
            Some(rule) => IgnoreDecision {
                ignored: !rule.negation,
                rule: Some(rule),
            },
            None => IgnoreDecision { ignored: false, rule: None },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn rule_matches(rule: &IgnoreRule, relative_path: &str) -> bool {
    if rule.anchored || !rule.origin_dir.is_empty() {
        // Anchored (or directory-scoped) patterns only match within
        // their originating directory's subtree.
        let scoped = match relative_path.strip_prefix(&rule.origin_dir) {
            Some(rest) if rule.origin_dir.is_empty() => rest,
            Some(rest) => rest.strip_prefix('/').unwrap_or(rest),
            None => return false,
        };
        rule.compiled.is_match(scoped)
    } else {
        // Unanchored patterns match the whole path, or any path segment
        // (a bare `*.log` matches at any depth).
        rule.compiled.is_match(relative_path) || relative_path.rsplit('/').next().is_some_and(|base| rule.compiled.is_match(base))
    }
}

fn compile_rule(origin_dir: &str, line: &str) -> CopyTreeResult<IgnoreRule> {
    let mut pattern = line;
    let negation = pattern.starts_with('!');
    if negation {
        pattern = &pattern[1..];
    }

    let directory_only = pattern.ends_with('/') && !pattern.ends_with("\\/");
    let mut pattern = pattern.trim_end_matches('/').to_string();

    let anchored = pattern.starts_with('/');
    if anchored {
        pattern.remove(0);
    }

    let expanded = expand_braces(&pattern).map_err(|message| CopyTreeError::IgnorePattern {
        pattern: line.to_string(),
        message,
    })?;

    let alternatives: Vec<String> = expanded.iter().map(|alt| glob_to_regex_source(alt)).collect();
    let combined = format!("^(?:{})$", alternatives.join("|"));
    let compiled = Regex::new(&combined).map_err(|err| CopyTreeError::IgnorePattern {
        pattern: line.to_string(),
        message: err.to_string(),
    })?;

    Ok(IgnoreRule {
        raw_pattern: line.to_string(),
        negation,
        directory_only,
        anchored,
        origin_dir: origin_dir.to_string(),
        compiled,
    })
}

/// Enumerates brace alternations such as `{a,b}` (including nested
/// braces) before wildcard conversion. Escapes (`\{`, `\}`, `\*`)
/// suppress meta and survive expansion verbatim (spec §4.2).
pub fn expand_braces(pattern: &str) -> Result<Vec<String>, String> {
    let chars: Vec<char> = pattern.chars().collect();
    expand_from(&chars, 0)
        .map(|(results, consumed)| {
            debug_assert_eq!(consumed, chars.len());
            results
        })
        .map_err(|e| e)
}

fn expand_from(chars: &[char], start: usize) -> Result<(Vec<String>, usize), String> {
    let mut prefixes = vec![String::new()];
    let mut i = start;
    while i < chars.len() {
        match chars[i] {
            '\\' if i + 1 < chars.len() => {
                for p in prefixes.iter_mut() {
                    p.push('\\');
                    p.push(chars[i + 1]);
                }
                i += 2;
            }
            '{' => {
                let (alternatives, consumed) = parse_brace_group(chars, i)?;
                prefixes = prefixes
                    .into_iter()
                    .flat_map(|p| alternatives.iter().map(move |a| format!("{p}{a}")))
                    .collect();
                i = consumed;
            }
            '}' | ',' if start != 0 => {
                return Ok((prefixes, i));
            }
            c => {
                for p in prefixes.iter_mut() {
                    p.push(c);
                }
                i += 1;
            }
        }
    }
    Ok((prefixes, i))
}

fn parse_brace_group(chars: &[char], open_idx: usize) -> Result<(Vec<String>, usize), String> {
    debug_assert_eq!(chars[open_idx], '{');
    let mut alternatives = Vec::new();
    let mut i = open_idx + 1;
    loop {
        let (segment_alts, consumed) = expand_from(chars, i)?;
        alternatives.extend(segment_alts);
        i = consumed;
        match chars.get(i) {
            Some(',') => {
                i += 1;
                continue;
            }
            Some('}') => {
                i += 1;
                break;
            }
            _ => return Err(format!("unbalanced brace in pattern starting at {open_idx}")),
        }
    }
    Ok((alternatives, i))
}

/// Translates one (brace-expanded) glob alternative into a regex source
/// fragment: `?` = single non-separator, `*` = run of non-separator
/// characters, `**` = run including separators (spec §4.2).
fn glob_to_regex_source(glob: &str) -> String {
    let chars: Vec<char> = glob.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' if i + 1 < chars.len() => {
                out.push_str(&regex::escape(&chars[i + 1].to_string()));
                i += 2;
            }
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    out.push_str(".*");
                    i += 2;
                    // swallow an immediately following separator so
                    // `**/` doesn't require a literal empty segment.
                    if chars.get(i) == Some(&'/') {
                        i += 1;
                    }
                } else {
                    out.push_str("[^/]*");
                    i += 1;
                }
            }
            '?' => {
                out.push_str("[^/]");
                i += 1;
            }
            c => {
                out.push_str(&regex::escape(&c.to_string()));
                i += 1;
            }
        }
    }
    out
}

/// Single-pattern match with no directory scoping, negation, or
/// precedence accumulation — used by `ProfileFilterStage` for include/
/// exclude globs and by the rule evaluator's `glob`/`fnmatch` operator
/// (spec §4.8).
pub fn matches_glob(pattern: &str, relative_path: &str) -> CopyTreeResult<bool> {
    let expanded = expand_braces(pattern).map_err(|message| CopyTreeError::IgnorePattern {
        pattern: pattern.to_string(),
        message,
    })?;
    let alternatives: Vec<String> = expanded.iter().map(|alt| glob_to_regex_source(alt)).collect();
    let combined = format!("^(?:{})$", alternatives.join("|"));
    let compiled = Regex::new(&combined).map_err(|err| CopyTreeError::IgnorePattern {
        pattern: pattern.to_string(),
        message: err.to_string(),
    })?;
    Ok(compiled.is_match(relative_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_extension_pattern_matches_anywhere() {
        let mut matcher = IgnoreMatcher::new();
        matcher.add_patterns("", &["*.log"]).unwrap();
        assert!(matcher.is_ignored("app.log", false).ignored);
        assert!(matcher.is_ignored("nested/app.log", false).ignored);
        assert!(!matcher.is_ignored("app.txt", false).ignored);
    }

    #[test]
    fn negation_re_includes_a_previously_excluded_path() {
        let mut matcher = IgnoreMatcher::new();
        matcher.add_patterns("", &["*.log", "!keep.log"]).unwrap();
        assert!(!matcher.is_ignored("keep.log", false).ignored);
        assert!(matcher.is_ignored("other.log", false).ignored);
    }

    #[test]
    fn anchored_pattern_only_matches_at_its_directory() {
        let mut matcher = IgnoreMatcher::new();
        matcher.add_patterns("", &["/build"]).unwrap();
        assert!(matcher.is_ignored("build", true).ignored);
        assert!(!matcher.is_ignored("nested/build", true).ignored);
    }

    #[test]
    fn directory_only_pattern_skips_files() {
        let mut matcher = IgnoreMatcher::new();
        matcher.add_patterns("", &["dist/"]).unwrap();
        assert!(matcher.is_ignored("dist", true).ignored);
        assert!(!matcher.is_ignored("dist", false).ignored);
    }

    #[test]
    fn double_star_crosses_directory_boundaries() {
        let mut matcher = IgnoreMatcher::new();
        matcher.add_patterns("", &["**/generated/**"]).unwrap();
        assert!(matcher.is_ignored("a/b/generated/c.rs", false).ignored);
    }

    #[test]
    fn brace_expansion_enumerates_alternatives() {
        let mut matcher = IgnoreMatcher::new();
        matcher.add_patterns("", &["*.{jpg,png}"]).unwrap();
        assert!(matcher.is_ignored("a.jpg", false).ignored);
        assert!(matcher.is_ignored("a.png", false).ignored);
        assert!(!matcher.is_ignored("a.gif", false).ignored);
    }

    #[test]
    fn nested_ignore_file_override_order() {
        let mut matcher = IgnoreMatcher::new();
        matcher.add_patterns("", &["*.log"]).unwrap();
        matcher.add_patterns("sub", &["!keep.log"]).unwrap();
        assert!(matcher.is_ignored("sub/other.log", false).ignored);
        assert!(!matcher.is_ignored("sub/keep.log", false).ignored);
    }

    #[test]
    fn single_pattern_glob_helper_matches_exact_shape() {
        assert!(matches_glob("src/**/*.py", "src/pkg/module.py").unwrap());
        assert!(!matches_glob("src/**/*.py", "src/pkg/module.pyc").unwrap());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn path_segment() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9_]{1,8}"
    }

    fn relative_path() -> impl Strategy<Value = String> {
        proptest::collection::vec(path_segment(), 1..4).prop_map(|segments| segments.join("/"))
    }

    proptest! {
        /// Spec §8: "a file is rejected by the ignore matcher iff the last
        /// matching rule ... is not a negation". A bare extension pattern
        /// with no negation must ignore every path ending in that
        /// extension, and none that don't.
        #[test]
        fn extension_pattern_ignores_iff_suffix_matches(base in relative_path(), ext in "[a-z]{1,5}") {
            let mut matcher = IgnoreMatcher::new();
            let pattern = format!("*.{ext}");
            matcher.add_patterns("", &[&pattern]).unwrap();
            let with_ext = format!("{base}.{ext}");
            prop_assert!(matcher.is_ignored(&with_ext, false).ignored);

            let without_ext = base;
            prop_assert!(!matcher.is_ignored(&without_ext, false).ignored);
        }

        /// A negation line immediately following its own blanket exclusion
        /// always re-includes the exact path it names, regardless of what
        /// that path is.
        #[test]
        fn negation_always_reincludes_the_named_path(name in path_segment(), ext in "[a-z]{1,5}") {
            let mut matcher = IgnoreMatcher::new();
            let pattern = format!("*.{ext}");
            let target = format!("{name}.{ext}");
            matcher.add_patterns("", &[&pattern, &format!("!{target}")]).unwrap();
            prop_assert!(!matcher.is_ignored(&target, false).ignored);
        }

        /// Brace expansion is equivalent to a disjunction: a path matches
        /// `{a,b}` iff it matches `a` or `b` in isolation.
        #[test]
        fn brace_expansion_is_equivalent_to_disjunction(first in "[a-z]{1,5}", second in "[a-z]{1,5}", candidate in "[a-z]{1,5}") {
            prop_assume!(first != second);
            let combined_pattern = format!("{{{first},{second}}}.txt");
            let combined = matches_glob(&combined_pattern, &format!("{candidate}.txt")).unwrap();
            let alt_a = matches_glob(&format!("{first}.txt"), &format!("{candidate}.txt")).unwrap();
            let alt_b = matches_glob(&format!("{second}.txt"), &format!("{candidate}.txt")).unwrap();
            prop_assert_eq!(combined, alt_a || alt_b);
        }

        /// `**` always subsumes a single-level `*` match at the same
        /// position: whatever a `*` pattern matches, the `**` variant of
        /// the same pattern also matches.
        #[test]
        fn double_star_subsumes_single_star(name in path_segment(), ext in "[a-z]{1,5}") {
            let path = format!("{name}.{ext}");
            let star_pattern = format!("*.{ext}");
            let double_star_pattern = format!("**.{ext}");
            if matches_glob(&star_pattern, &path).unwrap() {
                prop_assert!(matches_glob(&double_star_pattern, &path).unwrap());
            }
        }
    }
}
