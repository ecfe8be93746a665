// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Transformer Registry
//!
//! Spec §4.3. Mirrors the teacher's `BasicStageExecutor` +
//! `stage_services: HashMap<String, Arc<dyn StageService>>` pattern, with
//! `Arc<dyn Transformer>` standing in for `Arc<dyn StageService>`: a
//! process-wide table of instances, keyed by name, with a per-pipeline
//! registry object holding only the declarative `TransformerSpec`s needed
//! for plan validation and scheduling.

use crate::infrastructure::content_reader::guess_mime_type;
use async_trait::async_trait;
use copytree_domain::entities::{FileEntry, TransformerSpec};
use copytree_domain::error::{CopyTreeError, CopyTreeResult};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// A pluggable content transformer (spec §3, §4.13).
///
/// `identity()` feeds the cache key (spec §4.4) and must be stable across
/// runs for a given configuration; it is not necessarily the display name.
#[async_trait]
pub trait Transformer: Send + Sync {
    fn name(&self) -> &str;

    fn identity(&self) -> String {
        self.name().to_string()
    }

    async fn transform(&self, file: &FileEntry, options: &HashMap<String, String>) -> CopyTreeResult<String>;
}

/// One issue surfaced by `validate_plan`: an error blocks execution, a
/// warning is reported but does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanIssue {
    pub message: String,
    pub is_warning: bool,
}

/// One reordering move reported by `optimize_plan`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanMove {
    pub transformer: String,
    pub reason: String,
}

pub struct TransformerRegistry {
    instances: HashMap<String, Arc<dyn Transformer>>,
    specs: HashMap<String, TransformerSpec>,
}

impl TransformerRegistry {
    pub fn new() -> Self {
        Self {
            instances: HashMap::new(),
            specs: HashMap::new(),
        }
    }

    pub fn register(&mut self, spec: TransformerSpec, instance: Arc<dyn Transformer>) {
        self.instances.insert(spec.name.clone(), instance);
        self.specs.insert(spec.name.clone(), spec);
    }

    pub fn spec(&self, name: &str) -> Option<&TransformerSpec> {
        self.specs.get(name)
    }

    pub fn instance(&self, name: &str) -> Option<Arc<dyn Transformer>> {
        self.instances.get(name).cloned()
    }

    /// Spec §4.3 `getForFile`: candidates are extension- and mime-matched
    /// names, ties broken by descending priority, falling back to the
    /// registered default.
    pub fn get_for_file(&self, file: &FileEntry) -> CopyTreeResult<Arc<dyn Transformer>> {
        let extension = file.relative_path().extension().unwrap_or_default();
        let mime_type = guess_mime_type(extension);

        let mut seen: HashSet<&str> = HashSet::new();
        let mut candidates: Vec<&TransformerSpec> = self
            .specs
            .values()
            .filter(|spec| spec.matches_extension(extension) || spec.matches_mime(&mime_type))
            .filter(|spec| seen.insert(spec.name.as_str()))
            .collect();
        candidates.sort_by(|a, b| b.priority.cmp(&a.priority));

        if let Some(best) = candidates.first() {
            return self.instance(&best.name).ok_or_else(|| CopyTreeError::TransformNotFound {
                path: file.absolute_path().to_path_buf(),
            });
        }

        if let Some(default_spec) = self.specs.values().find(|spec| spec.is_default) {
            return self.instance(&default_spec.name).ok_or_else(|| CopyTreeError::TransformNotFound {
                path: file.absolute_path().to_path_buf(),
            });
        }

        Err(CopyTreeError::TransformNotFound {
            path: file.absolute_path().to_path_buf(),
        })
    }

    /// Spec §4.3 `validateDependencies`: topological check over declared
    /// `traits.dependencies` that name other registered transformers.
    /// Dependencies that are not registered transformer names are
    /// informational (external resources such as `tesseract`) and
    /// skipped, per spec §4.3.
    pub fn validate_dependencies(&self) -> CopyTreeResult<()> {
        let mut visiting: HashSet<&str> = HashSet::new();
        let mut visited: HashSet<&str> = HashSet::new();

        for name in self.specs.keys() {
            self.visit(name, &mut visiting, &mut visited)?;
        }
        Ok(())
    }

    fn visit<'a>(&'a self, name: &'a str, visiting: &mut HashSet<&'a str>, visited: &mut HashSet<&'a str>) -> CopyTreeResult<()> {
        if visited.contains(name) {
            return Ok(());
        }
        if !visiting.insert(name) {
            return Err(CopyTreeError::CircularDependency { cycle: name.to_string() });
        }

        if let Some(spec) = self.specs.get(name) {
            for dependency in &spec.traits.dependencies {
                if self.specs.contains_key(dependency.as_str()) {
                    self.visit(dependency, visiting, visited)?;
                }
            }
        }

        visiting.remove(name);
        visited.insert(name);
        Ok(())
    }

    /// Spec §4.3 `validatePlan`.
    pub fn validate_plan(&self, stages: &[String]) -> Vec<PlanIssue> {
        let mut issues = Vec::new();
        let mut heavy_count = 0usize;
        let mut seen_tags: HashSet<&str> = HashSet::new();

        for (index, name) in stages.iter().enumerate() {
            let Some(spec) = self.specs.get(name.as_str()) else {
                issues.push(PlanIssue {
                    message: format!("transformer '{name}' is not registered"),
                    is_warning: false,
                });
                continue;
            };

            if spec.traits.heavy {
                heavy_count += 1;
            }
            for tag in &spec.traits.tags {
                if !seen_tags.insert(tag.as_str()) {
                    issues.push(PlanIssue {
                        message: format!("tag '{tag}' is redundant across the plan"),
                        is_warning: true,
                    });
                }
            }

            for conflict in &spec.traits.conflicts_with {
                if stages.iter().any(|other| other == conflict) {
                    issues.push(PlanIssue {
                        message: format!("'{name}' conflicts with '{conflict}' in the same plan"),
                        is_warning: false,
                    });
                }
            }

            if index > 0 {
                if let Some(previous) = self.specs.get(stages[index - 1].as_str()) {
                    let types_compatible = previous.traits.output_types.iter().any(|t| spec.traits.input_types.contains(t));
                    if !types_compatible {
                        issues.push(PlanIssue {
                            message: format!("'{}' output types do not match '{}' input types", previous.name, spec.name),
                            is_warning: false,
                        });
                    }
                    if spec.traits.order_sensitive && !previous.traits.idempotent {
                        issues.push(PlanIssue {
                            message: format!("order-sensitive '{}' placed after non-idempotent '{}'", spec.name, previous.name),
                            is_warning: false,
                        });
                    }
                }
            }
        }

        if heavy_count > 1 {
            issues.push(PlanIssue {
                message: format!("plan has {heavy_count} heavy transformers"),
                is_warning: true,
            });
        }

        issues
    }

    /// Spec §4.3 `optimizePlan`: order-sensitive first, then
    /// order-insensitive light stages, then heavy stages, preserving
    /// relative order within each class. Reports a move for every stage
    /// whose position actually changes, not just heavy ones ("reports
    /// every move made").
    pub fn optimize_plan(&self, stages: &[String]) -> (Vec<String>, Vec<PlanMove>) {
        enum Class {
            OrderSensitive,
            Light,
            Heavy,
        }

        let classify = |name: &str| match self.specs.get(name) {
            Some(spec) if spec.traits.order_sensitive => Class::OrderSensitive,
            Some(spec) if spec.traits.heavy => Class::Heavy,
            _ => Class::Light,
        };

        let mut order_sensitive = Vec::new();
        let mut light = Vec::new();
        let mut heavy = Vec::new();

        for name in stages {
            match classify(name) {
                Class::OrderSensitive => order_sensitive.push(name.clone()),
                Class::Heavy => heavy.push(name.clone()),
                Class::Light => light.push(name.clone()),
            }
        }

        let mut reordered = order_sensitive;
        reordered.extend(light);
        reordered.extend(heavy);

        let mut moves = Vec::new();
        for (new_index, name) in reordered.iter().enumerate() {
            let original_index = stages.iter().position(|s| s == name).unwrap_or(new_index);
            if original_index != new_index {
                let reason = match classify(name) {
                    Class::OrderSensitive => "moved earlier: order-sensitive transformer",
                    Class::Heavy => "moved to end: heavy transformer",
                    Class::Light => "moved earlier: order-insensitive light transformer",
                };
                moves.push(PlanMove {
                    transformer: name.clone(),
                    reason: reason.to_string(),
                });
            }
        }

        (reordered, moves)
    }
}

impl Default for TransformerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use copytree_domain::entities::TransformerTraits;

    fn spec(name: &str, heavy: bool, order_sensitive: bool) -> TransformerSpec {
        TransformerSpec::new(name).with_traits(TransformerTraits {
            heavy,
            order_sensitive,
            ..TransformerTraits::default()
        })
    }

    #[test]
    fn optimize_plan_moves_heavy_stages_to_the_end() {
        let mut registry = TransformerRegistry::new();
        struct Noop;
        #[async_trait]
        impl Transformer for Noop {
            fn name(&self) -> &str {
                "noop"
            }
            async fn transform(&self, _file: &FileEntry, _options: &HashMap<String, String>) -> CopyTreeResult<String> {
                Ok(String::new())
            }
        }
        registry.register(spec("csv", false, false), Arc::new(Noop));
        registry.register(spec("code-summary", true, false), Arc::new(Noop));
        registry.register(spec("markdown-strip", false, false), Arc::new(Noop));

        let plan = vec!["csv".to_string(), "code-summary".to_string(), "markdown-strip".to_string()];
        let (reordered, moves) = registry.optimize_plan(&plan);
        assert_eq!(reordered, vec!["csv", "markdown-strip", "code-summary"]);
        // Both relocated stages are reported, not just the heavy one:
        // `markdown-strip` moves from index 2 to 1, `code-summary` from 1 to 2.
        assert_eq!(moves.len(), 2);
        assert!(moves.iter().any(|m| m.transformer == "code-summary"));
        assert!(moves.iter().any(|m| m.transformer == "markdown-strip"));
    }

    #[test]
    fn optimize_plan_reports_a_light_stage_relocated_ahead_of_a_heavy_one() {
        let mut registry = TransformerRegistry::new();
        struct Noop;
        #[async_trait]
        impl Transformer for Noop {
            fn name(&self) -> &str {
                "noop"
            }
            async fn transform(&self, _file: &FileEntry, _options: &HashMap<String, String>) -> CopyTreeResult<String> {
                Ok(String::new())
            }
        }
        registry.register(spec("heavy", true, false), Arc::new(Noop));
        registry.register(spec("light", false, false), Arc::new(Noop));

        let plan = vec!["heavy".to_string(), "light".to_string()];
        let (reordered, moves) = registry.optimize_plan(&plan);
        assert_eq!(reordered, vec!["light", "heavy"]);
        assert_eq!(moves.len(), 2);
        assert!(moves.iter().any(|m| m.transformer == "light"));
        assert!(moves.iter().any(|m| m.transformer == "heavy"));
    }

    #[test]
    fn get_for_file_resolves_a_transformer_that_only_matches_by_mime_type() {
        use chrono::Utc;
        use copytree_domain::value_objects::RelativePath;

        struct Noop;
        #[async_trait]
        impl Transformer for Noop {
            fn name(&self) -> &str {
                "noop"
            }
            async fn transform(&self, _file: &FileEntry, _options: &HashMap<String, String>) -> CopyTreeResult<String> {
                Ok(String::new())
            }
        }

        let mut registry = TransformerRegistry::new();
        // No extension binding at all — only reachable through mime matching.
        registry.register(TransformerSpec::new("json-transformer").with_mime_types(["application/json"]), Arc::new(Noop));

        let file = FileEntry::discovered(RelativePath::new("data.json"), "/tmp/data.json".into(), 10, Utc::now());
        let resolved = registry.get_for_file(&file).unwrap();
        assert_eq!(resolved.name(), "noop");
    }

    #[test]
    fn validate_dependencies_detects_a_cycle() {
        let mut registry = TransformerRegistry::new();
        struct Noop;
        #[async_trait]
        impl Transformer for Noop {
            fn name(&self) -> &str {
                "noop"
            }
            async fn transform(&self, _file: &FileEntry, _options: &HashMap<String, String>) -> CopyTreeResult<String> {
                Ok(String::new())
            }
        }
        let mut a = spec("a", false, false);
        a.traits.dependencies.push("b".to_string());
        let mut b = spec("b", false, false);
        b.traits.dependencies.push("a".to_string());
        registry.register(a, Arc::new(Noop));
        registry.register(b, Arc::new(Noop));

        assert!(registry.validate_dependencies().is_err());
    }
}
