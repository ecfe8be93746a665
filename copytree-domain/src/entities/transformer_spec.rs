// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Transformer Spec Entity
//!
//! The registration record for one transformer (spec §3, §4.3): name,
//! matched extensions/mime types, priority, and the trait set the registry
//! uses for dependency validation and plan scheduling. Mirrors the
//! teacher's `StageService` descriptor split between trait object and
//! declarative metadata — the instance itself lives behind
//! `infrastructure::transform::registry::Transformer`; this type is the
//! domain-level metadata the registry and `validatePlan`/`optimizePlan`
//! reason over without needing the instance.

use serde::{Deserialize, Serialize};

/// An external resource or another transformer name a transformer declares
/// it needs (spec §3, `TransformerSpec.dependencies`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformerRequirement {
    ApiKey,
    Memory,
    Network,
    /// An external binary, e.g. `tesseract` or `pdftotext`. Informational
    /// only — `validateDependencies` does not require these to be
    /// registered transformer names (spec §4.3).
    ExternalBinary(String),
}

/// Machine-readable descriptor enabling plan validation and scheduling
/// decisions (GLOSSARY, "Trait").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformerTraits {
    pub input_types: Vec<String>,
    pub output_types: Vec<String>,
    pub idempotent: bool,
    pub order_sensitive: bool,
    pub heavy: bool,
    pub stateful: bool,
    pub dependencies: Vec<String>,
    pub conflicts_with: Vec<String>,
    pub tags: Vec<String>,
}

impl Default for TransformerTraits {
    /// Unknown fields default to safe values on registration, per spec
    /// §4.3 ("unknown fields default to safe values such as
    /// `idempotent=true`, `heavy=false`").
    fn default() -> Self {
        Self {
            input_types: vec!["text".to_string()],
            output_types: vec!["text".to_string()],
            idempotent: true,
            order_sensitive: false,
            heavy: false,
            stateful: false,
            dependencies: Vec::new(),
            conflicts_with: Vec::new(),
            tags: Vec::new(),
        }
    }
}

/// A registered transformer's declarative metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformerSpec {
    pub name: String,
    pub priority: i32,
    pub extensions: Vec<String>,
    pub mime_types: Vec<String>,
    pub is_default: bool,
    pub traits: TransformerTraits,
    pub requirements: Vec<String>,
}

impl TransformerSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority: 0,
            extensions: Vec::new(),
            mime_types: Vec::new(),
            is_default: false,
            traits: TransformerTraits::default(),
            requirements: Vec::new(),
        }
    }

    pub fn with_mime_types(mut self, mime_types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.mime_types = mime_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_extensions(mut self, extensions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn with_traits(mut self, traits: TransformerTraits) -> Self {
        self.traits = traits;
        self
    }

    pub fn matches_extension(&self, extension: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(extension))
    }

    pub fn matches_mime(&self, mime_type: &str) -> bool {
        self.mime_types.iter().any(|m| m.eq_ignore_ascii_case(mime_type))
    }
}
