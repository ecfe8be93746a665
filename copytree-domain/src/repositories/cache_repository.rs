// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Cache Repository Trait
//!
//! Domain-defined port for the content cache (spec §4.4). Infrastructure
//! provides a SQLite-backed (`sqlx`) implementation and an in-memory
//! `HashMap` implementation of this same trait, so the pipeline driver and
//! `TransformStage` never branch on which backend is active — mirroring
//! the teacher's `pipeline_repository`/`schema.rs` split between trait and
//! SQL implementation.

use crate::error::CopyTreeResult;
use async_trait::async_trait;

/// The three-component cache key of spec §4.4: SHA-256 of
/// `{transformer_identity, absolute_path, content_hash, options_hash}`,
/// already combined by `ContentHash::derive_cache_key`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(pub String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Persistent or in-memory key -> transform-result store.
///
/// A read error bypasses the cache (the transform runs as if nothing was
/// cached); a write error is logged but never fails the transform that
/// produced the value (spec §4.4).
#[async_trait]
pub trait CacheRepository: Send + Sync {
    async fn get(&self, key: &CacheKey) -> CopyTreeResult<Option<String>>;
    async fn put(&self, key: &CacheKey, value: &str) -> CopyTreeResult<()>;
}
