// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # In-Memory Cache Repository
//!
//! `--no-cache`/test backend: a `parking_lot`-guarded `HashMap`, mirroring
//! the teacher's in-memory `Repository` test doubles but implementing the
//! real `CacheRepository` port so it can stand in for the SQLite backend
//! in any run.

use async_trait::async_trait;
use copytree_domain::error::CopyTreeResult;
use copytree_domain::repositories::{CacheKey, CacheRepository};
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
pub struct InMemoryCacheRepository {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryCacheRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheRepository for InMemoryCacheRepository {
    async fn get(&self, key: &CacheKey) -> CopyTreeResult<Option<String>> {
        Ok(self.entries.read().get(key.as_str()).cloned())
    }

    async fn put(&self, key: &CacheKey, value: &str) -> CopyTreeResult<()> {
        self.entries.write().insert(key.as_str().to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let cache = InMemoryCacheRepository::new();
        let key = CacheKey("abc".to_string());
        cache.put(&key, "cached value").await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), Some("cached value".to_string()));
    }

    #[tokio::test]
    async fn missing_key_returns_none() {
        let cache = InMemoryCacheRepository::new();
        assert_eq!(cache.get(&CacheKey("missing".into())).await.unwrap(), None);
    }
}
