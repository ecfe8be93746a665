// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # SQLite Cache Repository
//!
//! Persistent backend for spec §4.4's content cache, mirroring the
//! teacher's `pipeline_repository`/`schema.rs` persistence pattern: one
//! table, a pooled connection, results stored `zstd`-compressed to keep
//! the on-disk footprint small (SPEC_FULL.md, "PERSISTENT CACHE").

use async_trait::async_trait;
use copytree_domain::error::{CopyTreeError, CopyTreeResult};
use copytree_domain::repositories::{CacheKey, CacheRepository};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::str::FromStr;

pub struct SqliteCacheRepository {
    pool: SqlitePool,
}

impl SqliteCacheRepository {
    pub async fn open(database_path: &Path) -> CopyTreeResult<Self> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", database_path.display()))
            .map_err(|err| cache_io(format!("invalid cache database path: {err}")))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|err| cache_io(format!("failed to open cache database: {err}")))?;
        let repository = Self { pool };
        repository.ensure_schema().await?;
        Ok(repository)
    }

    pub async fn in_memory() -> CopyTreeResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|err| cache_io(format!("failed to open in-memory cache database: {err}")))?;
        let repository = Self { pool };
        repository.ensure_schema().await?;
        Ok(repository)
    }

    async fn ensure_schema(&self) -> CopyTreeResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS cache_entries (
                key TEXT PRIMARY KEY,
                result BLOB NOT NULL,
                completed_at INTEGER NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|err| cache_io(format!("failed to create cache_entries table: {err}")))?;
        Ok(())
    }
}

#[async_trait]
impl CacheRepository for SqliteCacheRepository {
    async fn get(&self, key: &CacheKey) -> CopyTreeResult<Option<String>> {
        let row = sqlx::query("SELECT result FROM cache_entries WHERE key = ?")
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| cache_io(format!("cache read failed: {err}")))?;

        let Some(row) = row else { return Ok(None) };
        let compressed: Vec<u8> = row.try_get("result").map_err(|err| cache_io(format!("malformed cache row: {err}")))?;
        let decompressed = zstd::stream::decode_all(compressed.as_slice()).map_err(|err| cache_io(format!("cache decompression failed: {err}")))?;
        String::from_utf8(decompressed).map(Some).map_err(|err| cache_io(format!("cached value is not valid UTF-8: {err}")))
    }

    async fn put(&self, key: &CacheKey, value: &str) -> CopyTreeResult<()> {
        let compressed = zstd::stream::encode_all(value.as_bytes(), 0).map_err(|err| cache_io(format!("cache compression failed: {err}")))?;
        let completed_at = chrono::Utc::now().timestamp();
        sqlx::query("INSERT OR REPLACE INTO cache_entries (key, result, completed_at) VALUES (?, ?, ?)")
            .bind(key.as_str())
            .bind(compressed)
            .bind(completed_at)
            .execute(&self.pool)
            .await
            .map_err(|err| cache_io(format!("cache write failed: {err}")))?;
        Ok(())
    }
}

fn cache_io(message: String) -> CopyTreeError {
    CopyTreeError::CacheIo { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_a_compressed_value() {
        let cache = SqliteCacheRepository::in_memory().await.unwrap();
        let key = CacheKey("deadbeef".to_string());
        cache.put(&key, "transformer output text").await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), Some("transformer output text".to_string()));
    }

    #[tokio::test]
    async fn missing_key_returns_none() {
        let cache = SqliteCacheRepository::in_memory().await.unwrap();
        assert_eq!(cache.get(&CacheKey("missing".into())).await.unwrap(), None);
    }
}
