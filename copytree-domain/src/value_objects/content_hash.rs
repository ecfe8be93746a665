// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Content Hash Value Object
//!
//! SHA-256 digest of a file's bytes, used for cache keys (spec §4.4) and
//! for deduplication (spec §4.11). Two files are the same content
//! iff their `ContentHash` values are equal; size and modification time
//! alone never qualify.

use sha2::{Digest, Sha256};
use std::fmt;

/// A SHA-256 digest, stored as its 32 raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hashes a byte slice.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let digest = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);
        Self(out)
    }

    /// Combines this hash with other key components (transformer
    /// identity, options hash) into a derived cache key, per spec §4.4's
    /// `SHA-256 of {transformer_identity ∥ absolute_path ∥ content_hash ∥
    /// options_hash}`.
    pub fn derive_cache_key(&self, transformer_identity: &str, absolute_path: &str, options_hash: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(transformer_identity.as_bytes());
        hasher.update(absolute_path.as_bytes());
        hasher.update(self.as_hex().as_bytes());
        hasher.update(options_hash.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Lowercase hex representation.
    pub fn as_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The raw 32 bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_hex())
    }
}
