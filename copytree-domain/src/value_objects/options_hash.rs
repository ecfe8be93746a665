// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Options Hash Value Object
//!
//! A stable digest of a transformer's effective options, used as the third
//! component of the cache key (spec §4.4). Built from a sorted `key=value`
//! list rather than raw JSON so that field reordering in the caller never
//! changes the hash.

use sha2::{Digest, Sha256};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OptionsHash(String);

impl OptionsHash {
    /// Hashes an already-sorted `(key, value)` list. Callers are
    /// responsible for sorting by key so the digest is independent of
    /// insertion order.
    pub fn of_sorted_pairs(pairs: &[(String, String)]) -> Self {
        let mut hasher = Sha256::new();
        for (k, v) in pairs {
            hasher.update(k.as_bytes());
            hasher.update(b"=");
            hasher.update(v.as_bytes());
            hasher.update(b";");
        }
        Self(hex::encode(hasher.finalize()))
    }

    /// The empty-options hash, used by transformers with no configurable
    /// parameters.
    pub fn empty() -> Self {
        Self::of_sorted_pairs(&[])
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OptionsHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_pairs_hash_identically() {
        let a = OptionsHash::of_sorted_pairs(&[("rows".into(), "10".into())]);
        let b = OptionsHash::of_sorted_pairs(&[("rows".into(), "10".into())]);
        assert_eq!(a, b);
    }

    #[test]
    fn different_values_hash_differently() {
        let a = OptionsHash::of_sorted_pairs(&[("rows".into(), "10".into())]);
        let b = OptionsHash::of_sorted_pairs(&[("rows".into(), "20".into())]);
        assert_ne!(a, b);
    }
}
