// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Opt-in PII masking transformer, grounded directly in the teacher's
//! `PiiMaskingService`. Independent of the secret *scanner*
//! (`infrastructure::secret_scan`), which blocks the run instead of
//! masking content in place.

use crate::infrastructure::transform::registry::Transformer;
use async_trait::async_trait;
use copytree_domain::entities::FileEntry;
use copytree_domain::error::CopyTreeResult;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());
static SSN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").unwrap());
static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{3}[-.]?\d{3}[-.]?\d{4}\b").unwrap());
static CREDIT_CARD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{4}[-\s]?\d{4}[-\s]?\d{4}[-\s]?\d{4}\b").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PiiPattern {
    Email,
    Ssn,
    Phone,
    CreditCard,
}

impl PiiPattern {
    fn all() -> Vec<Self> {
        vec![Self::Email, Self::Ssn, Self::Phone, Self::CreditCard]
    }

    fn regex(&self) -> &'static Regex {
        match self {
            Self::Email => &EMAIL_REGEX,
            Self::Ssn => &SSN_REGEX,
            Self::Phone => &PHONE_REGEX,
            Self::CreditCard => &CREDIT_CARD_REGEX,
        }
    }

    fn mask(&self, text: &str, mask_char: char, preserve_format: bool) -> String {
        if !preserve_format {
            return mask_char.to_string().repeat(text.len());
        }
        match self {
            Self::Email => match text.find('@') {
                Some(at_pos) => {
                    let (local, domain_with_at) = text.split_at(at_pos);
                    let domain = &domain_with_at[1..];
                    match domain.rfind('.') {
                        Some(dot_pos) => {
                            let (domain_name, tld) = domain.split_at(dot_pos);
                            format!(
                                "{}@{}{}",
                                mask_char.to_string().repeat(local.len().min(3)),
                                mask_char.to_string().repeat(domain_name.len().min(3)),
                                tld
                            )
                        }
                        None => mask_char.to_string().repeat(text.len()),
                    }
                }
                None => mask_char.to_string().repeat(text.len()),
            },
            Self::Ssn => text.chars().map(|c| if c == '-' { '-' } else { mask_char }).collect(),
            Self::Phone | Self::CreditCard => text.chars().map(|c| if c.is_ascii_digit() { mask_char } else { c }).collect(),
        }
    }
}

fn parse_patterns(options: &HashMap<String, String>) -> Vec<PiiPattern> {
    match options.get("patterns").map(|s| s.to_lowercase()) {
        None => PiiPattern::all(),
        Some(raw) if raw == "all" => PiiPattern::all(),
        Some(raw) => raw
            .split(',')
            .filter_map(|token| match token.trim() {
                "email" => Some(PiiPattern::Email),
                "ssn" => Some(PiiPattern::Ssn),
                "phone" => Some(PiiPattern::Phone),
                "credit_card" | "creditcard" => Some(PiiPattern::CreditCard),
                _ => None,
            })
            .collect(),
    }
}

pub struct PiiMaskingTransformer;

#[async_trait]
impl Transformer for PiiMaskingTransformer {
    fn name(&self) -> &str {
        "pii-masking"
    }

    async fn transform(&self, file: &FileEntry, options: &HashMap<String, String>) -> CopyTreeResult<String> {
        let mask_char = options.get("mask_char").and_then(|s| s.chars().next()).unwrap_or('*');
        let preserve_format = options.get("preserve_format").map(|s| s != "false").unwrap_or(true);
        let mut content = file.content().unwrap_or_default().to_string();

        for pattern in parse_patterns(options) {
            content = pattern
                .regex()
                .replace_all(&content, |captures: &regex::Captures| pattern.mask(&captures[0], mask_char, preserve_format))
                .into_owned();
        }
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use copytree_domain::value_objects::{ContentHash, EncodingTag, RelativePath};

    #[tokio::test]
    async fn masks_email_addresses_preserving_format() {
        let mut entry = FileEntry::discovered(RelativePath::new("a.txt"), "/a.txt".into(), 0, Utc::now());
        let raw = "contact jane.doe@example.com for help";
        entry.set_content(raw.to_string(), EncodingTag::Utf8, ContentHash::of_bytes(raw.as_bytes()));
        let transformer = PiiMaskingTransformer;
        let result = transformer.transform(&entry, &HashMap::new()).await.unwrap();
        assert!(!result.contains("jane.doe@example.com"));
        assert!(result.contains(".com"));
    }
}
