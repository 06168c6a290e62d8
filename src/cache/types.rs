//! Cache key construction

use sha2::{Digest, Sha256};

/// Longest normalized text prefix that participates in the key
const KEY_PREFIX_CHARS: usize = 200;

/// Key identifying one cached response
///
/// Two texts that agree on their normalized 200-character prefix share a key
/// for the same operation and tag; the bound keeps hashing cheap for large
/// selections.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build a key from the operation, level/length tag, and input text
    pub fn new(operation: &str, tag: &str, text: &str) -> Self {
        let normalized = normalize(text);
        let mut hasher = Sha256::new();
        hasher.update(operation.as_bytes());
        hasher.update(b"\0");
        hasher.update(tag.as_bytes());
        hasher.update(b"\0");
        hasher.update(normalized.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    /// The hex digest backing this key
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Lowercase, collapse whitespace runs, and bound the length
fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(KEY_PREFIX_CHARS)
        .collect()
}
