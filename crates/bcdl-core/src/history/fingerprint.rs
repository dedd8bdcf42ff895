//! Deterministic (title, format) digest used as the history key.

use sha2::{Digest, Sha256};
use std::fmt;

use crate::format::FileType;

/// Lowercase hex SHA-256 of `title` followed by the format's wire identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wraps a line read back from the history file. Surrounding whitespace
    /// is dropped; empty lines yield `None`.
    pub(crate) fn from_line(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Fingerprint(trimmed.to_string()))
        }
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the fingerprint for one album in one format.
pub fn fingerprint(title: &str, file_type: FileType) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update(file_type.as_str().as_bytes());
    Fingerprint(hex::encode(hasher.finalize()))
}
