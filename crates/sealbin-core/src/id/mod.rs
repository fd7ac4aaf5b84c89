//! Content-derived item identifiers.
//!
//! An identifier is the first 10 bytes of the SHA-1 digest of an item's
//! payload, hex-encoded to 20 lowercase characters. Identity is a content
//! fingerprint: two items with identical payloads collide to the same
//! identifier and the later write silently overwrites the earlier one's
//! storage location. This is an accepted trade-off, not a defect — callers
//! must treat identifiers as content fingerprints, never as serial numbers.

use crate::error::{SealbinError, SealbinResult};
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::fmt;

/// Number of digest bytes kept in an identifier
pub const ID_BYTES: usize = 10;

/// Length of an identifier in hex characters
pub const ID_LEN: usize = ID_BYTES * 2;

/// A content-derived identifier for a paste or comment
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Parse an identifier from its 20-character hex form.
    ///
    /// Accepts uppercase hex but normalizes to lowercase, so identifiers
    /// compare and resolve consistently regardless of how the boundary
    /// layer captured them.
    pub fn parse(s: &str) -> SealbinResult<Self> {
        if s.len() != ID_LEN || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(SealbinError::InvalidId { id: s.to_string() });
        }
        Ok(Self(s.to_ascii_lowercase()))
    }

    /// The hex form of the identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the content fingerprint of a payload.
///
/// Deterministic and pure; there is no error path.
pub fn fingerprint(payload: &[u8]) -> ItemId {
    let digest = Sha1::digest(payload);
    ItemId(hex::encode(&digest[..ID_BYTES]))
}
