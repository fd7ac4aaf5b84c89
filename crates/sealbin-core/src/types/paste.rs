//! The `Paste` type and its creation rules.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::Comment;
use crate::id::{fingerprint, ItemId};

/// Behavior flags chosen by the posting client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PasteOptions {
    /// Delete the paste after its first successful read
    pub burn: bool,
    /// Enable syntax highlighting in the view layer
    pub highlight: bool,
    /// Allow comments to be attached
    pub discussion: bool,
}

/// A stored paste.
///
/// The payload is opaque: clients encrypt before posting and the engine
/// never looks inside it. `comments` is populated only when a read
/// explicitly loads the discussion subtree; comments are persisted as
/// sibling files, never inline, so the field is skipped on serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paste {
    /// Content fingerprint of `data`, computed exactly once at creation
    pub id: ItemId,
    /// Opaque, client-encrypted payload
    pub data: String,
    /// Expiration date
    pub expire: DateTime<Utc>,
    /// Creation date
    pub postdate: DateTime<Utc>,
    /// Delete after first read
    pub burn: bool,
    /// Enable syntax highlighting
    pub highlight: bool,
    /// Whether discussions are enabled
    pub discussion: bool,
    /// Loaded comments, oldest first. Not persisted.
    #[serde(skip)]
    pub comments: Vec<Comment>,
}

impl Paste {
    /// Create a new paste expiring `expire_secs` seconds from now.
    pub fn new(data: String, options: PasteOptions, expire_secs: i64) -> Self {
        let postdate = Utc::now();
        Self {
            id: fingerprint(data.as_bytes()),
            data,
            expire: postdate + Duration::seconds(expire_secs),
            postdate,
            burn: options.burn,
            highlight: options.highlight,
            discussion: options.discussion,
            comments: Vec::new(),
        }
    }

    /// Check whether the paste has expired at `now`.
    pub fn has_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expire < now
    }

    /// Check whether the paste has expired.
    pub fn has_expired(&self) -> bool {
        self.has_expired_at(Utc::now())
    }
}
