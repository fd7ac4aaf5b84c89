//! The `Comment` type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{fingerprint, ItemId};

/// A comment attached to a paste's discussion subtree.
///
/// `parent` forms a tree of replies through plain identifiers. The store
/// keeps only the pointer: the parent is checked to exist at write time,
/// but the tree is not validated beyond that and callers must not create
/// cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Content fingerprint of `data`
    pub id: ItemId,
    /// Opaque, client-encrypted payload
    pub data: String,
    /// Comment author (opaque to the engine)
    pub author: String,
    /// Creation date
    pub postdate: DateTime<Utc>,
    /// Enable syntax highlighting
    pub highlight: bool,
    /// Parent comment, if this is a reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ItemId>,
}

impl Comment {
    /// Create a new comment, optionally as a reply to `parent`.
    pub fn new(data: String, author: String, parent: Option<ItemId>) -> Self {
        Self {
            id: fingerprint(data.as_bytes()),
            data,
            author,
            postdate: Utc::now(),
            highlight: false,
            parent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_comment_id_is_content_derived() {
        let comment = Comment::new("Awesome paste".to_string(), "alice".to_string(), None);
        assert_eq!(comment.id.as_str(), "d9441ab2ce8126457ecd");
        assert!(comment.parent.is_none());
    }

    #[test]
    fn test_reply_keeps_parent_pointer() {
        let parent = Comment::new("top".to_string(), "alice".to_string(), None);
        let reply = Comment::new(
            "reply".to_string(),
            "bob".to_string(),
            Some(parent.id.clone()),
        );
        assert_eq!(reply.parent.as_ref(), Some(&parent.id));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let comment = Comment::new("data".to_string(), "carol".to_string(), None);
        let json = serde_json::to_string(&comment).unwrap();
        // Top-level comments serialize without a parent field at all
        assert!(!json.contains("parent"));

        let loaded: Comment = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, comment);
    }
}
