//! Filesystem persistence for pastes and comments.
//!
//! Items live under a shard-depth hierarchy of two-character hex
//! directories; each paste's discussion subtree is a sibling directory
//! carrying a `_` suffix, holding one file per comment.

pub mod items;
pub mod layout;

// Re-export main types
pub use items::ItemStore;
pub use layout::{discussion_path, resolve, DISCUSSION_SUFFIX};
