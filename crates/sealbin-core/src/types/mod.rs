//! Core data types for pastes and comments.
//!
//! Field names on the serialized forms are a cross-component contract with
//! the request-handling layer and mirror the on-disk JSON layout.

pub mod comment;
pub mod paste;

// Re-export main types
pub use comment::Comment;
pub use paste::{Paste, PasteOptions};
