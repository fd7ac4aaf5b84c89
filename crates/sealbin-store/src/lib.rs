//! # sealbin-store
//!
//! The Sealbin storage engine: sharded filesystem persistence for pastes and
//! their threaded comments, an in-memory expiration index with a background
//! reaper, and a per-client antiflood cache.
//!
//! The filesystem is the authoritative state. The expiration index is a
//! derived cache rebuilt by a full tree walk at startup; index mutation and
//! filesystem mutation are two separate, non-atomic steps, and a crash
//! between them is repaired only by the next rebuild (eventual consistency
//! via restart).

pub mod antiflood;
pub mod engine;
pub mod index;
pub mod reaper;
pub mod store;

// Re-export main types
pub use antiflood::AntifloodCache;
pub use engine::Engine;
pub use index::{ExpirationIndex, IndexEntry};
pub use store::{ItemStore, DISCUSSION_SUFFIX};

use sealbin_core::error::SealbinError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, SealbinError>;
