//! # sealbin-core
//!
//! Core types and pure functions shared across all Sealbin crates.
//!
//! This crate provides:
//! - `ItemId` content-derived identifiers and the `fingerprint` function
//! - `Paste` and `Comment` data types with their on-disk serialization
//! - HMAC-based delete tokens
//! - `SealbinError` for unified error handling
//!
//! Payloads are opaque to the engine: clients encrypt before posting, and
//! nothing in this crate ever inspects paste contents beyond hashing them.

pub mod error;
pub mod id;
pub mod token;
pub mod types;

// Re-export commonly used types
pub use error::{SealbinError, SealbinResult};
pub use id::{fingerprint, ItemId};
pub use types::{Comment, Paste, PasteOptions};
