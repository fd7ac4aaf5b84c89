//! Error types and result aliases for Sealbin operations.
//!
//! Provides a unified error type that covers all error conditions across the
//! Sealbin crates. The taxonomy distinguishes "the item does not exist"
//! (`NotFound`), "the item exists but cannot be decoded" (`Corrupt`), and
//! plain filesystem failures (`Io`); token problems split into "malformed"
//! (`InvalidToken`, a caller error) and "wrong" (`WrongToken`, a normal
//! authorization refusal).

use thiserror::Error;

/// Unified error type for all Sealbin operations
#[derive(Error, Debug)]
pub enum SealbinError {
    // Configuration errors
    #[error("Shard depth {depth} is too large for {id_len}-character identifiers")]
    DepthTooLarge { depth: usize, id_len: usize },

    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    // Item errors
    #[error("Item '{id}' not found")]
    NotFound { id: String },

    #[error("Item '{id}' is corrupt: {message}")]
    Corrupt { id: String, message: String },

    #[error("Invalid identifier '{id}'")]
    InvalidId { id: String },

    // Delete token errors
    #[error("Malformed delete token '{token}'")]
    InvalidToken { token: String },

    #[error("Wrong delete token for paste '{id}'")]
    WrongToken { id: String },

    // Comment errors
    #[error("Discussion is disabled for paste '{id}'")]
    CommentsDisabled { id: String },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for Sealbin operations
pub type SealbinResult<T> = Result<T, SealbinError>;

impl SealbinError {
    /// Create an IO error from std::io::Error
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a NotFound error for an identifier
    pub fn not_found(id: impl ToString) -> Self {
        Self::NotFound {
            id: id.to_string(),
        }
    }

    /// True when the error means the item simply does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        let err = SealbinError::not_found("d9441ab2ce8126457ecd");
        assert!(err.is_not_found());

        let err = SealbinError::io(
            "write failed",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_error_messages() {
        let err = SealbinError::DepthTooLarge { depth: 10, id_len: 20 };
        assert!(err.to_string().contains("depth 10"));

        let err = SealbinError::WrongToken {
            id: "d9441ab2ce8126457ecd".to_string(),
        };
        assert!(err.to_string().contains("d9441ab2ce8126457ecd"));
    }
}
