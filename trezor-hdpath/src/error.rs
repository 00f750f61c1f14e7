//! HD path error types

use thiserror::Error;

/// Result type for HD path operations
pub type HdPathResult<T> = std::result::Result<T, HdPathError>;

/// HD path error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HdPathError {
    /// Path text or derived index is not a valid BIP-32 path
    #[error("Invalid HD path '{path}': {reason}")]
    InvalidPathFormat {
        /// The offending path text
        path: String,
        /// What is wrong with it
        reason: String,
    },
}

impl HdPathError {
    pub(crate) fn invalid(path: impl Into<String>, reason: impl Into<String>) -> Self {
        HdPathError::InvalidPathFormat {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
