//! Navigation error types

use thiserror::Error;

/// Type alias for navigation results
pub type Result<T> = std::result::Result<T, NavigationError>;

/// Errors that can occur while canonicalizing or resolving navigation
#[derive(Error, Debug)]
pub enum NavigationError {
    /// Menu code, item path or segment is empty or cannot be represented
    #[error("Invalid identifier {value:?}: {reason}")]
    InvalidIdentifier {
        /// The raw value that was rejected
        value: String,
        /// Why the value was rejected
        reason: &'static str,
    },

    /// The request context was cancelled while filtering the tree
    #[error("Navigation resolution cancelled")]
    Cancelled,

    /// Navigation configuration could not be parsed
    #[error("Navigation configuration error: {message}")]
    Config {
        /// Parser message
        message: String,
    },
}

impl NavigationError {
    pub(crate) fn invalid(value: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidIdentifier {
            value: value.into(),
            reason,
        }
    }
}
