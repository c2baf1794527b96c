//! Unified error types for `PermitDesk`.
//!
//! Every failure a caller can observe falls into one of four business
//! categories (not found, forbidden, conflict, invalid request) plus the
//! infrastructure variants. Validation and authorization failures carry a
//! club-/permit-specific message and are never retried automatically.

use thiserror::Error;

/// All errors that can occur in the application
#[derive(Debug, Error)]
pub enum Error {
    /// A referenced club, member, permit, option, period or instance does
    /// not exist or does not belong to the stated parent.
    #[error("Not found: {what}")]
    NotFound {
        /// Description of the missing thing
        what: String,
    },

    /// The acting buyer is neither the recipient member nor their manager,
    /// or a reservation belongs to a different buyer.
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Who could not act for whom
        message: String,
    },

    /// No available instance remains, an instance is not in the expected
    /// state, or order numbering lost every retry.
    #[error("Conflict: {message}")]
    Conflict {
        /// What state the request collided with
        message: String,
    },

    /// Malformed input: empty permit list, inverted number range, etc.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// What was malformed
        message: String,
    },

    /// Bad or unparseable configuration.
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong with the configuration
        message: String,
    },

    /// Errors bubbled up from `SeaORM`.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Errors bubbled up from the filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for [`Error::NotFound`].
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Shorthand for [`Error::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Shorthand for [`Error::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Shorthand for [`Error::InvalidRequest`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
