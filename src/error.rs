//! Error types for the date extraction library.
//!
//! Network failures and malformed markup never show up here: they degrade to
//! `None`. Only misuse of the API by the caller is reported as an error.

use thiserror::Error;

/// Result type alias for pagedate operations
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that can be returned to the caller
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The byte budget for a partial fetch was zero
    #[error("Byte budget must be greater than zero")]
    InvalidByteBudget,

    /// The request timeout was zero
    #[error("Timeout must be greater than zero")]
    InvalidTimeout,

    /// A caller-supplied request header is not a valid HTTP header
    #[error("Invalid request header: {0}")]
    InvalidHeader(String),

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}
