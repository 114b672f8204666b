//! Application error types

use thiserror::Error;

use crate::encoder::EncodeError;
use crate::ports::ExecuteError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// The request could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// The executor refused the request.
    #[error("{0}")]
    Execute(#[from] ExecuteError),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
