//! Pool store error types.

use super::models::RemotePoolId;
use thiserror::Error;

/// Pool store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// The pool id does not resolve on the remote service
    #[error("Pool {0} not found")]
    NotFound(RemotePoolId),

    /// Retries exhausted, or the service answered without a usable pool id
    #[error("Pool service unavailable after {attempts} attempt(s): {reason}")]
    Unavailable { attempts: u32, reason: String },

    /// The service refused the request; repeating it would not help
    #[error("Pool service rejected the request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// A pool reference could not be turned into an id
    #[error("Invalid pool reference: {0:?}")]
    InvalidReference(String),

    /// The HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

impl StoreError {
    /// Get a caller-safe message without upstream response bodies
    pub fn client_message(&self) -> String {
        match self {
            StoreError::NotFound(id) => format!("Pool {id} could not be found"),
            StoreError::Unavailable { .. } => {
                "The pool service is having issues right now, try again later".to_string()
            }
            StoreError::Rejected { .. } => "The pool service rejected the request".to_string(),
            StoreError::InvalidReference(_) => self.to_string(),
            StoreError::Client(_) => "Internal error".to_string(),
        }
    }
}

/// Result type for pool store operations
pub type StoreResult<T> = Result<T, StoreError>;
