//! Ledger error types.

use thiserror::Error;

/// Ledger errors
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Transport-level failure talking to the spreadsheet service
    #[error("Spreadsheet request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The spreadsheet service answered with an error status
    #[error("Spreadsheet API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The declared column layout is unusable
    #[error("Invalid ledger schema: {0}")]
    Schema(String),

    /// No player row at this position
    #[error("Row {0} not found in the pools tab")]
    RowNotFound(u32),

    /// A change-log operation name that is not one of the known four
    #[error("Unknown change operation: {0:?}")]
    UnknownOperation(String),
}

impl LedgerError {
    /// Get a caller-safe message that doesn't leak spreadsheet details
    pub fn client_message(&self) -> String {
        match self {
            LedgerError::Http(_) | LedgerError::Api { .. } => {
                "The league spreadsheet could not be reached".to_string()
            }
            LedgerError::Schema(_) => "The league spreadsheet layout is misconfigured".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
