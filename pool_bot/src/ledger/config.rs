//! Spreadsheet connection configuration.

use super::errors::{LedgerError, LedgerResult};
use std::env;

/// Google Sheets connection settings.
///
/// Token acquisition and refresh happen outside this crate; the access token
/// is supplied as-is.
#[derive(Clone)]
pub struct SheetsConfig {
    /// Sheets API base, e.g. `https://sheets.googleapis.com/v4/spreadsheets`
    pub api_base: String,

    /// Spreadsheet id from the sheet URL
    pub spreadsheet_id: String,

    /// OAuth bearer token with the spreadsheets scope
    pub access_token: String,

    /// Numeric sheet id of the pools tab, needed for cell formatting
    pub pools_tab_id: i64,

    /// Per-request HTTP timeout in seconds
    pub request_timeout_secs: u64,
}

impl SheetsConfig {
    /// Default Sheets API base
    pub const DEFAULT_API_BASE: &'static str = "https://sheets.googleapis.com/v4/spreadsheets";

    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `SPREADSHEET_ID` (required)
    /// - `SHEETS_ACCESS_TOKEN` (required)
    /// - `POOLS_TAB_ID` (required, integer)
    /// - `SHEETS_API_BASE` (default: Google's v4 endpoint)
    /// - `SHEETS_TIMEOUT_SECS` (default: 10)
    ///
    /// # Errors
    ///
    /// * `LedgerError::Schema` - A required variable is missing or malformed
    pub fn from_env() -> LedgerResult<Self> {
        let required = |key: &str| {
            env::var(key)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| LedgerError::Schema(format!("{key} must be set")))
        };

        let pools_tab_id = required("POOLS_TAB_ID")?
            .trim()
            .parse()
            .map_err(|_| LedgerError::Schema("POOLS_TAB_ID must be an integer".to_string()))?;

        Ok(Self {
            api_base: env::var("SHEETS_API_BASE")
                .unwrap_or_else(|_| Self::DEFAULT_API_BASE.to_string()),
            spreadsheet_id: required("SPREADSHEET_ID")?,
            access_token: required("SHEETS_ACCESS_TOKEN")?,
            pools_tab_id,
            request_timeout_secs: env::var("SHEETS_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        })
    }
}

impl std::fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("api_base", &self.api_base)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("access_token", &"<redacted>")
            .field("pools_tab_id", &self.pools_tab_id)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}
