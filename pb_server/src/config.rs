//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use pool_bot::{
    ledger::{LedgerSchema, SheetsConfig},
    store::PoolStoreConfig,
    tracker::TrackerConfig,
};
use std::net::SocketAddr;

/// Required variables of the Sheets backend, with setup hints
const SHEETS_REQUIRED: [(&str, &str); 3] = [
    ("SPREADSHEET_ID", "Copy it from the league spreadsheet URL"),
    (
        "SHEETS_ACCESS_TOKEN",
        "Issue an OAuth token with the spreadsheets scope",
    ),
    (
        "POOLS_TAB_ID",
        "Numeric gid of the Pools tab, shown in the tab URL",
    ),
];

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Prometheus listener, disabled when unset
    pub metrics_bind: Option<SocketAddr>,
    /// Pool-hosting service client settings
    pub store: PoolStoreConfig,
    /// Ledger backend
    pub ledger: LedgerBackend,
    /// Spreadsheet column layout
    pub schema: LedgerSchema,
    /// Tracker settings
    pub tracker: TrackerConfig,
}

/// Where player rows and the change log live
#[derive(Debug, Clone)]
pub enum LedgerBackend {
    /// The league spreadsheet
    Sheets(SheetsConfig),
    /// Empty in-process ledger for dry runs
    Memory,
}

impl LedgerBackend {
    /// Backend name as accepted by `LEDGER_BACKEND`
    pub fn name(&self) -> &'static str {
        match self {
            LedgerBackend::Sheets(_) => "sheets",
            LedgerBackend::Memory => "memory",
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `store_url_override` - Optional pools endpoint override (from CLI args)
    /// * `ledger_override` - Optional ledger backend override (from CLI args)
    ///
    /// # Returns
    ///
    /// * `Result<ServerConfig, ConfigError>` - Loaded configuration or error
    ///
    /// # Errors
    ///
    /// Returns error if required variables are missing or invalid
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        store_url_override: Option<String>,
        ledger_override: Option<String>,
    ) -> Result<Self, ConfigError> {
        let bind = match bind_override {
            Some(bind) => bind,
            None => parse_addr("SERVER_BIND")?.unwrap_or_else(default_bind),
        };
        let metrics_bind = parse_addr("METRICS_BIND")?;

        let mut store = PoolStoreConfig::from_env();
        if let Some(url) = store_url_override {
            store.base_url = url;
        }

        let backend = ledger_override
            .or_else(|| std::env::var("LEDGER_BACKEND").ok())
            .unwrap_or_else(|| "sheets".to_string());
        let ledger = match backend.trim().to_lowercase().as_str() {
            "sheets" => LedgerBackend::Sheets(sheets_from_env()?),
            "memory" => LedgerBackend::Memory,
            other => {
                return Err(ConfigError::Invalid {
                    var: "LEDGER_BACKEND".to_string(),
                    reason: format!("Unknown backend {other:?}, expected sheets or memory"),
                });
            }
        };

        Ok(ServerConfig {
            bind,
            metrics_bind,
            store,
            ledger,
            schema: LedgerSchema::from_env(),
            tracker: TrackerConfig::from_env(),
        })
    }

    /// Validate configuration after loading
    ///
    /// # Returns
    ///
    /// * `Result<(), ConfigError>` - Success or validation error
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (var, url) in [
            ("POOL_STORE_URL", &self.store.base_url),
            ("POOL_LINK_BASE", &self.store.link_base),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Invalid {
                    var: var.to_string(),
                    reason: format!("Must be an http(s) URL, got {url:?}"),
                });
            }
        }

        if self.store.max_attempts == 0 {
            return Err(ConfigError::Invalid {
                var: "POOL_STORE_MAX_ATTEMPTS".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        if self.store.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "POOL_STORE_TIMEOUT_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.tracker.lock_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                var: "OWNER_LOCK_TIMEOUT_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.metrics_bind == Some(self.bind) {
            return Err(ConfigError::Invalid {
                var: "METRICS_BIND".to_string(),
                reason: format!("Must differ from the server address ({})", self.bind),
            });
        }

        self.schema
            .validate()
            .map_err(|e| ConfigError::Invalid {
                var: "POOLS_COL_* / CHANGES_*".to_string(),
                reason: e.to_string(),
            })
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 6970))
}

/// Helper to parse an optional socket address variable
fn parse_addr(key: &str) -> Result<Option<SocketAddr>, ConfigError> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => {
            value
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| ConfigError::Invalid {
                    var: key.to_string(),
                    reason: format!("Not an IP:PORT address: {value:?}"),
                })
        }
        _ => Ok(None),
    }
}

fn sheets_from_env() -> Result<SheetsConfig, ConfigError> {
    for (var, hint) in SHEETS_REQUIRED {
        if std::env::var(var).map_or(true, |v| v.trim().is_empty()) {
            return Err(ConfigError::MissingRequired {
                var: var.to_string(),
                hint: hint.to_string(),
            });
        }
    }

    SheetsConfig::from_env().map_err(|e| ConfigError::Invalid {
        var: "LEDGER_BACKEND".to_string(),
        reason: e.to_string(),
    })
}
