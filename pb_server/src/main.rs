//! League pool bot server.
//!
//! Wires the pool-hosting client and the ledger into a pack tracker and
//! serves it over HTTP for the chat front end.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Error;
use log::{info, warn};
use pb_server::{
    api,
    config::{LedgerBackend, ServerConfig},
    logging, metrics,
};
use pico_args::Arguments;
use pool_bot::{
    HttpPoolStore, InMemoryLedger, Ledger, PackTracker, SheetsLedger, ledger::LedgerSchema,
};

const HELP: &str = "\
Run the league pool bot server

USAGE:
  pb_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:6970]
  --store-url  URL         Pool service endpoint       [default: env POOL_STORE_URL or https://sealeddeck.tech/api/pools]
  --ledger     BACKEND     sheets or memory            [default: env LEDGER_BACKEND or sheets]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SPREADSHEET_ID           League spreadsheet id
  SHEETS_ACCESS_TOKEN      OAuth bearer token for the Sheets API
  POOLS_TAB_ID             Numeric gid of the Pools tab
  METRICS_BIND             Prometheus listener (disabled when unset)
  OWNER_LOCK_TIMEOUT_SECS  How long an update waits for the owner's lock
  (See .env.example for all configuration options)
";

struct Args {
    bind: Option<SocketAddr>,
    store_url: Option<String>,
    ledger: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        bind: pargs.opt_value_from_str("--bind")?,
        store_url: pargs.opt_value_from_str("--store-url")?,
        ledger: pargs.opt_value_from_str("--ledger")?,
    };

    logging::init();

    let config = ServerConfig::from_env(args.bind, args.store_url, args.ledger)?;
    config.validate()?;
    info!("Starting pool bot server at {}", config.bind);

    if let Some(metrics_bind) = config.metrics_bind {
        metrics::init_metrics(metrics_bind).map_err(|e| anyhow::anyhow!(e))?;
        info!("Prometheus metrics on http://{}/metrics", metrics_bind);
    }

    info!("Pool service: {}", config.store.base_url);
    let store = Arc::new(
        HttpPoolStore::new(config.store.clone())
            .map_err(|e| anyhow::anyhow!("Failed to build pool service client: {}", e))?,
    );

    let ledger = open_ledger(&config.ledger, config.schema.clone()).await?;
    let tracker = Arc::new(PackTracker::new(
        store,
        ledger.clone(),
        config.tracker.clone(),
    ));

    let app = api::create_router(api::AppState { tracker, ledger });

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", config.bind, e))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Shutting down server...");

    Ok(())
}

/// Build the configured ledger backend
async fn open_ledger(
    backend: &LedgerBackend,
    schema: LedgerSchema,
) -> Result<Arc<dyn Ledger>, Error> {
    match backend {
        LedgerBackend::Sheets(sheets) => {
            info!("Ledger: spreadsheet {}", sheets.spreadsheet_id);
            let ledger = SheetsLedger::new(sheets.clone(), schema)
                .map_err(|e| anyhow::anyhow!("Failed to open ledger: {}", e))?;

            // The spreadsheet may come back later; serve anyway
            if let Err(e) = ledger.health_check().await {
                warn!("Ledger is not reachable yet: {}", e);
            }
            Ok(Arc::new(ledger))
        }
        LedgerBackend::Memory => {
            warn!("Using the in-memory ledger; nothing will be persisted");
            Ok(Arc::new(InMemoryLedger::new(Vec::new())))
        }
    }
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
