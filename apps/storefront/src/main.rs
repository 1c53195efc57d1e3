//! Storefront server entry point.
//!
//! ```bash
//! storefront                      # config from FURNISH_CONFIG or the platform dir
//! storefront --config ./dev.toml
//! RUST_LOG=debug storefront
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use furnish_db::{seed, Database, DbConfig};
use furnish_storefront::{create_app, init_tracing, AppState, StorefrontConfig};
use tokio::signal;
use tracing::{error, info};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" || arg == "-c" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = StorefrontConfig::load(config_path_from_args()).context("loading configuration")?;

    let db = Database::new(
        DbConfig::new(config.database.path.clone()).max_connections(config.database.max_connections),
    )
    .await
    .context("opening database")?;

    if config.database.seed_demo_data {
        let report = seed::seed_demo(&db, &config.pricing_policy())
            .await
            .context("seeding demo data")?;
        if report.products > 0 {
            info!(products = report.products, orders = report.orders, "Demo data loaded");
        }
    }

    let state = Arc::new(AppState::new(db.clone(), config.clone()));
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.server.bind_addr))?;

    info!(
        addr = %config.server.bind_addr,
        store = %config.store.name,
        "Storefront listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    db.close().await;
    info!("Server shut down gracefully");
    Ok(())
}
