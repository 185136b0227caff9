//! jsonvault-server - HTTP server binary.

use std::net::SocketAddr;

use jsonvault_core::{ServerConfig, Store};
use jsonvault_server::{create_server, AppState};
use tokio::signal;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive(Level::INFO.into())
                .add_directive("jsonvault_server=debug".parse().unwrap()),
        )
        .init();

    let config = ServerConfig::from_env();

    // The database file may live in a directory that does not exist yet.
    if let Some(parent) = std::path::Path::new(&config.db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut store = Store::open(&config.db_path)?;
    store.max_versions = config.max_versions;
    store.replace_interval = config.replace_interval();
    info!(
        db_path = %config.db_path,
        max_versions = config.max_versions,
        replace_interval_secs = config.replace_interval_secs,
        "Store opened"
    );

    let state = AppState::new(store);
    let app = create_server(state, config.request_timeout());

    let addr: SocketAddr = config.listen_addr().parse()?;
    info!("Starting jsonvault-server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Serve with graceful shutdown; remote addresses feed the request log.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        shutdown_signal().await;
        info!("Shutdown signal received");
    })
    .await?;

    info!("Server stopped cleanly");
    Ok(())
}
