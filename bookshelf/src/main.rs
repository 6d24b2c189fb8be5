use anyhow::Context;
use tokio::{net::TcpListener, signal};
use tracing::{error, info, warn};

use bookshelf::{backend::open_store, config::Config, http, service::BookService, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    telemetry::init_tracing(&config.log);

    let store = open_store(&config.store)
        .await
        .context("failed to open document store")?;

    // Requests fail with 500 until the store becomes reachable
    match store.ping().await {
        Ok(()) => info!("database connected successfully"),
        Err(err) => warn!(error = %err, "database is not reachable, serving anyway"),
    }

    let service = BookService::new(store);

    let listener = TcpListener::bind((config.server.host.as_str(), config.server.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.server.host, config.server.port))?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, http::router(service.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    service
        .shutdown()
        .await
        .context("failed to shut down document store")?;
    info!("server shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, starting graceful shutdown"),
        _ = terminate => info!("received SIGTERM, starting graceful shutdown"),
    }
}
