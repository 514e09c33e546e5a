use anyhow::anyhow;
use axum::serve;
use dust_monitor_core::setup_logger;
use server::{app, build_app_state, get_config_info};
use slog::{error, info, Logger};
use std::{net::SocketAddr, str::FromStr};
use tokio::{net::TcpListener, signal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = get_config_info()?;
    let logger = setup_logger(cli.level.as_deref());

    let socket_addr = SocketAddr::from_str(&format!("{}:{}", cli.host(), cli.port()))
        .map_err(|e| anyhow!("invalid address: {}", e))?;

    let listener = TcpListener::bind(socket_addr)
        .await
        .map_err(|e| anyhow!("error binding to socket: {}", e))?;

    info!(logger, "Dust monitor starting...");
    info!(logger, "  Listen: http://{}", socket_addr);
    info!(logger, "  Upstream: {}", cli.fetch.base_url());
    info!(logger, "  Cache TTL: {}", cli.fetch.cache_ttl());

    let app_state = build_app_state(logger.clone(), &cli.fetch).map_err(|e| {
        error!(logger, "error building app: {}", e);
        e
    })?;

    serve(listener, app(app_state))
        .with_graceful_shutdown(shutdown_signal(logger.clone()))
        .await?;

    info!(logger, "Dust monitor stopped");
    Ok(())
}

async fn shutdown_signal(logger: Logger) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(logger, "failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(logger, "failed to install signal handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!(logger, "shutting down");
}
