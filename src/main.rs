use polls_backend::{AppState, Config, build_router, logging};
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    logging::init_tracing();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = match AppState::from_config(&config).await {
        Ok(state) => state,
        Err(e) => {
            error!("failed to initialise database: {}", e);
            std::process::exit(1);
        }
    };

    let app = build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on {addr}");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("unable to bind {addr}: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("server error: {}", e);
    }

    info!("server shut down");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => {
                error!("failed to install terminate handler: {}", e);
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
}
