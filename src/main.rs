use anyhow::Result;
use iban_rust_ws::{
    config::{ConfigError, ServiceConfig, USAGE},
    create_app_router, monitoring,
    state::AppState,
};
use std::{net::SocketAddr, sync::Arc};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install signal handler: {}", e);
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

    info!("signal received, starting graceful shutdown");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Tuning overrides may live in .env; missing file is fine
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match ServiceConfig::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(ConfigError::Usage) => {
            println!("{}", USAGE);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    monitoring::init_monitoring();

    let app_state = AppState::new(&config).await?;
    info!("🚀 Application state initialized (metrics: {})", app_state.validation_service.metrics().strategy());

    let app = create_app_router(Arc::new(app_state));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
