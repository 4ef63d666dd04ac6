mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use vln_analysis::{build_providers, AnalysisSettings, ProviderConfig};

use crate::{
    api::{build_app, AppState},
    middleware::RateLimiter,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = vln_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let provider_config = ProviderConfig::from_app_config(&config);
    let providers = build_providers(&provider_config)?;
    if providers.is_empty() {
        tracing::warn!("no provider credentials configured; analyses will return demo data");
    }

    let state = AppState {
        providers: Arc::new(providers),
        descriptors: Arc::new(provider_config.descriptors()),
        settings: AnalysisSettings::from_app_config(&config),
        rate_limiter: RateLimiter::from_app_config(&config),
    };
    let app = build_app(state);

    tracing::info!(env = %config.env, addr = %config.bind_addr, "vln-server listening");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
