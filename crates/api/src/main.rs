use anyhow::Context;
use tokio_util::sync::CancellationToken;

use jobstatus_api::app;
use jobstatus_api::config::ApiConfig;
use jobstatus_infra::StoreConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    jobstatus_observability::init();

    let api_config = ApiConfig::from_env().context("invalid API configuration")?;
    let store_config = StoreConfig::from_env().context("invalid store configuration")?;

    let shutdown = CancellationToken::new();
    let services = app::services::build_services(&api_config, &store_config, shutdown.clone())
        .await
        .context("failed to connect to the job store")?;

    let router = app::build_app(services, api_config.request_timeout);

    let listener = tokio::net::TcpListener::bind(api_config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", api_config.bind_addr()))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("received ctrl-c, shutting down");
            }
            shutdown.cancel();
        })
        .await
        .context("server error")?;

    Ok(())
}
