use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod config;
mod customers;
mod error;
mod login;
mod reports;
mod rooms;
mod routes;

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    let config = config::load().context("loading configuration")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.tracing.filter)),
        )
        .init();
    let store = crm_db::create(&config.database);
    if let Err(err) = store.check_connection().await {
        tracing::error!("database unreachable, queries will fail until it is: {err}");
    }
    let credentials = Arc::new(login::StaticCredentials::new(
        config.login.user_name.clone(),
        config.login.password.clone(),
    ));
    let app_state = AppState { store, credentials };
    let app = routes::setup(app_state);
    let bind_to = format!("{}:{}", config.bind_address, config.bind_port);
    let listener = tokio::net::TcpListener::bind(&bind_to)
        .await
        .with_context(|| format!("binding listener to {bind_to}"))?;
    tracing::info!("Server running on {bind_to}");
    Ok(axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving application")?)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("unable to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[derive(Clone)]
struct AppState {
    store: crm_db::Store,
    credentials: Arc<dyn login::CredentialCheck>,
}
