use tracing_subscriber::EnvFilter;

use server::{AppState, Config, http, seed};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sea_orm=warn,sqlx=warn")),
        )
        .init();

    let state = AppState::new(Config::from_env()).await?;

    seed::ensure_seed_data(&state.db().pool, &mut rand::thread_rng()).await?;

    let config = state.config();
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on http://{addr}");

    axum::serve(listener, http::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install ctrl-c handler: {err}");
    }
    tracing::info!("shutting down");
}
