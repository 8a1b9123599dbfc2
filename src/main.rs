use anyhow::Context;
use tracing_subscriber::EnvFilter;

use movie_recs_api::{
    api::{create_router, AppState},
    config::Config,
    data,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movie_recs_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        assets_dir = %config.assets_dir.display(),
        top_n = config.similarity_top_n,
        "Loading recommender data"
    );

    // Parsing and truncating the similarity matrix is CPU-bound
    let context = {
        let config = config.clone();
        tokio::task::spawn_blocking(move || data::load_context(&config))
            .await
            .context("Data loading task failed")??
    };

    let state = AppState::new(context, config.default_per_page);
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(addr = %addr, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
