use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;
use webtext::{
    app_state::AppState,
    config::{Config, LogFormat, StoreBackend},
    extractor::HttpContentExtractor,
    repositories::{InMemoryWebContentRepository, PgWebContentRepository, WebContentRepositoryTrait},
    routes::create_router,
};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info,sqlx=warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(config.log_format());

    let content_repo: Arc<dyn WebContentRepositoryTrait + Send + Sync> =
        match config.store_backend() {
            StoreBackend::Postgres => {
                let pool = PgPoolOptions::new()
                    .max_connections(10)
                    .connect(config.database_url())
                    .await
                    .context("Failed to connect to database")?;
                sqlx::migrate!("./migrations").run(&pool).await?;
                Arc::new(PgWebContentRepository::new(pool))
            }
            StoreBackend::Memory => Arc::new(InMemoryWebContentRepository::new()),
        };

    let state = AppState::new(content_repo, Arc::new(HttpContentExtractor::new()), &config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr()))?;
    info!(
        addr = config.bind_addr(),
        store = ?config.store_backend(),
        "webtext api listening"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
