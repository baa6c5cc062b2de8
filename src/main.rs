//! Bookshelf Server - book catalog REST API

use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookshelf_server::{
    api,
    config::{AppConfig, LoggingConfig},
    repository::{self, SqliteBookStore},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    init_tracing(&config.logging);

    tracing::info!("Starting Bookshelf Server v{}", env!("CARGO_PKG_VERSION"));

    let pool = repository::connect(&config.database).await?;
    tracing::info!("Connected to database {}", config.database.url);

    repository::init_schema(&pool).await?;
    tracing::info!("Database schema ready");

    let state = AppState::new(Arc::new(SqliteBookStore::new(pool)));
    let app = api::create_router(state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    tracing::info!("Server listening on http://{}", addr);
    log_endpoints();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("bookshelf_server={},tower_http=debug", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn log_endpoints() {
    for (method, path, description) in [
        ("GET", "/books", "List all books"),
        ("POST", "/books", "Create a book"),
        ("GET", "/books/{id}", "Get one book"),
        ("PUT", "/books/{id}", "Update a book"),
        ("DELETE", "/books/{id}", "Delete a book"),
        ("GET", "/swagger-ui", "API documentation"),
    ] {
        tracing::info!("  {:<7} {:<12} {}", method, path, description);
    }
}
