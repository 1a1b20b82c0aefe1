use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, Method};
use common::synonym::source_from_config;
use common::uploader::Uploader;
use server::config::AppConfig;
use server::database::init_db;
use server::state::AppState;
use server::store::SqlContentStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{Level, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;
    info!(
        upload_root = %config.storage.upload_root.display(),
        synonyms = config.synonyms.enabled,
        "Configuration loaded"
    );

    let db = init_db(&config.database.url).await?;
    info!("Database connected and schema synced");

    let store = Arc::new(SqlContentStore::new(db));
    let synonyms = source_from_config(&config.synonyms)?;
    let uploader = Uploader::new(store.clone(), synonyms, config.storage.upload_root.clone());

    let cors = setup_cors(&config)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        config: Arc::new(config),
        store,
        uploader: Arc::new(uploader),
    };

    let app = server::build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// CORS for the JSON API. An empty origin list allows no cross-origin
/// callers; `"*"` allows all of them.
fn setup_cors(config: &AppConfig) -> anyhow::Result<CorsLayer> {
    let cors = &config.server.cors;
    let layer = if cors.allow_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins");
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = cors
            .allow_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new().allow_origin(origins)
    };

    Ok(layer
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(Duration::from_secs(cors.max_age)))
}
