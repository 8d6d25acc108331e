mod config;
mod models;
mod routes;
mod services;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::services::{
    fetcher::HttpFetcher,
    library::Library,
    profile_store::JsonFileProfileStore,
};

/// Application state shared across handlers
pub struct AppState {
    pub library: Library,
    pub start_time: Instant,
}

/// Build the HTTP router over the shared state
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health endpoints
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        .route("/ready", get(routes::health::ready))
        .route("/live", get(routes::health::live))
        // Profile endpoints
        .route(
            "/api/profiles",
            get(routes::profiles::list_profiles).post(routes::profiles::create_profile),
        )
        .route(
            "/api/profiles/:id",
            put(routes::profiles::update_profile).delete(routes::profiles::delete_profile),
        )
        // Library endpoints
        .route("/api/library/load/:id", post(routes::library::load_profile))
        .route("/api/library/unload", post(routes::library::unload))
        .route("/api/library/status", get(routes::library::get_status))
        .route("/api/library/channels", get(routes::library::get_channels))
        .route("/api/library/movies", get(routes::library::get_movies))
        .route("/api/library/series", get(routes::library::get_series))
        .route(
            "/api/library/series/:id",
            get(routes::library::get_series_detail),
        )
        // Player endpoints
        .route("/api/player", get(routes::player::now_playing))
        .route("/api/player/play", post(routes::player::play))
        .route("/api/player/stop", post(routes::player::stop))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "playlist_catalog_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    // Load configuration
    let config = Config::from_env();
    let port = config.port;

    tracing::info!("Starting Playlist Catalog Server v{}", env!("CARGO_PKG_VERSION"));

    let fetcher = HttpFetcher::new(
        &config.user_agent,
        config.fetch_timeout_ms,
        config.max_retries,
        config.max_playlist_size_mb,
    )?;
    tracing::info!("Playlist fetcher initialized");

    let store = JsonFileProfileStore::new(&config.profile_store_path);
    tracing::info!("Profile store: {}", config.profile_store_path);

    let library = Library::new(Arc::new(fetcher), Arc::new(store)).await;

    // Build application state
    let state = Arc::new(AppState {
        library,
        start_time: Instant::now(),
    });

    let app = build_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
