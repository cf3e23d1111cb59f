use axum::http::{header, HeaderValue, Method};
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use marquee::{config::Config, services::TmdbClient, AppState};

fn init_tracing() {
    // RUST_LOG environment variable controls log levels
    // Default: debug for our crate, info for axum, warn for dependencies
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            EnvFilter::new("marquee=debug,listing_query=debug,tower_http=debug,axum=info,warn")
        });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Configure CORS based on allowed origins from config.
///
/// With no origins configured, only same-origin requests are allowed.
fn cors_layer(cors_origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600));

    if cors_origins.is_empty() {
        tracing::info!("CORS: No origins configured, same-origin only");
        return base;
    }

    let origins: Vec<HeaderValue> = cors_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}: {}", o, e);
                None
            }
        })
        .collect();
    tracing::info!("CORS: Allowing origins {:?}", cors_origins);
    base.allow_origin(AllowOrigin::list(origins))
}

#[tokio::main]
async fn main() {
    // Initialize tracing first so we can log configuration loading
    init_tracing();

    tracing::info!("Starting Marquee v{}", env!("CARGO_PKG_VERSION"));

    let config = match Config::load() {
        Ok(cfg) => {
            tracing::info!("Configuration loaded successfully");
            tracing::debug!("Server: {}:{}", cfg.server.host, cfg.server.port);
            tracing::debug!("TMDB: {:?}", cfg.tmdb);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let catalog = match TmdbClient::new_shared(&config.tmdb) {
        Ok(client) => {
            tracing::info!("TMDB client initialized");
            client
        }
        Err(e) => {
            tracing::error!("Failed to create TMDB client: {}", e);
            tracing::error!("Set MARQUEE_TMDB__API_KEY or tmdb.api_key in config.toml");
            std::process::exit(1);
        }
    };

    let addr = config.server_addr();
    let cors = cors_layer(&config.server.cors_origins);
    let state = AppState::new(config, catalog);

    let app = marquee::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
