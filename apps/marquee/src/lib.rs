//! Marquee Library
//!
//! Movie and TV discovery site backed by the TMDB catalog.
//! This library exposes modules for use in integration tests.

use axum::{response::Json, routing::get, Router};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

pub mod api;
pub mod config;
pub mod error;
pub mod response;
pub mod services;
pub mod static_files;
pub mod views;

use config::Config;
use services::{CatalogClient, PageRegistry};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<dyn CatalogClient>,
    pub pages: Arc<PageRegistry>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: Config, catalog: Arc<dyn CatalogClient>) -> Self {
        let pages = Arc::new(PageRegistry::from_config(&config.listing));
        Self {
            config: Arc::new(config),
            catalog,
            pages,
            start_time: Instant::now(),
        }
    }

    /// Get a reference to the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get a reference to the catalog client.
    pub fn catalog(&self) -> &dyn CatalogClient {
        self.catalog.as_ref()
    }

    /// Get a reference to the listing page registry.
    pub fn pages(&self) -> &PageRegistry {
        &self.pages
    }

    /// Get the start time of the application.
    pub fn start_time(&self) -> Instant {
        self.start_time
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub message: String,
    pub version: String,
    pub uptime_seconds: u64,
}

pub async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "Marquee is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time().elapsed().as_secs(),
    })
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/static/*path", get(static_files::serve_static))
        .route("/health", get(health_check))
        .nest("/api", api::routes())
        .merge(views::routes())
        .fallback(views::not_found)
        .with_state(state)
}
