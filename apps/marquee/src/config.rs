//! Configuration module for Marquee.
//!
//! Loads configuration from `config.toml` with environment variable overrides.

use config::{Config as ConfigLoader, Environment, File};
use serde::Deserialize;

use crate::error::AppError;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub listing: ListingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins (empty means same-origin only)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// TMDB API configuration
#[derive(Clone, Deserialize)]
pub struct TmdbConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_tmdb_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    /// Poster size used for cards in grids and carousels
    #[serde(default = "default_poster_size")]
    pub poster_size: String,
    /// Poster size used on detail pages
    #[serde(default = "default_detail_poster_size")]
    pub detail_poster_size: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// Trending window: "day" or "week"
    #[serde(default = "default_trending_window")]
    pub trending_window: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Custom Debug implementation to avoid exposing api_key
impl std::fmt::Debug for TmdbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("image_base_url", &self.image_base_url)
            .field("poster_size", &self.poster_size)
            .field("detail_poster_size", &self.detail_poster_size)
            .field("language", &self.language)
            .field("trending_window", &self.trending_window)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_tmdb_base_url(),
            image_base_url: default_image_base_url(),
            poster_size: default_poster_size(),
            detail_poster_size: default_detail_poster_size(),
            language: default_language(),
            trending_window: default_trending_window(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_poster_size() -> String {
    "w342".to_string()
}

fn default_detail_poster_size() -> String {
    "w500".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_trending_window() -> String {
    "week".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Listing page configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ListingConfig {
    /// Pagination never offers more pages than this (TMDB refuses page > 500)
    #[serde(default = "default_max_display_pages")]
    pub max_display_pages: u32,
    /// Idle page instances are dropped after this many seconds
    #[serde(default = "default_instance_ttl_secs")]
    pub instance_ttl_secs: u64,
    /// Upper bound on live page instances; the least recently used go first
    #[serde(default = "default_max_instances")]
    pub max_instances: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            max_display_pages: default_max_display_pages(),
            instance_ttl_secs: default_instance_ttl_secs(),
            max_instances: default_max_instances(),
        }
    }
}

fn default_max_display_pages() -> u32 {
    500
}

fn default_instance_ttl_secs() -> u64 {
    1800
}

fn default_max_instances() -> usize {
    10_000
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. Default values
    /// 2. `config.toml` in current directory (optional)
    /// 3. Environment variables with `MARQUEE_` prefix
    ///
    /// Environment variables use double underscore for nesting:
    /// - `MARQUEE_SERVER__PORT=9000` sets `server.port`
    /// - `MARQUEE_TMDB__API_KEY=...` sets `tmdb.api_key`
    pub fn load() -> Result<Self, AppError> {
        Self::load_from("config.toml")
    }

    /// Load configuration from a specific file path.
    pub fn load_from(config_path: &str) -> Result<Self, AppError> {
        let config = ConfigLoader::builder()
            // Start with defaults
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("tmdb.base_url", default_tmdb_base_url())?
            .set_default("tmdb.language", default_language())?
            .set_default("listing.max_display_pages", 500)?
            // Add config file (optional)
            .add_source(File::with_name(config_path).required(false))
            // Override with environment variables
            // MARQUEE_SERVER__PORT=9000 -> server.port = 9000
            .add_source(
                Environment::with_prefix("MARQUEE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), AppError> {
        if self.tmdb.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
            tracing::warn!("TMDB API key not configured - catalog requests will fail");
        }

        if !matches!(self.tmdb.trending_window.as_str(), "day" | "week") {
            return Err(AppError::Config(config::ConfigError::Message(format!(
                "tmdb.trending_window must be \"day\" or \"week\", got {:?}",
                self.tmdb.trending_window
            ))));
        }

        if self.listing.max_display_pages == 0 {
            return Err(AppError::Config(config::ConfigError::Message(
                "listing.max_display_pages must be at least 1".to_string(),
            )));
        }

        Ok(())
    }

    /// Get the server socket address
    pub fn server_addr(&self) -> std::net::SocketAddr {
        use std::net::{IpAddr, Ipv4Addr, SocketAddr};

        let ip: IpAddr = self.server.host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid host '{}', using 0.0.0.0", self.server.host);
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        });
        SocketAddr::new(ip, self.server.port)
    }
}
