//! Test infrastructure for Marquee integration tests.
//!
//! Provides a `TestApp` wrapper around `axum_test::TestServer` backed by a
//! scripted in-memory catalog, so tests can control what the metadata
//! service returns and inspect what was asked of it.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use marquee::config::Config;
use marquee::error::{AppError, Result};
use marquee::services::{
    CatalogClient, CatalogPage, ExploreParams, Genre, ItemDetail, ItemSummary, MediaKind,
};
use marquee::AppState;

/// Scripted catalog used in place of TMDB.
///
/// Explore pages contain `items_per_page` items whose ids start at
/// `page * 100`, so tests can tell pages apart.
pub struct FakeCatalog {
    state: Mutex<FakeState>,
}

struct FakeState {
    total_pages: u32,
    items_per_page: usize,
    fail_explore: bool,
    fail_genres: bool,
    fail_trending: bool,
    fail_search: bool,
    explore_delays: HashMap<u32, Duration>,
    explore_calls: Vec<(MediaKind, ExploreParams)>,
    search_calls: Vec<(MediaKind, String, u32)>,
}

impl Default for FakeCatalog {
    fn default() -> Self {
        Self {
            state: Mutex::new(FakeState {
                total_pages: 10,
                items_per_page: 3,
                fail_explore: false,
                fail_genres: false,
                fail_trending: false,
                fail_search: false,
                explore_delays: HashMap::new(),
                explore_calls: Vec::new(),
                search_calls: Vec::new(),
            }),
        }
    }
}

impl FakeCatalog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_total_pages(&self, total_pages: u32) {
        self.state.lock().unwrap().total_pages = total_pages;
    }

    pub fn set_items_per_page(&self, count: usize) {
        self.state.lock().unwrap().items_per_page = count;
    }

    pub fn fail_explore(&self, fail: bool) {
        self.state.lock().unwrap().fail_explore = fail;
    }

    pub fn fail_genres(&self, fail: bool) {
        self.state.lock().unwrap().fail_genres = fail;
    }

    pub fn fail_trending(&self, fail: bool) {
        self.state.lock().unwrap().fail_trending = fail;
    }

    pub fn fail_search(&self, fail: bool) {
        self.state.lock().unwrap().fail_search = fail;
    }

    /// Makes explore requests for `page` take `delay`.
    pub fn delay_page(&self, page: u32, delay: Duration) {
        self.state.lock().unwrap().explore_delays.insert(page, delay);
    }

    pub fn explore_calls(&self) -> Vec<(MediaKind, ExploreParams)> {
        self.state.lock().unwrap().explore_calls.clone()
    }

    pub fn last_explore(&self) -> (MediaKind, ExploreParams) {
        self.explore_calls()
            .pop()
            .expect("no explore request was made")
    }

    pub fn search_calls(&self) -> Vec<(MediaKind, String, u32)> {
        self.state.lock().unwrap().search_calls.clone()
    }
}

pub fn summary(kind: MediaKind, id: u64) -> ItemSummary {
    ItemSummary {
        id,
        kind,
        title: format!("Title {}", id),
        release_date: Some("2021-06-01".to_string()),
        poster_url: Some(format!("https://image.tmdb.org/t/p/w342/{}.jpg", id)),
        popularity: 10.0,
        vote_average: 7.3,
        vote_count: 120,
        genre_ids: vec![28],
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn trending(&self, kind: MediaKind) -> Result<Vec<ItemSummary>> {
        if self.state.lock().unwrap().fail_trending {
            return Err(AppError::ServiceUnavailable("trending".to_string()));
        }
        let base = match kind {
            MediaKind::Movie => 1000,
            MediaKind::Tv => 2000,
        };
        Ok((1..=3).map(|i| summary(kind, base + i)).collect())
    }

    async fn explore(&self, kind: MediaKind, params: &ExploreParams) -> Result<CatalogPage> {
        let (delay, fail, total_pages, items_per_page) = {
            let mut state = self.state.lock().unwrap();
            state.explore_calls.push((kind, params.clone()));
            (
                state.explore_delays.get(&params.page).copied(),
                state.fail_explore,
                state.total_pages,
                state.items_per_page,
            )
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if fail {
            return Err(AppError::Timeout("explore".to_string()));
        }

        let first = u64::from(params.page) * 100;
        Ok(CatalogPage {
            results: (0..items_per_page as u64)
                .map(|i| summary(kind, first + i))
                .collect(),
            page: params.page,
            total_pages: if items_per_page == 0 { 0 } else { total_pages },
            total_results: u64::from(total_pages) * items_per_page as u64,
        })
    }

    async fn genres(&self, _kind: MediaKind) -> Result<Vec<Genre>> {
        if self.state.lock().unwrap().fail_genres {
            return Err(AppError::ServiceUnavailable("genres".to_string()));
        }
        Ok(vec![
            Genre { id: 28, name: "Action".to_string() },
            Genre { id: 12, name: "Adventure".to_string() },
            Genre { id: 18, name: "Drama".to_string() },
        ])
    }

    async fn detail(&self, kind: MediaKind, id: u64) -> Result<ItemDetail> {
        if id == 404 {
            return Err(AppError::NotFound(format!("/{}/{}", kind.api_segment(), id)));
        }
        if id == 500 {
            return Err(AppError::Internal("boom".to_string()));
        }
        Ok(ItemDetail {
            id,
            kind,
            title: "Fight Club".to_string(),
            release_date: Some("1999-10-15".to_string()),
            poster_url: Some("https://image.tmdb.org/t/p/w500/fc.jpg".to_string()),
            popularity: 61.4,
            vote_average: 8.4,
            vote_count: 26280,
            genres: vec![Genre { id: 18, name: "Drama".to_string() }],
            runtime: Some(139),
            tagline: Some("Mischief. Mayhem. Soap.".to_string()),
            overview: "An insomniac office worker and a soap salesman form an underground fight club.".to_string(),
        })
    }

    async fn search(&self, kind: MediaKind, query: &str, page: u32) -> Result<CatalogPage> {
        let fail = {
            let mut state = self.state.lock().unwrap();
            state.search_calls.push((kind, query.to_string(), page));
            state.fail_search
        };
        if fail {
            return Err(AppError::ServiceUnavailable("search".to_string()));
        }
        if query == "nothing" {
            return Ok(CatalogPage::empty());
        }
        Ok(CatalogPage {
            results: vec![summary(kind, 42), summary(kind, 43)],
            page,
            total_pages: 4,
            total_results: 80,
        })
    }
}

/// Test application wrapper around axum_test::TestServer.
pub struct TestApp {
    server: TestServer,
    catalog: Arc<FakeCatalog>,
}

impl TestApp {
    /// Create a new test application with default configuration.
    pub async fn new() -> Self {
        Self::with_config(Config::default()).await
    }

    /// Create a test application with a specific configuration.
    pub async fn with_config(config: Config) -> Self {
        let catalog = FakeCatalog::new();
        let state = AppState::new(config, catalog.clone());

        // Build router identical to main.rs
        let app = marquee::router(state);
        let server = TestServer::new(app).expect("Failed to create test server");

        Self { server, catalog }
    }

    /// Get a reference to the test server.
    pub fn server(&self) -> &TestServer {
        &self.server
    }

    /// Get a reference to the scripted catalog.
    pub fn catalog(&self) -> &FakeCatalog {
        &self.catalog
    }
}

/// Header marking a request as issued by HTMX.
pub fn htmx() -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("hx-request"),
        HeaderValue::from_static("true"),
    )
}

/// Header carrying a listing page instance id.
pub fn instance(id: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-page-instance"),
        HeaderValue::from_str(id).expect("Invalid instance id"),
    )
}

/// Pulls the page instance id out of a rendered listing.
pub fn instance_id(html: &str) -> String {
    let marker = "\"X-Page-Instance\": \"";
    let start = html.find(marker).expect("listing has no instance id") + marker.len();
    html[start..start + 36].to_string()
}

/// Value of a response header, if present.
pub fn header(response: &axum_test::TestResponse, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
