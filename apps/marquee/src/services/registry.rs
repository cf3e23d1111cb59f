//! In-memory store of live listing page instances.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::ListingConfig;
use crate::services::listing::ListingPage;

/// Shared handle to one page instance's state.
pub type PageHandle = Arc<Mutex<ListingPage>>;

struct Entry {
    page: PageHandle,
    last_seen: Instant,
}

/// Listing page instances keyed by the id handed to the browser.
///
/// Idle instances expire after `ttl`; when `max_instances` is reached the
/// least recently used instance is evicted.
pub struct PageRegistry {
    pages: Mutex<HashMap<Uuid, Entry>>,
    ttl: Duration,
    max_instances: usize,
}

impl PageRegistry {
    pub fn new(ttl: Duration, max_instances: usize) -> Self {
        Self {
            pages: Mutex::new(HashMap::new()),
            ttl,
            max_instances: max_instances.max(1),
        }
    }

    pub fn from_config(config: &ListingConfig) -> Self {
        Self::new(
            Duration::from_secs(config.instance_ttl_secs),
            config.max_instances,
        )
    }

    /// Registers a page and returns its new instance id.
    pub async fn insert(&self, page: ListingPage) -> (Uuid, PageHandle) {
        let id = Uuid::new_v4();
        let handle = Arc::new(Mutex::new(page));
        let now = Instant::now();

        let mut pages = self.pages.lock().await;
        pages.retain(|_, entry| now.duration_since(entry.last_seen) < self.ttl);

        while pages.len() >= self.max_instances {
            let oldest = pages
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| *id);
            match oldest {
                Some(oldest) => {
                    tracing::debug!(instance = %oldest, "Evicting least recently used page instance");
                    pages.remove(&oldest);
                }
                None => break,
            }
        }

        pages.insert(
            id,
            Entry {
                page: handle.clone(),
                last_seen: now,
            },
        );

        (id, handle)
    }

    /// Looks up a live instance, refreshing its idle timer.
    pub async fn get(&self, id: &Uuid) -> Option<PageHandle> {
        let now = Instant::now();
        let mut pages = self.pages.lock().await;

        let expired = pages
            .get(id)
            .map(|entry| now.duration_since(entry.last_seen) >= self.ttl)?;
        if expired {
            tracing::debug!(instance = %id, "Page instance expired");
            pages.remove(id);
            return None;
        }

        pages.get_mut(id).map(|entry| {
            entry.last_seen = now;
            entry.page.clone()
        })
    }

    /// Forgets an instance; later lookups of `id` miss.
    pub async fn remove(&self, id: &Uuid) -> bool {
        self.pages.lock().await.remove(id).is_some()
    }

    /// Number of live instances.
    pub async fn len(&self) -> usize {
        self.pages.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.pages.lock().await.is_empty()
    }
}
