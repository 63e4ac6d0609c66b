//! Repository over the remote data source with a single-page in-memory cache.
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::error::TransportError;
use crate::model::{OompaLoompaDetails, PageResult};
use crate::remote::OompaLoompasDataSource;

#[async_trait]
pub trait OompaLoompasRepository: Send + Sync {
    /// Fetch a page. Served from the cache when `refresh` is false and the
    /// cache holds a page, regardless of which page number it holds.
    async fn fetch_page(&self, page: u32, refresh: bool) -> Result<Arc<PageResult>, TransportError>;

    /// Always hits the network.
    async fn fetch_details(&self, id: u32) -> Result<OompaLoompaDetails, TransportError>;

    /// The cached page, if any, without touching the network.
    async fn cached_page(&self) -> Option<Arc<PageResult>>;
}

pub struct DefaultOompaLoompasRepository {
    data_source: Arc<dyn OompaLoompasDataSource>,
    // Held only while reading or assigning, never across a network call.
    page_cache: Mutex<Option<Arc<PageResult>>>,
}

impl DefaultOompaLoompasRepository {
    pub fn new(data_source: Arc<dyn OompaLoompasDataSource>) -> Self {
        Self {
            data_source,
            page_cache: Mutex::new(None),
        }
    }
}

#[async_trait]
impl OompaLoompasRepository for DefaultOompaLoompasRepository {
    #[instrument(skip(self))]
    async fn fetch_page(&self, page: u32, refresh: bool) -> Result<Arc<PageResult>, TransportError> {
        let cached = self.page_cache.lock().await.clone();
        if let (false, Some(cached)) = (refresh, cached) {
            debug!(cached_page = cached.current_page, "serving page from cache");
            return Ok(cached);
        }

        debug!("fetching page from network");
        let fresh = Arc::new(PageResult::from(self.data_source.fetch_page(page).await?));

        let mut guard = self.page_cache.lock().await;
        *guard = Some(fresh.clone());
        // Each caller gets its own response, even if a concurrent fetch
        // replaces the cache right after this write.
        Ok(fresh)
    }

    #[instrument(skip(self))]
    async fn fetch_details(&self, id: u32) -> Result<OompaLoompaDetails, TransportError> {
        let details = self.data_source.fetch_details(id).await?;
        Ok(details.into())
    }

    async fn cached_page(&self) -> Option<Arc<PageResult>> {
        self.page_cache.lock().await.clone()
    }
}
