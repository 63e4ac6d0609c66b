use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::fmt;
use tokio::runtime::Handle;
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::error::TransportError;
use crate::remote::model::{DetailsResponse, PageResponse};

pub mod model;

/// HTTP client for the two Oompa Loompa endpoints.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    log_requests: bool,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Source of raw API responses. The repository only talks to this seam.
#[async_trait]
pub trait OompaLoompasDataSource: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<PageResponse, TransportError>;

    async fn fetch_details(&self, id: u32) -> Result<DetailsResponse, TransportError>;
}

impl ApiClient {
    pub fn from_config(cfg: &Config) -> Result<Self, TransportError> {
        let base_url = Url::parse(&cfg.api.base_url).map_err(TransportError::Url)?;
        let http = Client::builder()
            .user_agent(cfg.api.user_agent.as_str())
            .connect_timeout(cfg.api.connect_timeout())
            .timeout(cfg.api.read_timeout())
            .build()
            .map_err(TransportError::Client)?;
        Ok(Self {
            http,
            base_url,
            log_requests: cfg.api.log_requests,
        })
    }

    pub fn with_base_url(base_url: Url) -> Result<Self, TransportError> {
        let http = Client::builder()
            .user_agent("oompa-loompas/0.1")
            .build()
            .map_err(TransportError::Client)?;
        Ok(Self {
            http,
            base_url,
            log_requests: false,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn build_page_request(&self, page: u32) -> Result<reqwest::Request, TransportError> {
        let endpoint = self
            .base_url
            .join("oompa-loompas")
            .map_err(TransportError::Url)?;
        self.http
            .get(endpoint)
            .query(&[("page", page)])
            .header("Accept", "application/json")
            .build()
            .map_err(TransportError::Client)
    }

    pub fn build_details_request(&self, id: u32) -> Result<reqwest::Request, TransportError> {
        let endpoint = self
            .base_url
            .join(&format!("oompa-loompas/{}", id))
            .map_err(TransportError::Url)?;
        self.http
            .get(endpoint)
            .header("Accept", "application/json")
            .build()
            .map_err(TransportError::Client)
    }

    async fn execute<T: DeserializeOwned>(&self, request: reqwest::Request) -> Result<T, TransportError> {
        let url = request.url().to_string();
        if self.log_requests {
            debug!(%url, method = %request.method(), "sending api request");
        }

        let res = self
            .http
            .execute(request)
            .await
            .map_err(|source| TransportError::Request {
                url: url.clone(),
                source,
            })?;

        let status = res.status();
        if self.log_requests {
            debug!(%url, %status, "api response");
        }
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!(%url, %status, "api error");
            return Err(TransportError::Status { url, status, body });
        }

        let bytes = res.bytes().await.map_err(|source| TransportError::Request {
            url: url.clone(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| TransportError::Decode { url, source })
    }

    pub async fn fetch_page(&self, page: u32) -> Result<PageResponse, TransportError> {
        let request = self.build_page_request(page)?;
        self.execute(request).await
    }

    pub async fn fetch_details(&self, id: u32) -> Result<DetailsResponse, TransportError> {
        let request = self.build_details_request(id)?;
        self.execute(request).await
    }
}

#[async_trait]
impl OompaLoompasDataSource for ApiClient {
    async fn fetch_page(&self, page: u32) -> Result<PageResponse, TransportError> {
        ApiClient::fetch_page(self, page).await
    }

    async fn fetch_details(&self, id: u32) -> Result<DetailsResponse, TransportError> {
        ApiClient::fetch_details(self, id).await
    }
}

/// Runs every [`ApiClient`] call as a task on the `io` runtime, so network
/// work never shares worker threads with the caller.
#[derive(Debug, Clone)]
pub struct RemoteDataSource {
    client: ApiClient,
    io: Handle,
}

impl RemoteDataSource {
    pub fn new(client: ApiClient, io: Handle) -> Self {
        Self { client, io }
    }
}

#[async_trait]
impl OompaLoompasDataSource for RemoteDataSource {
    #[instrument(skip(self))]
    async fn fetch_page(&self, page: u32) -> Result<PageResponse, TransportError> {
        let client = self.client.clone();
        self.io
            .spawn(async move { client.fetch_page(page).await })
            .await
            .map_err(TransportError::Interrupted)?
    }

    #[instrument(skip(self))]
    async fn fetch_details(&self, id: u32) -> Result<DetailsResponse, TransportError> {
        let client = self.client.clone();
        self.io
            .spawn(async move { client.fetch_details(id).await })
            .await
            .map_err(TransportError::Interrupted)?
    }
}
