//! Metadata transport: the single network call the client makes

use async_trait::async_trait;
use log::{debug, info};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::error::{ODataError, Result};

/// Credentials attached to the metadata request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Credentials {
    #[default]
    None,
    Basic {
        username: String,
        password: String,
    },
    Bearer {
        token: String,
    },
}

/// Headers and body of a `$metadata` response
#[derive(Debug, Clone)]
pub struct MetadataResponse {
    pub headers: HeaderMap,
    pub body: String,
}

impl MetadataResponse {
    pub fn new(headers: HeaderMap, body: impl Into<String>) -> Self {
        Self {
            headers,
            body: body.into(),
        }
    }
}

#[async_trait]
pub trait MetadataTransport: Send + Sync {
    /// GET `url` and return the response; `Cancelled` if `cancel` fires first
    async fn send_metadata_request(
        &self,
        url: &str,
        credentials: &Credentials,
        cancel: &CancellationToken,
    ) -> Result<MetadataResponse>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    async fn fetch(&self, url: &str, credentials: &Credentials) -> Result<MetadataResponse> {
        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/xml");

        request = match credentials {
            Credentials::None => request,
            Credentials::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            Credentials::Bearer { token } => request.bearer_auth(token),
        };

        let response = request.send().await?.error_for_status()?;
        let headers = response.headers().clone();
        let body = response.text().await?;

        debug!("Received {} bytes of metadata from {}", body.len(), url);
        Ok(MetadataResponse { headers, body })
    }
}

#[async_trait]
impl MetadataTransport for HttpTransport {
    async fn send_metadata_request(
        &self,
        url: &str,
        credentials: &Credentials,
        cancel: &CancellationToken,
    ) -> Result<MetadataResponse> {
        if cancel.is_cancelled() {
            return Err(ODataError::Cancelled);
        }

        info!("Fetching service metadata from {}", url);
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Metadata request to {} cancelled", url);
                Err(ODataError::Cancelled)
            }
            result = self.fetch(url, credentials) => result,
        }
    }
}
