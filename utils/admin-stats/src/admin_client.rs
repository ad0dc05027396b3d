use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use crate::{
    error::{FetchError, TransportError},
    snapshot::{parse_snapshot, Snapshot},
    snapshot_source::SnapshotSource,
};

pub const STATS_PATH: &str = "/stats";
pub const SERVER_INFO_PATH: &str = "/server_info";

/// HTTP client for a proxy admin interface
/// Every request is a single GET bounded by `timeout`, never retried
pub struct AdminClient {
    base: Url,
    client: Client,
}

impl AdminClient {
    /// Create a client for the admin interface at `base_url` (scheme included)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let base = parse_admin_url(base_url)?;

        // Admin listeners are reached directly, never through HTTP(S)_PROXY
        let client = Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(|e| TransportError::Connection {
                url: base_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self { base, client })
    }

    /// Validated base URL, as normalized by the parser
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// GET `path` relative to the admin base and return the body as text
    pub async fn fetch(&self, path: &str) -> Result<String, TransportError> {
        let url = self.base.join(path).map_err(|e| TransportError::InvalidUrl {
            url: format!("{}{}", self.base, path),
            reason: e.to_string(),
        })?;
        let url_str = url.to_string();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| request_error(&url_str, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url_str,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| request_error(&url_str, e))?;

        debug!("Fetched {} bytes from {}", body.len(), url_str);
        Ok(body)
    }

    /// Free-text server description, printed once as a banner
    pub async fn server_info(&self) -> Result<String, TransportError> {
        self.fetch(SERVER_INFO_PATH).await
    }
}

#[async_trait]
impl SnapshotSource for AdminClient {
    async fn fetch_snapshot(&self) -> Result<Snapshot, FetchError> {
        let body = self.fetch(STATS_PATH).await?;
        Ok(parse_snapshot(&body)?)
    }
}

/// Validate an admin base URL; only http and https are accepted
pub fn parse_admin_url(base_url: &str) -> Result<Url, TransportError> {
    let url = Url::parse(base_url).map_err(|e| TransportError::InvalidUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(TransportError::InvalidUrl {
            url: base_url.to_string(),
            reason: format!("unsupported scheme {other}"),
        }),
    }
}

fn request_error(url: &str, err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout {
            url: url.to_string(),
        }
    } else if err.is_body() || err.is_decode() {
        TransportError::Body {
            url: url.to_string(),
            reason: err.to_string(),
        }
    } else {
        TransportError::Connection {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }
}
