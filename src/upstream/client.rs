//! HTTP client for the fixed backend origin.

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

use crate::config::UpstreamConfig;

/// Error building the client or fetching from the origin.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("invalid origin {origin:?}: {source}")]
    InvalidOrigin {
        origin: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid request target {0:?}")]
    BadTarget(String),

    #[error("origin request timed out")]
    Timeout,

    #[error("origin request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

/// A fully buffered origin response.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Client for the single configured origin.
pub struct UpstreamClient {
    origin: Url,
    http: reqwest::Client,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let origin = Url::parse(&config.origin).map_err(|source| UpstreamError::InvalidOrigin {
            origin: config.origin.clone(),
            source,
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(UpstreamError::Client)?;

        Ok(Self { origin, http })
    }

    /// Fetch an absolute request path from the origin.
    pub async fn fetch(&self, target: &str) -> Result<UpstreamResponse, UpstreamError> {
        // A scheme-relative target ("//host/path") would redirect the
        // join to another host; only origin-form targets are valid.
        if !target.starts_with('/') || target.starts_with("//") {
            return Err(UpstreamError::BadTarget(target.to_string()));
        }
        let url = self
            .origin
            .join(target)
            .map_err(|_| UpstreamError::BadTarget(target.to_string()))?;

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(classify_transport)?;

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}

fn classify_transport(error: reqwest::Error) -> UpstreamError {
    if error.is_timeout() {
        UpstreamError::Timeout
    } else {
        UpstreamError::Transport(error)
    }
}
