use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, StatusCode, Url};
use thiserror::Error;

use crate::error::Result;

#[derive(Error, Debug)]
pub enum DeliveryError {
    /// The endpoint answered with something other than 200 or 204.
    #[error("unexpected status code {status}: {body}")]
    Status { status: u16, body: String },

    /// The request didn't make it to the endpoint or the answer didn't make it back.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Hands an enriched payload over to the ingestion endpoint.
#[async_trait]
pub trait Forwarder: Send + Sync {
    async fn forward(&self, body: Vec<u8>) -> std::result::Result<(), DeliveryError>;
}

/// Single-shot `POST` of the payload as `text/plain`. No retries.
pub struct HttpForwarder {
    client: reqwest::Client,
    url: Url,
}

impl HttpForwarder {
    pub fn new(url: &str, timeout: Option<Duration>) -> Result<Self> {
        let url = Url::parse(url).map_err(|e| (format!("invalid forward URL \"{}\"", url), e))?;

        let mut builder = reqwest::Client::builder()
            .user_agent(format!("metrelay/{}", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ("failed to build HTTP client", e))?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl Forwarder for HttpForwarder {
    async fn forward(&self, body: Vec<u8>) -> std::result::Result<(), DeliveryError> {
        let started = Instant::now();
        let bytes = body.len();

        let response = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::OK || status == StatusCode::NO_CONTENT {
            tracing::info!(
                url = %self.url,
                bytes,
                elapsed = ?started.elapsed(),
                "forwarded metrics"
            );
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(DeliveryError::Status {
            status: status.as_u16(),
            body: body.trim_end().to_owned(),
        })
    }
}
