//! HTTP retriever backed by reqwest.

use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::debug;

use super::{Retriever, RetrieverError};
use crate::config::RetrieverConfig;

/// Retrieves content with a plain HTTP GET.
pub struct HttpRetriever {
    client: Client,
    config: RetrieverConfig,
}

impl HttpRetriever {
    pub fn new(config: RetrieverConfig) -> Result<Self, RetrieverError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| RetrieverError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &RetrieverConfig {
        &self.config
    }
}

/// Parses `url` and accepts only http and https.
fn parse_url(url: &str) -> Result<Url, RetrieverError> {
    let invalid = || RetrieverError::InvalidUrl {
        url: url.to_string(),
    };
    let parsed = Url::parse(url).map_err(|_| invalid())?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        _ => Err(invalid()),
    }
}

#[async_trait]
impl Retriever for HttpRetriever {
    fn name(&self) -> &str {
        "http"
    }

    async fn retrieve(&self, url: &str) -> Result<Vec<u8>, RetrieverError> {
        let target = parse_url(url)?;

        let response = self
            .client
            .get(target)
            .send()
            .await
            .map_err(|e| RetrieverError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrieverError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RetrieverError::from_reqwest(url, e))?;

        if body.is_empty() {
            return Err(RetrieverError::EmptyBody {
                url: url.to_string(),
            });
        }

        debug!(url = %url, bytes = body.len(), "Retrieved content");
        Ok(body.to_vec())
    }
}
