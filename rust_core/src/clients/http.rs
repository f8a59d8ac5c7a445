//! HTTP transport used by the fan-out layer.
//!
//! `HttpFetch` is the seam between the client and the network; the default
//! implementation wraps a `reqwest::Client`.

use async_trait::async_trait;
use reqwest::{Client, Proxy};
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{AsaError, Result};

/// Status and decoded body of a GET request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    /// `Value::Null` when the status is a failure
    pub body: Value,
}

impl HttpResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn is_success(&self) -> bool {
        self.status < 400
    }
}

#[async_trait]
pub trait HttpFetch: Send + Sync {
    /// GET `url` and decode the JSON body. Failure statuses are returned as
    /// responses, not errors; only transport and decode problems are errors.
    async fn get_json(&self, url: &str) -> Result<HttpResponse>;
}

/// `HttpFetch` over reqwest
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl std::fmt::Debug for ReqwestFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestFetcher").finish()
    }
}

impl ReqwestFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client with the configured timeout, user agent and proxy
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone());

        if let Some(proxy_url) = &config.proxy {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                AsaError::Validation(format!("invalid proxy url {}: {}", proxy_url, e))
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(|e| AsaError::Http {
            url: config.base_url.clone(),
            source: e,
        })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetcher {
    async fn get_json(&self, url: &str) -> Result<HttpResponse> {
        debug!("GET {}", url);

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AsaError::Http {
                url: url.to_string(),
                source: e,
            })?;

        let status = resp.status().as_u16();
        if status >= 400 {
            return Ok(HttpResponse {
                status,
                body: Value::Null,
            });
        }

        let body = resp.json::<Value>().await.map_err(|e| AsaError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(HttpResponse { status, body })
    }
}
