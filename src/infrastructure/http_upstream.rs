// reqwest-backed client for the monitoring API
use crate::application::request_builder::UpstreamRequest;
use crate::application::upstream_client::{UpstreamClient, UpstreamResponse};
use crate::domain::error::QueryError;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpUpstreamClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpUpstreamClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, QueryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| QueryError::RequestConstruction(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn map_transport_error(err: reqwest::Error) -> QueryError {
    if err.is_builder() {
        QueryError::RequestConstruction(err.to_string())
    } else {
        QueryError::Transport(err.to_string())
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstreamClient {
    async fn fetch(&self, request: &UpstreamRequest) -> Result<UpstreamResponse, QueryError> {
        let url = request.url(&self.base_url);
        tracing::debug!(url = %url, "Sending API request");

        let mut builder = self.client.get(&url);
        for (name, value) in request.headers() {
            builder = builder.header(name, value);
        }

        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().await.map_err(map_transport_error)?;
        tracing::debug!(url = %url, status, bytes = body.len(), "API response received");

        Ok(UpstreamResponse::new(status, content_type.as_deref(), body))
    }
}
