// Client trait for the monitoring API
use crate::application::request_builder::UpstreamRequest;
use crate::domain::error::QueryError;
use async_trait::async_trait;
use bytes::Bytes;

/// Raw upstream reply. Non-200 statuses are returned here, not as errors;
/// classifying them is the normalizer's job.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl UpstreamResponse {
    pub fn new(status: u16, content_type: Option<&str>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Perform one GET. Only connection-level failures are errors.
    async fn fetch(&self, request: &UpstreamRequest) -> Result<UpstreamResponse, QueryError>;
}
