// Query error taxonomy
use serde::Serialize;
use thiserror::Error;

/// Coarse classification reported to the caller alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorStatus {
    BadRequest,
    BadGateway,
    Internal,
    Validation,
    Cancelled,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum QueryError {
    #[error("malformed query: {0}")]
    MalformedQuery(String),

    #[error("failed to create API request: {0}")]
    RequestConstruction(String),

    #[error("API request failed: {0}")]
    Transport(String),

    #[error("API error ({status}): empty response body")]
    UpstreamEmpty { status: u16 },

    #[error("API error ({status}): {body}")]
    UpstreamPlainText { status: u16, body: String },

    #[error("{messages}")]
    Validation { messages: String },

    #[error("API error: {title}")]
    UpstreamTitled { title: String },

    #[error("API error ({status}): {body}")]
    UpstreamOpaque { status: u16, body: String },

    #[error("failed to parse API response JSON: {0}")]
    UpstreamDecode(String),

    #[error("query cancelled")]
    Cancelled,
}

impl QueryError {
    pub fn status(&self) -> ErrorStatus {
        match self {
            QueryError::MalformedQuery(_) => ErrorStatus::BadRequest,
            QueryError::RequestConstruction(_) => ErrorStatus::Internal,
            QueryError::Transport(_) => ErrorStatus::BadGateway,
            QueryError::UpstreamEmpty { .. }
            | QueryError::UpstreamPlainText { .. }
            | QueryError::UpstreamTitled { .. }
            | QueryError::UpstreamOpaque { .. } => ErrorStatus::BadRequest,
            QueryError::Validation { .. } => ErrorStatus::Validation,
            QueryError::UpstreamDecode(_) => ErrorStatus::Internal,
            QueryError::Cancelled => ErrorStatus::Cancelled,
        }
    }
}
