// HTTP request handlers
use crate::application::query_service::{BatchResponse, DataQuery};
use crate::domain::error::{ErrorStatus, QueryError};
use crate::domain::query::TimeWindow;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::{json, value::RawValue};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct QueryBatchRequest {
    pub queries: Vec<QueryRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRecord {
    pub ref_id: String,
    /// Kept raw so a malformed query only fails its own slot.
    pub query: Box<RawValue>,
    pub time_range: TimeWindow,
}

impl From<QueryRecord> for DataQuery {
    fn from(record: QueryRecord) -> Self {
        DataQuery {
            ref_id: record.ref_id,
            payload: Bytes::copy_from_slice(record.query.get().as_bytes()),
            window: record.time_range,
        }
    }
}

/// Error body for the resource endpoints.
pub struct ApiError(pub QueryError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.status() {
            ErrorStatus::BadRequest | ErrorStatus::Validation => StatusCode::BAD_REQUEST,
            ErrorStatus::BadGateway => StatusCode::BAD_GATEWAY,
            ErrorStatus::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorStatus::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if state.api_key_configured {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "API key is missing")
    }
}

/// Run a batch of queries; every query gets its own result slot.
pub async fn query_data(
    State(state): State<Arc<AppState>>,
    Json(batch): Json<QueryBatchRequest>,
) -> Json<BatchResponse> {
    let cancel = state.shutdown.child_token();
    // Dropped with the request if the client goes away.
    let _guard = cancel.clone().drop_guard();

    let queries: Vec<DataQuery> = batch.queries.into_iter().map(DataQuery::from).collect();
    tracing::info!(count = queries.len(), "Query batch received");

    Json(state.query_service.run_batch(queries, cancel).await)
}

pub async fn list_variables(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, ApiError> {
    let variables = state
        .resource_service
        .list_variables(params)
        .await
        .map_err(ApiError)?;
    Ok(Json(variables))
}

pub async fn list_connections(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, ApiError> {
    let connections = state
        .resource_service
        .list_connections(params)
        .await
        .map_err(ApiError)?;
    Ok(Json(connections))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_query_record_keeps_raw_payload() {
        let body = r#"{
            "queries": [{
                "refId": "A",
                "query": {"queryText": "7", "isLive": true},
                "timeRange": {"from": "2024-01-01T00:00:00Z", "to": "2024-01-01T01:00:00+01:00"}
            }]
        }"#;
        let batch: QueryBatchRequest = serde_json::from_str(body).unwrap();
        let query = DataQuery::from(batch.queries.into_iter().next().unwrap());

        assert_eq!(query.ref_id, "A");
        assert_eq!(&query.payload[..], br#"{"queryText": "7", "isLive": true}"#);
        assert_eq!(query.window.from, query.window.to);
    }

    #[tokio::test]
    async fn test_api_error_status_codes() {
        let response = ApiError(QueryError::Transport("refused".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = ApiError(QueryError::UpstreamDecode("eof".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = ApiError(QueryError::UpstreamTitled { title: "Forbidden".into() }).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"error":"API error: Forbidden"}"#);
    }
}
