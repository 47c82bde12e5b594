// Query service - runs the full pipeline for a batch of queries
use crate::application::frame_assembler::assemble;
use crate::application::normalizer::{normalize, NormalizedPayload};
use crate::application::request_builder::{build_requests, PlannedRequest};
use crate::application::upstream_client::UpstreamClient;
use crate::domain::error::{ErrorStatus, QueryError};
use crate::domain::frame::Frame;
use crate::domain::query::{QuerySpec, TimeWindow};
use bytes::Bytes;
use futures::future::{join_all, try_join_all};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// One query as handed over by the host.
#[derive(Debug, Clone)]
pub struct DataQuery {
    pub ref_id: String,
    pub payload: Bytes,
    pub window: TimeWindow,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DataResponse {
    Frames { frames: Vec<Frame> },
    Error { error: String, status: ErrorStatus },
}

impl From<Result<Vec<Frame>, QueryError>> for DataResponse {
    fn from(result: Result<Vec<Frame>, QueryError>) -> Self {
        match result {
            Ok(frames) => DataResponse::Frames { frames },
            Err(err) => DataResponse::Error {
                status: err.status(),
                error: err.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchResponse {
    pub results: BTreeMap<String, DataResponse>,
}

#[derive(Clone)]
pub struct QueryService {
    client: Arc<dyn UpstreamClient>,
    credential: String,
}

impl QueryService {
    pub fn new(client: Arc<dyn UpstreamClient>, credential: String) -> Self {
        Self { client, credential }
    }

    /// Run every query concurrently. A failing query only fills its own slot.
    pub async fn run_batch(&self, queries: Vec<DataQuery>, cancel: CancellationToken) -> BatchResponse {
        let runs = queries.iter().map(|query| {
            let cancel = cancel.clone();
            async move {
                let result = self.run_query(query, &cancel).await;
                (query.ref_id.clone(), DataResponse::from(result))
            }
        });

        BatchResponse {
            results: join_all(runs).await.into_iter().collect(),
        }
    }

    pub async fn run_query(&self, query: &DataQuery, cancel: &CancellationToken) -> Result<Vec<Frame>, QueryError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!(ref_id = %query.ref_id, "Query cancelled");
                Err(QueryError::Cancelled)
            }
            result = self.execute(query) => result,
        }
    }

    async fn execute(&self, query: &DataQuery) -> Result<Vec<Frame>, QueryError> {
        let spec = QuerySpec::parse(&query.payload).inspect_err(|e| {
            tracing::error!(ref_id = %query.ref_id, error = %e, "Query JSON unmarshal failed");
        })?;

        tracing::info!(
            ref_id = %query.ref_id,
            query_text = %spec.query_text,
            prefix = %spec.prefix,
            suffix = %spec.suffix,
            is_alarm = spec.is_alarm,
            is_event = spec.is_event,
            is_live = spec.is_live,
            "Running query"
        );

        if !spec.has_active_kind() {
            tracing::debug!(ref_id = %query.ref_id, "No result kinds requested");
        }

        let planned = build_requests(&spec, &query.window, &self.credential);
        let payloads = try_join_all(planned.iter().map(|p| self.call_and_normalize(&query.ref_id, p))).await?;

        let frames = assemble(&spec, payloads);
        tracing::info!(
            ref_id = %query.ref_id,
            frames = frames.len(),
            rows = frames.iter().map(Frame::row_count).sum::<usize>(),
            "Query complete"
        );
        Ok(frames)
    }

    async fn call_and_normalize(&self, ref_id: &str, planned: &PlannedRequest) -> Result<NormalizedPayload, QueryError> {
        let response = self.client.fetch(&planned.request).await.inspect_err(|e| {
            tracing::error!(ref_id, kind = planned.kind.as_str(), error = %e, "API request failed");
        })?;
        normalize(planned.kind, &response)
    }
}
