// Response normalizer - upstream replies into typed records or errors
use crate::application::request_builder::ResultKind;
use crate::application::upstream_client::UpstreamResponse;
use crate::domain::error::QueryError;
use crate::domain::nullable::null_as_default;
use crate::domain::telemetry::{
    AlarmLog, AlarmRecord, EventLog, EventRecord, ParsedSample, RawSample, TimeSeriesPoint,
};
use crate::domain::timestamp::{parse_instant, parse_optional_instant, TimePrecision};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;

const LOG_BODY_LIMIT: usize = 300;

#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedPayload {
    Alarms(Vec<AlarmRecord>),
    Events(Vec<EventRecord>),
    Samples(Vec<ParsedSample>),
}

impl NormalizedPayload {
    pub fn kind(&self) -> ResultKind {
        match self {
            NormalizedPayload::Alarms(_) => ResultKind::Alarm,
            NormalizedPayload::Events(_) => ResultKind::Event,
            NormalizedPayload::Samples(_) => ResultKind::Live,
        }
    }
}

/// Problem-details style error body sent by the API on failures. The `type`,
/// `status` and `traceId` members carry nothing the caller needs.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ErrorBody {
    #[serde(deserialize_with = "null_as_default")]
    errors: BTreeMap<String, Vec<String>>,
    #[serde(deserialize_with = "null_as_default")]
    title: String,
}

pub fn normalize(kind: ResultKind, response: &UpstreamResponse) -> Result<NormalizedPayload, QueryError> {
    let body_text = response.body_text();
    tracing::debug!(
        kind = kind.as_str(),
        status = response.status,
        body = truncate(&body_text, LOG_BODY_LIMIT),
        "Upstream response received"
    );

    if response.status != 200 {
        let err = classify_failure(response);
        tracing::error!(kind = kind.as_str(), status = response.status, error = %err, "API returned non-OK status");
        return Err(err);
    }

    match kind {
        ResultKind::Alarm => {
            let logs: Vec<AlarmLog> = decode_list(&response.body)?;
            Ok(NormalizedPayload::Alarms(
                logs.into_iter().filter_map(parse_alarm).collect(),
            ))
        }
        ResultKind::Event => {
            let logs: Vec<EventLog> = decode_list(&response.body)?;
            Ok(NormalizedPayload::Events(
                logs.into_iter().filter_map(parse_event).collect(),
            ))
        }
        ResultKind::Live => {
            let samples: Vec<RawSample> = decode_list(&response.body)?;
            tracing::debug!(count = samples.len(), "Parsed live value records");
            Ok(NormalizedPayload::Samples(
                samples.into_iter().filter_map(parse_sample).collect(),
            ))
        }
    }
}

/// Map a non-200 reply onto the most specific error its body allows.
pub fn classify_failure(response: &UpstreamResponse) -> QueryError {
    let status = response.status;

    if response.body.is_empty() {
        return QueryError::UpstreamEmpty { status };
    }

    if !response.is_json() {
        return QueryError::UpstreamPlainText {
            status,
            body: response.body_text(),
        };
    }

    if let Ok(body) = serde_json::from_slice::<ErrorBody>(&response.body) {
        let messages = body
            .errors
            .iter()
            .flat_map(|(field, messages)| {
                messages.iter().map(move |m| format!("{}: {}", field, m))
            })
            .collect::<Vec<_>>()
            .join("; ");
        if !messages.is_empty() {
            return QueryError::Validation { messages };
        }
        if !body.title.is_empty() {
            return QueryError::UpstreamTitled { title: body.title };
        }
    }

    QueryError::UpstreamOpaque {
        status,
        body: response.body_text(),
    }
}

fn decode_list<T: DeserializeOwned>(body: &[u8]) -> Result<Vec<T>, QueryError> {
    serde_json::from_slice::<Option<Vec<T>>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|e| {
            tracing::error!(error = %e, "JSON unmarshal of API response failed");
            QueryError::UpstreamDecode(e.to_string())
        })
}

fn parse_alarm(log: AlarmLog) -> Option<AlarmRecord> {
    let activation = parse_optional_instant(&log.activation_time, TimePrecision::Fractional);
    let termination = parse_optional_instant(&log.termination_time, TimePrecision::Fractional);

    match (activation, termination) {
        (Ok(activation), Ok(termination)) => Some(AlarmRecord {
            description: log.description,
            activation,
            termination,
        }),
        (Err(e), _) => {
            tracing::warn!(field = "activationTime", value = %log.activation_time, error = %e, "Dropping alarm with unparsable time");
            None
        }
        (_, Err(e)) => {
            tracing::warn!(field = "terminationTime", value = %log.termination_time, error = %e, "Dropping alarm with unparsable time");
            None
        }
    }
}

fn parse_event(log: EventLog) -> Option<EventRecord> {
    match parse_optional_instant(&log.timestamp, TimePrecision::Fractional) {
        Ok(timestamp) => Some(EventRecord {
            description: log.description,
            timestamp,
        }),
        Err(e) => {
            tracing::warn!(field = "timestamp", value = %log.timestamp, error = %e, "Dropping event with unparsable time");
            None
        }
    }
}

fn parse_sample(sample: RawSample) -> Option<ParsedSample> {
    match parse_instant(&sample.timestamp, TimePrecision::Seconds) {
        Ok(time) => Some(ParsedSample {
            variable_id: sample.variable_id,
            point: TimeSeriesPoint::new(time, sample.value),
        }),
        Err(e) => {
            tracing::warn!(variable_id = sample.variable_id, timestamp = %sample.timestamp, error = %e, "Dropping sample with unparsable time");
            None
        }
    }
}

fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
