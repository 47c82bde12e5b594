// Telemetry data domain models
use super::nullable::null_as_default;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One logged value as returned by the history endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawSample {
    #[serde(rename = "variableId", alias = "VariableId", alias = "varId")]
    pub variable_id: i64,
    #[serde(rename = "value", alias = "Value", deserialize_with = "null_as_default")]
    pub value: f64,
    #[serde(rename = "timestamp", alias = "Timestamp", default, deserialize_with = "null_as_default")]
    pub timestamp: String,
    #[serde(rename = "quality", alias = "Quality", default, deserialize_with = "null_as_default")]
    #[allow(dead_code)]
    pub quality: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AlarmLog {
    #[serde(
        rename = "iwsAlarmDescription",
        alias = "IwsAlarmDescription",
        default,
        deserialize_with = "null_as_default"
    )]
    pub description: String,
    #[serde(
        rename = "iwsAlarmActivationTime",
        alias = "IwsAlarmActivationTime",
        default,
        deserialize_with = "null_as_default"
    )]
    pub activation_time: String,
    #[serde(
        rename = "iwsAlarmTerminationTime",
        alias = "IwsAlarmTerminationTime",
        default,
        deserialize_with = "null_as_default"
    )]
    pub termination_time: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EventLog {
    #[serde(
        rename = "iwsEventDescription",
        alias = "IwsEventDescription",
        default,
        deserialize_with = "null_as_default"
    )]
    pub description: String,
    #[serde(
        rename = "iwsEventTimestamp",
        alias = "IwsEventTimestamp",
        default,
        deserialize_with = "null_as_default"
    )]
    pub timestamp: String,
}

/// Alarm with parsed times. `None` means the upstream sent an empty string;
/// for termination that is "still active".
#[derive(Debug, Clone, PartialEq)]
pub struct AlarmRecord {
    pub description: String,
    pub activation: Option<DateTime<Utc>>,
    pub termination: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub description: String,
    pub timestamp: Option<DateTime<Utc>>,
}

/// A live sample whose timestamp parsed successfully.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSample {
    pub variable_id: i64,
    pub point: TimeSeriesPoint,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSeriesPoint {
    pub time: DateTime<Utc>,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(time: DateTime<Utc>, value: f64) -> Self {
        Self { time, value }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableGroup {
    pub variable_id: i64,
    pub name: String,
    pub points: Vec<TimeSeriesPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_sample_accepts_both_casings() {
        let lower: RawSample = serde_json::from_str(
            r#"{"variableId": 7, "value": 1.5, "timestamp": "2024-01-01T00:00:00", "quality": 192}"#,
        )
        .unwrap();
        let pascal: RawSample = serde_json::from_str(
            r#"{"VariableId": 7, "Value": 1.5, "Timestamp": "2024-01-01T00:00:00"}"#,
        )
        .unwrap();

        assert_eq!(lower.variable_id, pascal.variable_id);
        assert_eq!(lower.value, pascal.value);
        assert_eq!(lower.quality, 192);
        assert_eq!(pascal.quality, 0);
    }

    #[test]
    fn test_alarm_log_missing_fields_default_to_empty() {
        let alarm: AlarmLog =
            serde_json::from_str(r#"{"iwsAlarmDescription": "High level"}"#).unwrap();
        assert_eq!(alarm.description, "High level");
        assert!(alarm.activation_time.is_empty());
        assert!(alarm.termination_time.is_empty());
    }

    #[test]
    fn test_null_fields_decode_as_empty() {
        let alarm: AlarmLog = serde_json::from_str(
            r#"{"iwsAlarmDescription": "Tank high", "iwsAlarmActivationTime": "2024-02-01T10:00:00.1", "iwsAlarmTerminationTime": null}"#,
        )
        .unwrap();
        assert_eq!(alarm.activation_time, "2024-02-01T10:00:00.1");
        assert!(alarm.termination_time.is_empty());

        let event: EventLog =
            serde_json::from_str(r#"{"iwsEventDescription": null, "iwsEventTimestamp": null}"#).unwrap();
        assert!(event.description.is_empty());
        assert!(event.timestamp.is_empty());

        let sample: RawSample = serde_json::from_str(
            r#"{"variableId": 7, "value": null, "timestamp": "2024-01-01T00:00:00", "quality": null}"#,
        )
        .unwrap();
        assert_eq!(sample.value, 0.0);
        assert_eq!(sample.quality, 0);
    }
}
