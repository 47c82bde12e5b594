// Query model - parsed and defaulted representation of one query payload
use super::error::QueryError;
use super::nullable::null_as_default;
use chrono::{DateTime, Utc};
use serde::Deserialize;

pub const DEFAULT_PAGE_SIZE: i64 = 10;

const UPSTREAM_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A variable known to the caller, as picked in the query editor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableRef {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub variable_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuerySpec {
    #[serde(deserialize_with = "null_as_default")]
    pub query_text: String,
    #[serde(deserialize_with = "null_as_default")]
    pub variable_ids: Vec<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub variable_names: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub variables: Vec<VariableRef>,
    #[serde(deserialize_with = "null_as_default")]
    pub prefix: String,
    #[serde(deserialize_with = "null_as_default")]
    pub suffix: String,
    #[serde(deserialize_with = "null_as_default")]
    pub opc_tags: String,
    #[serde(deserialize_with = "null_as_default")]
    pub page_index: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub page_size: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub is_alarm: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_event: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_live: bool,
}

impl QuerySpec {
    /// Decode a raw query payload and apply the pagination defaults.
    pub fn parse(payload: &[u8]) -> Result<Self, QueryError> {
        let spec: QuerySpec = serde_json::from_slice(payload)
            .map_err(|e| QueryError::MalformedQuery(e.to_string()))?;
        Ok(spec.normalized())
    }

    fn normalized(mut self) -> Self {
        if self.page_index <= 0 {
            self.page_index = 0;
        }
        if self.page_size <= 0 {
            self.page_size = DEFAULT_PAGE_SIZE;
        }
        self
    }

    /// Variable tokens sent upstream as `varId`.
    ///
    /// `queryText` wins when present (it may already hold a templated,
    /// comma-separated list); otherwise the numeric ids are used in order.
    pub fn variable_tokens(&self) -> Vec<String> {
        let text = self.query_text.trim();
        if !text.is_empty() {
            return vec![text.to_string()];
        }
        self.variable_ids.iter().map(|id| id.to_string()).collect()
    }

    /// Look up a display name for a variable id. First non-empty match wins.
    pub fn display_name(&self, variable_id: i64) -> Option<&str> {
        let from_table = self
            .variables
            .iter()
            .find(|v| v.id == variable_id && !v.variable_name.is_empty())
            .map(|v| v.variable_name.as_str());

        from_table.or_else(|| {
            self.variable_ids
                .iter()
                .zip(self.variable_names.iter())
                .find(|(id, name)| **id == variable_id && !name.is_empty())
                .map(|(_, name)| name.as_str())
        })
    }

    pub fn has_active_kind(&self) -> bool {
        self.is_alarm || self.is_event || self.is_live
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TimeWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }

    pub fn date_from(&self) -> String {
        self.from.format(UPSTREAM_TIME_FORMAT).to_string()
    }

    pub fn date_to(&self) -> String {
        self.to.format(UPSTREAM_TIME_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    #[test]
    fn test_pagination_defaults() {
        let spec = QuerySpec::parse(br#"{"pageIndex": -3, "pageSize": 0}"#).unwrap();
        assert_eq!(spec.page_index, 0);
        assert_eq!(spec.page_size, 10);

        let spec = QuerySpec::parse(br#"{"pageIndex": 4, "pageSize": 25}"#).unwrap();
        assert_eq!(spec.page_index, 4);
        assert_eq!(spec.page_size, 25);

        let spec = QuerySpec::parse(b"{}").unwrap();
        assert_eq!(spec.page_index, 0);
        assert_eq!(spec.page_size, 10);

        let spec = QuerySpec::parse(
            br#"{"queryText": "7", "isLive": true, "pageIndex": null, "pageSize": null, "variables": null}"#,
        )
        .unwrap();
        assert_eq!(spec.page_index, 0);
        assert_eq!(spec.page_size, 10);
        assert!(spec.variables.is_empty());
        assert!(spec.is_live);
    }

    #[test]
    fn test_null_members_read_as_unset() {
        let spec = QuerySpec::parse(
            br#"{"queryText": null, "variableIds": [4], "variableNames": null, "variables": [{"id": 4, "variableName": null}], "isAlarm": null, "isEvent": true}"#,
        )
        .unwrap();

        assert_eq!(spec.variable_tokens(), vec!["4".to_string()]);
        assert_eq!(spec.display_name(4), None);
        assert!(!spec.is_alarm && spec.is_event);
    }

    #[test]
    fn test_parse_full_payload() {
        let payload = br#"{
            "refId": "A",
            "queryText": "12",
            "variableIds": [12, 13],
            "variableNames": ["Pressure", "Flow"],
            "variables": [{"id": 12, "variableName": "Tank Pressure"}],
            "prefix": "SITE1",
            "opcTags": "tag.a",
            "isAlarm": true,
            "isEvent": false,
            "isLive": true
        }"#;
        let spec = QuerySpec::parse(payload).unwrap();

        assert_eq!(spec.query_text, "12");
        assert_eq!(spec.variable_ids, vec![12, 13]);
        assert_eq!(spec.prefix, "SITE1");
        assert_eq!(spec.opc_tags, "tag.a");
        assert!(spec.is_alarm && spec.is_live && !spec.is_event);
        assert_eq!(spec.display_name(12), Some("Tank Pressure"));
        assert_eq!(spec.display_name(13), Some("Flow"));
        assert_eq!(spec.display_name(99), None);
    }

    #[test]
    fn test_malformed_payload() {
        let err = QuerySpec::parse(br#"{"isLive": "yes"}"#).unwrap_err();
        assert!(matches!(err, QueryError::MalformedQuery(_)));

        let err = QuerySpec::parse(b"not json").unwrap_err();
        assert!(matches!(err, QueryError::MalformedQuery(_)));
    }

    #[test]
    fn test_no_flags_is_legal() {
        let spec = QuerySpec::parse(br#"{"queryText": "5"}"#).unwrap();
        assert!(!spec.has_active_kind());
    }

    #[test]
    fn test_variable_tokens() {
        let spec = QuerySpec::parse(br#"{"queryText": " 7,9 ", "variableIds": [1]}"#).unwrap();
        assert_eq!(spec.variable_tokens(), vec!["7,9".to_string()]);

        let spec = QuerySpec::parse(br#"{"variableIds": [3, 1, 2]}"#).unwrap();
        assert_eq!(spec.variable_tokens(), vec!["3", "1", "2"]);

        let spec = QuerySpec::parse(b"{}").unwrap();
        assert!(spec.variable_tokens().is_empty());
    }

    #[test]
    fn test_time_window_formats_in_utc() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let from = offset.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let to = offset.with_ymd_and_hms(2024, 3, 1, 12, 30, 15).unwrap();
        let window = TimeWindow::new(from.with_timezone(&Utc), to.with_timezone(&Utc));

        assert_eq!(window.date_from(), "2024-03-01T08:00:00");
        assert_eq!(window.date_to(), "2024-03-01T10:30:15");
    }
}
