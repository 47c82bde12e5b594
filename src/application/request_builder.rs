// Request builder - turns a query into upstream HTTP request descriptors
use crate::domain::query::{QuerySpec, TimeWindow};

pub const ALARMS_PATH: &str = "/alarms";
pub const EVENTS_PATH: &str = "/events";
pub const LIVE_VALUES_PATH: &str = "/variables/getHistoryLoggedValuesV2";

/// Which result set a request feeds. Declaration order is output frame order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResultKind {
    Alarm,
    Event,
    Live,
}

impl ResultKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResultKind::Alarm => "alarm",
            ResultKind::Event => "event",
            ResultKind::Live => "live",
        }
    }
}

/// A fully-formed GET against the monitoring API. Parameter values are kept
/// raw and only percent-encoded when rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    pub path: String,
    pub params: Vec<(String, String)>,
    pub credential: String,
}

impl UpstreamRequest {
    pub fn new(path: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
            credential: credential.into(),
        }
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    pub fn param_value(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn query_string(&self) -> String {
        self.params
            .iter()
            .map(|(name, value)| {
                format!("{}={}", urlencoding::encode(name), urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Absolute URL against the configured API base.
    pub fn url(&self, base_url: &str) -> String {
        let base = base_url.trim_end_matches('/');
        if self.params.is_empty() {
            format!("{}{}", base, self.path)
        } else {
            format!("{}{}?{}", base, self.path, self.query_string())
        }
    }

    pub fn headers(&self) -> [(&'static str, &str); 2] {
        [
            ("Authorization", self.credential.as_str()),
            ("Accept", "application/json"),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedRequest {
    pub kind: ResultKind,
    pub request: UpstreamRequest,
}

/// Build one request per active result kind, in alarm, event, live order.
///
/// The live request is skipped when the query names no variables.
pub fn build_requests(spec: &QuerySpec, window: &TimeWindow, credential: &str) -> Vec<PlannedRequest> {
    let var_id = spec.variable_tokens().join(",");
    let date_from = window.date_from();
    let date_to = window.date_to();
    let page_index = spec.page_index.to_string();
    let page_size = spec.page_size.to_string();

    let mut planned = Vec::with_capacity(3);

    if spec.is_alarm {
        let request = UpstreamRequest::new(ALARMS_PATH, credential)
            .param("dateFrom", &date_from)
            .param("dateTo", &date_to)
            .param("varId", &var_id)
            .param("locationPrefix", &spec.prefix)
            .param("pageIndex", &page_index)
            .param("pageSize", &page_size);
        planned.push(PlannedRequest {
            kind: ResultKind::Alarm,
            request,
        });
    }

    if spec.is_event {
        let request = UpstreamRequest::new(EVENTS_PATH, credential)
            .param("dateFrom", &date_from)
            .param("dateTo", &date_to)
            .param("varId", &var_id)
            .param("locationPrefix", &spec.prefix)
            .param("opcTags", &spec.opc_tags)
            .param("pageIndex", &page_index)
            .param("pageSize", &page_size);
        planned.push(PlannedRequest {
            kind: ResultKind::Event,
            request,
        });
    }

    if spec.is_live && !var_id.is_empty() {
        let request = UpstreamRequest::new(LIVE_VALUES_PATH, credential)
            .param("dateFrom", &date_from)
            .param("dateTo", &date_to)
            .param("varId", &var_id);
        planned.push(PlannedRequest {
            kind: ResultKind::Live,
            request,
        });
    }

    planned
}
