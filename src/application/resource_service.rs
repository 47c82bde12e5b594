// Resource service - variable and connection listings for the query editor
use crate::application::normalizer::classify_failure;
use crate::application::request_builder::UpstreamRequest;
use crate::application::upstream_client::UpstreamClient;
use crate::domain::error::QueryError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const VARIABLES_PATH: &str = "/variables-dto";
pub const CONNECTIONS_PATH: &str = "/connections";

const VARIABLE_DEFAULTS: &[(&str, &str)] = &[
    ("page", "0"),
    ("itemsPerPage", "20"),
    ("skipFilterConns", "false"),
    ("connId", "0"),
    ("likeParam", ""),
    ("skipPagination", "true"),
];

const CONNECTION_DEFAULTS: &[(&str, &str)] = &[
    ("pageIndex", "0"),
    ("pageSize", "10"),
    ("skipConnectionFilter", "false"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableSummary {
    pub id: i64,
    #[serde(default)]
    pub variable_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSummary {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Clone)]
pub struct ResourceService {
    client: Arc<dyn UpstreamClient>,
    credential: String,
}

impl ResourceService {
    pub fn new(client: Arc<dyn UpstreamClient>, credential: String) -> Self {
        Self { client, credential }
    }

    pub async fn list_variables(&self, params: Vec<(String, String)>) -> Result<Vec<VariableSummary>, QueryError> {
        let request = self.request(VARIABLES_PATH, params, VARIABLE_DEFAULTS);
        self.fetch_list(&request).await
    }

    /// Connections always include the built-in "Internal" connection (id 0),
    /// sorted by id.
    pub async fn list_connections(&self, params: Vec<(String, String)>) -> Result<Vec<ConnectionSummary>, QueryError> {
        let request = self.request(CONNECTIONS_PATH, params, CONNECTION_DEFAULTS);
        let mut connections: Vec<ConnectionSummary> = self.fetch_list(&request).await?;
        connections.push(ConnectionSummary {
            id: 0,
            name: "Internal".to_string(),
        });
        connections.sort_by_key(|c| c.id);
        Ok(connections)
    }

    /// Forward the caller's parameters, filling in defaults for any that are
    /// missing or empty.
    fn request(&self, path: &str, params: Vec<(String, String)>, defaults: &[(&str, &str)]) -> UpstreamRequest {
        let mut request = UpstreamRequest::new(path, &self.credential);
        for (name, value) in params {
            if value.is_empty() && defaults.iter().any(|(d, _)| *d == name) {
                continue;
            }
            request = request.param(name, value);
        }
        for (name, value) in defaults {
            if request.param_value(name).is_none() {
                request = request.param(*name, *value);
            }
        }
        request
    }

    async fn fetch_list<T: DeserializeOwned>(&self, request: &UpstreamRequest) -> Result<Vec<T>, QueryError> {
        let response = self.client.fetch(request).await?;
        if response.status != 200 {
            let err = classify_failure(&response);
            tracing::error!(path = %request.path, status = response.status, error = %err, "Resource request failed");
            return Err(err);
        }

        serde_json::from_slice::<Option<Vec<T>>>(&response.body)
            .map(Option::unwrap_or_default)
            .map_err(|e| {
                tracing::error!(path = %request.path, error = %e, body = %response.body_text(), "Resource response unmarshal failed");
                QueryError::UpstreamDecode(e.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::upstream_client::UpstreamResponse;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct CannedUpstream {
        response: UpstreamResponse,
        seen: Mutex<Vec<UpstreamRequest>>,
    }

    impl CannedUpstream {
        fn new(status: u16, content_type: &str, body: &str) -> Arc<Self> {
            Arc::new(Self {
                response: UpstreamResponse::new(status, Some(content_type), body.to_string()),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl UpstreamClient for CannedUpstream {
        async fn fetch(&self, request: &UpstreamRequest) -> Result<UpstreamResponse, QueryError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(self.response.clone())
        }
    }

    #[tokio::test]
    async fn test_variables_fill_defaults() {
        let upstream = CannedUpstream::new(
            200,
            "application/json",
            r#"[{"id": 4, "variableName": "Flow", "unit": "bbl"}]"#,
        );
        let service = ResourceService::new(upstream.clone(), "key".into());

        let variables = service
            .list_variables(vec![
                ("connId".into(), "3".into()),
                ("page".into(), "".into()),
            ])
            .await
            .unwrap();

        assert_eq!(
            variables,
            vec![VariableSummary {
                id: 4,
                variable_name: "Flow".into()
            }]
        );
        let seen = upstream.seen.lock().unwrap();
        assert_eq!(seen[0].path, VARIABLES_PATH);
        assert_eq!(seen[0].param_value("connId"), Some("3"));
        assert_eq!(seen[0].param_value("page"), Some("0"));
        assert_eq!(seen[0].param_value("itemsPerPage"), Some("20"));
        assert_eq!(seen[0].param_value("skipPagination"), Some("true"));
        assert_eq!(seen[0].param_value("likeParam"), Some(""));
    }

    #[tokio::test]
    async fn test_connections_include_internal_sorted() {
        let upstream = CannedUpstream::new(
            200,
            "application/json",
            r#"[{"id": 12, "name": "Field B"}, {"id": 3, "name": "Field A"}]"#,
        );
        let service = ResourceService::new(upstream, "key".into());

        let connections = service.list_connections(Vec::new()).await.unwrap();
        let ids: Vec<i64> = connections.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![0, 3, 12]);
        assert_eq!(connections[0].name, "Internal");
    }

    #[tokio::test]
    async fn test_bad_body_is_an_error_not_a_panic() {
        let upstream = CannedUpstream::new(200, "text/html", "<html>login</html>");
        let service = ResourceService::new(upstream, "key".into());

        let err = service.list_variables(Vec::new()).await.unwrap_err();
        assert!(matches!(err, QueryError::UpstreamDecode(_)));
    }

    #[tokio::test]
    async fn test_failure_status_is_classified() {
        let upstream = CannedUpstream::new(401, "text/plain", "unauthorized");
        let service = ResourceService::new(upstream, "key".into());

        let err = service.list_connections(Vec::new()).await.unwrap_err();
        assert_eq!(
            err,
            QueryError::UpstreamPlainText {
                status: 401,
                body: "unauthorized".into()
            }
        );
    }
}
