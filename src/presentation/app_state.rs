// Application state for HTTP handlers
use crate::application::query_service::QueryService;
use crate::application::resource_service::ResourceService;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct AppState {
    pub query_service: QueryService,
    pub resource_service: ResourceService,
    pub api_key_configured: bool,
    /// Cancelled on shutdown; every batch runs under a child token.
    pub shutdown: CancellationToken,
}
