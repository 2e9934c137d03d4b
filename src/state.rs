//! Shared application state for all routes.

use crate::config::ResolvedModel;
use crate::session::SessionProvider;
use std::sync::Arc;

/// Name shown by the welcome route, e.g. "Items API".
#[derive(Clone, Debug)]
pub struct ServiceInfo {
    pub title: String,
    pub description: String,
}

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionProvider>,
    pub model: Arc<ResolvedModel>,
    pub service: Arc<ServiceInfo>,
}

impl AppState {
    pub fn new(sessions: impl SessionProvider + 'static, model: ResolvedModel, service: ServiceInfo) -> Self {
        AppState {
            sessions: Arc::new(sessions),
            model: Arc::new(model),
            service: Arc::new(service),
        }
    }
}
