use std::sync::Arc;

use common::config::Settings;
use common::db::BakeryStore;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;

use crate::handlers::JsonBody;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BakeryStore>,
    pub config: Arc<Settings>,
    /// Present when the Prometheus recorder was installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new AppState instance
    pub fn new(store: Arc<dyn BakeryStore>, config: Settings) -> Self {
        Self {
            store,
            config: Arc::new(config),
            metrics: None,
        }
    }

    /// Wrap a response value, indented when `server.pretty_json` is set
    pub fn json<T: Serialize>(&self, value: T) -> JsonBody<T> {
        JsonBody::new(value, self.config.server.pretty_json)
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
