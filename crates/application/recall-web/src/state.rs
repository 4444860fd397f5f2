//! Application state for the web server

use chrono::{DateTime, Utc};
use recall_charts::ChartRenderer;
use recall_fetch::RecallSource;
use recall_gemini::TextGenerator;
use recall_store::VehicleStore;
use std::sync::Arc;

/// Shared state handed to every handler
pub struct AppState {
    /// Selected vehicle, persisted between requests
    pub store: VehicleStore,
    /// Where recall data comes from
    pub recalls: Arc<dyn RecallSource>,
    /// Chatbot backend
    pub chatbot: Arc<dyn TextGenerator>,
    pub charts: ChartRenderer,
    started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        store: VehicleStore,
        recalls: Arc<dyn RecallSource>,
        chatbot: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            store,
            recalls,
            chatbot,
            charts: ChartRenderer::default(),
            started_at: Utc::now(),
        }
    }

    /// Use a different chart size
    pub fn with_charts(mut self, charts: ChartRenderer) -> Self {
        self.charts = charts;
        self
    }

    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}
