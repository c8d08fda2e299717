use std::sync::Arc;

use crate::agents::{Retriever, Scorer};
use crate::config::ChatStyle;
use crate::metrics::Metrics;
use crate::session::SessionStore;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub retriever: Arc<dyn Retriever>,
    pub scorer: Arc<dyn Scorer>,
    pub metrics: Metrics,
    pub chat_style: ChatStyle,
}
