//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::MatchEngine;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The matchmaking engine. Also owns the event bus.
    pub engine: Arc<MatchEngine>,
}
