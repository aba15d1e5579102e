//! # peer-lobby
//!
//! WebSocket matchmaking lobby that pairs anonymous clients one-to-one so
//! they can go on to open a direct peer connection.
//!
//! Clients send `find_match` with a peer identifier of their choosing
//! and optionally a partition key. The lobby answers with `match_found`
//! carrying the partner's identifier, and keeps every client informed of
//! the connected population and queue lengths.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket, HTTP)
//!     │
//!     ├── WS Handler (ws/)          REST Handlers (api/)
//!     │
//!     ├── MatchEngine (service/)  ◄── RetryScheduler (service/)
//!     ├── CountBroadcaster (service/)
//!     ├── EventBus (domain/)
//!     │
//!     └── ConnectionRegistry + WaitingPool (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod ws;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use app_state::AppState;
use ws::handler::ws_handler;

/// Builds the full application router: REST, WebSocket, and middleware.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
