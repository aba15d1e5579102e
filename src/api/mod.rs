//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Resource endpoints are mounted under `/api/v1`; system endpoints at
//! the root.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI document for the REST surface.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "peer-lobby",
        description = "Anonymous one-to-one matchmaking lobby. Matchmaking itself runs over the `/ws` WebSocket endpoint."
    ),
    paths(
        handlers::system::root_handler,
        handlers::system::health_handler,
        handlers::stats::stats_handler,
    ),
    components(schemas(
        dto::StatsResponse,
        crate::domain::QueueCounts,
        crate::domain::PartitionKey,
        crate::error::ErrorResponse,
        crate::error::ErrorBody,
    )),
    tags(
        (name = "System", description = "Liveness and health"),
        (name = "Lobby", description = "Matchmaking counters"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
}
