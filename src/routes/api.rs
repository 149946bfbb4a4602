use std::sync::Arc;

use axum::{http::StatusCode, routing::get, Json, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::handlers::{diagnostics, health_check, ready_check};
use crate::models::ErrorResponse;
use crate::ws::handler::websocket_handler;
use crate::ws::registry::RoomRegistry;

/// Create API routes
pub fn create_api_routes(registry: Arc<RoomRegistry>) -> Router {
    Router::new()
        .route("/v1/health", get(health_check))
        .route("/v1/ready", get(ready_check))
        .route("/v1/diagnostics", get(diagnostics))
        .with_state(registry)
}

/// Assemble the application router: API routes, the collaboration
/// WebSocket endpoint, Swagger UI, and request tracing.
pub fn build_app(registry: Arc<RoomRegistry>) -> Router {
    Router::new()
        .nest("/api", create_api_routes(registry.clone()))
        .route("/ws", get(websocket_handler).with_state(registry))
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
}

async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            code: 404,
            status: "error".to_string(),
            error: "Not found".to_string(),
        }),
    )
}
