//! HTTP boundary: router composition, middleware chain, and response
//! framing for the device-facing endpoints.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use sensecap_core::AppState;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Builds the full application router: a bare `/health` route plus the
/// `/v1` and `/v2` device-facing routers, wrapped (outermost first) in
/// CORS, request logging, device-id validation, and token validation.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let v1 = Router::new().route(
        "/notification/event",
        post(handlers::notification_event_handler),
    );
    let v1 = v1.route("/watcher/vision", post(handlers::vision_handler));

    let v2 = Router::new()
        .route(
            "/watcher/talk/audio_stream",
            post(handlers::audio_stream_handler),
        )
        .route(
            "/watcher/talk/view_task_detail",
            get(handlers::view_task_detail_handler).post(handlers::view_task_detail_handler),
        );

    let device_facing = Router::new()
        .nest("/v1", v1)
        .nest("/v2", v2)
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::token_validator,
        ))
        .route_layer(axum_middleware::from_fn(middleware::device_id_validator))
        .layer(axum_middleware::from_fn(middleware::request_logger))
        .layer(cors);

    Router::new()
        .route("/health", get(handlers::health_handler))
        .merge(device_facing)
        .fallback(handlers::not_found_handler)
        .with_state(state)
}
