//! # Web API
//!
//! Read-only JSON API over axum. Every route is public; the monitor exposes
//! no mutating operations.

use axum::Router;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::config::WebConfig;

pub mod handlers;
pub mod response_types;
pub mod routes;
pub mod state;

pub use response_types::{ApiError, ApiResult};
pub use state::AppState;

/// Create the web application with all routes and middleware
pub fn create_app(state: AppState, web_config: &WebConfig) -> Router {
    let cors = if web_config.cors_enabled {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    let common_middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(web_config.request_timeout()))
        .layer(cors);

    let app = Router::new()
        .merge(routes::health_routes())
        .merge(routes::exec_results_routes())
        .merge(routes::log_routes())
        .merge(routes::script_routes())
        .layer(common_middleware)
        .with_state(state);

    info!(
        cors_enabled = web_config.cors_enabled,
        request_timeout_ms = web_config.request_timeout_ms,
        "Web application created with all routes and middleware"
    );
    app
}
