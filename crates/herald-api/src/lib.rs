pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{
    error_handling::HandleErrorLayer,
    middleware as axum_middleware,
    routing::{get, post},
    BoxError, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::{timeout::error::Elapsed, ServiceBuilder};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::error::ApiError;
use crate::middleware::logging;
use crate::routes::{analytics, articles, health, sessions};
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Articles
        .route(
            "/articles",
            get(articles::list_articles).delete(articles::clear_articles),
        )
        .route("/articles/ingest", post(articles::ingest_articles))
        // Sessions
        .route("/sessions", post(sessions::create_session))
        .route(
            "/sessions/:session_id",
            get(sessions::get_session).delete(sessions::reset_session),
        )
        .route("/sessions/:session_id/query", post(sessions::query_session))
        .route("/sessions/:session_id/cancel", post(sessions::cancel_query))
        // Analytics
        .route("/analytics", get(analytics::get_analytics));

    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    api_routes
        .layer(axum_middleware::from_fn(logging::log_request))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .timeout(timeout),
        )
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_timeout_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        ApiError::Timeout
    } else {
        ApiError::Internal(err.to_string())
    }
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.cors.enabled {
        let cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any);

        if config.cors.origins.iter().any(|o| o == "*") {
            cors.allow_origin(Any)
        } else {
            let parsed_origins: Vec<axum::http::HeaderValue> = config
                .cors
                .origins
                .iter()
                .filter_map(|o| o.parse::<axum::http::HeaderValue>().ok())
                .collect();

            cors.allow_origin(parsed_origins)
        }
    } else {
        CorsLayer::permissive()
    }
}
