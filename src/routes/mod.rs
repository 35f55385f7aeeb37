/// Application routes configuration
use crate::config::AppConfig;
use crate::handlers::{
    api_index, health, list_bodies, list_bodies_paginated, not_found, AppState,
};
use axum::{
    http::{HeaderName, HeaderValue},
    response::Redirect,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::warn;

pub const API_VERSION_HEADER: &str = "x-perseus-api-version";

/// Path template of the paginated body listing, relative to the API prefix
pub const BODIES_PAGE_ROUTE: &str = "/bodies/{page}";

/// Build the application router with all routes
pub fn build_router(state: AppState, config: &AppConfig) -> Router {
    let prefix = config.api_v1_str.clone();

    let api_v1 = Router::new()
        .route("/bodies", get(list_bodies))
        .route("/bodies/", get(list_bodies))
        .route("/bodies/:page", get(list_bodies_paginated));

    let version = HeaderValue::from_str(&config.api_version).unwrap_or_else(|_| {
        warn!("API_VERSION is not a valid header value, sending 'unknown'");
        HeaderValue::from_static("unknown")
    });

    let root_target = prefix.clone();

    Router::new()
        .route("/", get(move || async move { Redirect::temporary(&root_target) }))
        .route("/health", get(health))
        .route(&prefix, get(api_index))
        .nest(&prefix, api_v1)
        .fallback(not_found)
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static(API_VERSION_HEADER),
            version,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o.trim_end_matches('/')).ok())
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}
