/// HTTP request handlers
use crate::domain::{ApiIndex, Body, BodyQuery, Health, Page};
use crate::errors::{ApiError, ApiResult};
use crate::services::BodyService;
use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::Uri,
    Json,
};
use chrono::Utc;
use std::sync::Arc;

pub const API_DESCRIPTION: &str =
    "Perseus is a catalogue API for stars, Messier objects and other celestial bodies, \
     searchable by name, position, constellation and visibility from a given place and time.";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub body_service: Arc<BodyService>,
    pub project_name: String,
    pub api_v1_str: String,
    pub api_version: String,
}

/// Health check handler
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        now: Utc::now(),
    })
}

/// API root description
pub async fn api_index(State(state): State<AppState>) -> Json<ApiIndex> {
    Json(ApiIndex {
        name: format!("{} Billion Stars API by observerly", state.project_name),
        description: API_DESCRIPTION,
        endpoint: state.api_v1_str.clone(),
        version: state.api_version.clone(),
    })
}

/// First page of bodies matching the search parameters
pub async fn list_bodies(
    State(state): State<AppState>,
    query: Result<Query<BodyQuery>, QueryRejection>,
) -> ApiResult<Json<Page<Body>>> {
    let Query(query) = query?;
    let page = state.body_service.list_first_page(&query).await?;
    Ok(Json(page))
}

/// Given page of bodies matching the search parameters
pub async fn list_bodies_paginated(
    State(state): State<AppState>,
    page: Result<Path<i64>, PathRejection>,
    query: Result<Query<BodyQuery>, QueryRejection>,
) -> ApiResult<Json<Page<Body>>> {
    let Path(page) = page?;
    let Query(query) = query?;
    let page = state.body_service.list_page(&query, page).await?;
    Ok(Json(page))
}

/// Unknown routes
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("no route for {}", uri.path()))
}
