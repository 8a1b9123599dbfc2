use std::collections::BTreeMap;

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{MovieSummary, Recommendation},
    services::catalog::CatalogPage,
};

use super::AppState;

// Request types

/// Body of `POST /api/recommend`, e.g. `{"ratings": {"m1613": 5, "m1755": 4}}`
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub ratings: Option<BTreeMap<String, f64>>,
}

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Recommend movies for the submitted ratings
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> AppResult<Json<Vec<Recommendation>>> {
    let Json(request) = payload?;
    let ratings = request.ratings.ok_or_else(|| {
        AppError::InvalidInput("Please provide 'ratings' dictionary in the request body.".to_string())
    })?;

    let user = state.context.user_vector(&ratings)?;
    tracing::info!(
        request_id = %request_id,
        submitted = ratings.len(),
        recognized = user.len(),
        "Processing recommendation request"
    );

    Ok(Json(state.context.recommend(&user)))
}

/// Most popular movies
pub async fn top_movies(State(state): State<AppState>) -> Json<Vec<MovieSummary>> {
    Json(state.context.top_k())
}

/// Popularity-ordered movie listing, one page at a time
pub async fn list_movies(
    State(state): State<AppState>,
    query: Result<Query<CatalogQuery>, QueryRejection>,
) -> AppResult<Json<CatalogPage>> {
    let Query(params) = query?;
    let page = params.page.unwrap_or(1);
    let per_page = params.per_page.unwrap_or(state.default_per_page);

    Ok(Json(state.context.list_catalog(page, per_page)?))
}
