// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    error::AppError,
    placeholder::{ApiResult, PlaceholderClient, PlaceholderPost},
    results::ResultStore,
};

/// Maps a placeholder-API envelope onto an HTTP response: the body is the
/// envelope either way, with 502 signalling the upstream failure.
fn proxy_response(result: ApiResult<serde_json::Value>) -> Response {
    let status = if result.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };
    (status, Json(result)).into_response()
}

/// Lists users from the placeholder API.
pub async fn list_users(State(client): State<PlaceholderClient>) -> Response {
    proxy_response(client.fetch_users().await)
}

/// Lists the first ten posts from the placeholder API.
pub async fn list_posts(State(client): State<PlaceholderClient>) -> Response {
    proxy_response(client.fetch_posts().await)
}

pub async fn create_post(
    State(client): State<PlaceholderClient>,
    Json(payload): Json<PlaceholderPost>,
) -> Response {
    proxy_response(client.create_post(&payload).await)
}

pub async fn update_post(
    State(client): State<PlaceholderClient>,
    Path(id): Path<i64>,
    Json(payload): Json<PlaceholderPost>,
) -> Response {
    proxy_response(client.update_post(id, &payload).await)
}

pub async fn delete_post(
    State(client): State<PlaceholderClient>,
    Path(id): Path<i64>,
) -> Response {
    proxy_response(client.delete_post(id).await)
}

/// Lists every assessment record across all identities.
pub async fn list_assessments(
    State(results): State<ResultStore>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(results.all().await?))
}

/// Deletes the assessment record at the given global index.
///
/// Any logged-in operator may delete any identity's record; the panel has
/// no ownership check by design.
pub async fn delete_assessment(
    State(results): State<ResultStore>,
    Path(index): Path<usize>,
) -> Result<impl IntoResponse, AppError> {
    results.remove(index).await?;
    tracing::info!("Assessment record {} removed via admin panel", index);
    Ok(Json(json!({ "success": true })))
}
