// src/handlers/results.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};

use crate::{error::AppError, models::user::Identity, results::ResultStore};

/// The active identity's full result history, in insertion order.
pub async fn list(
    State(results): State<ResultStore>,
    Extension(user): Extension<Identity>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(results.all_for_identity(&user.id).await?))
}

/// The most recent result, if it belongs to the active identity.
pub async fn latest(
    State(results): State<ResultStore>,
    Extension(user): Extension<Identity>,
) -> Result<impl IntoResponse, AppError> {
    let record = results
        .most_recent_for_identity(&user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("No recent assessment result".to_string()))?;
    Ok(Json(record))
}

/// Aggregates over the identity's history (count, average, best, last date).
pub async fn stats(
    State(results): State<ResultStore>,
    Extension(user): Extension<Identity>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(results.stats_for_identity(&user.id).await?))
}
