// src/handlers/chat.rs

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use tokio_util::sync::CancellationToken;
use validator::Validate;

use crate::{
    chat,
    error::AppError,
    models::{chat::SendMessageRequest, user::Identity},
    store::Store,
    utils::html::clean_html,
};

/// Returns the full chat transcript.
pub async fn list(
    State(store): State<Store>,
    Extension(_user): Extension<Identity>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(chat::transcript(&store).await?))
}

/// Appends the sender's message and schedules the canned agent reply about
/// one second later. Message text is sanitized before it is persisted.
pub async fn send(
    State(store): State<Store>,
    State(shutdown): State<CancellationToken>,
    Extension(user): Extension<Identity>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let text = clean_html(payload.message.trim());
    if text.is_empty() {
        return Err(AppError::BadRequest("Message is empty".to_string()));
    }

    let entry = chat::append_message(&store, &user.name, &text, false).await?;
    chat::spawn_bot_reply(store, shutdown);

    Ok((StatusCode::CREATED, Json(entry)))
}
