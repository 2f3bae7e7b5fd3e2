// src/handlers/auth.rs

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{Identity, LoginRequest, PublicUser, RegisterRequest},
    session::SessionManager,
    utils::captcha,
};

/// Registers a new account and makes it the active session.
///
/// The captcha pair is checked first; a mismatch never touches the
/// credential store. Returns 201 Created with the account (excluding the
/// password), or 409 if the email is taken.
pub async fn register(
    State(sessions): State<SessionManager>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    if !captcha::verify(&payload.captcha_challenge, &payload.captcha_answer) {
        return Err(AppError::BadRequest(
            "Captcha verification failed".to_string(),
        ));
    }

    let identity = sessions
        .register(&payload.name, &payload.email, &payload.password)
        .await?;

    tracing::info!("Registered new user '{}'", identity.email);
    Ok((StatusCode::CREATED, Json(PublicUser::from(&identity))))
}

/// Logs in with an exact (email, password) match and activates the session.
pub async fn login(
    State(sessions): State<SessionManager>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let identity = sessions.login(&payload.email, &payload.password).await?;

    Ok(Json(json!({
        "success": true,
        "user": PublicUser::from(&identity),
    })))
}

/// Clears the active session. Succeeds even when nobody is logged in.
pub async fn logout(
    State(sessions): State<SessionManager>,
) -> Result<impl IntoResponse, AppError> {
    sessions.logout().await?;
    Ok(Json(json!({ "success": true })))
}

/// Returns the identity behind the active session.
pub async fn me(Extension(user): Extension<Identity>) -> impl IntoResponse {
    Json(PublicUser::from(&user))
}

/// Issues a fresh captcha challenge for the registration form.
pub async fn captcha() -> impl IntoResponse {
    Json(json!({ "captcha": captcha::generate() }))
}
