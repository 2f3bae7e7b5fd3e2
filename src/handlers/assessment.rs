// src/handlers/assessment.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::{
    engine::{AssessmentEngine, AttemptSnapshot},
    error::AppError,
    models::{
        question::{PublicQuestion, QUESTION_BANK},
        result::AssessmentResult,
        user::Identity,
    },
};

/// Returns the question bank with the correct indices hidden.
pub async fn questions(Extension(_user): Extension<Identity>) -> impl IntoResponse {
    let questions: Vec<PublicQuestion> = QUESTION_BANK.iter().map(PublicQuestion::from).collect();
    Json(questions)
}

/// Begins a fresh attempt for the active identity.
pub async fn start(
    State(engine): State<AssessmentEngine>,
    Extension(user): Extension<Identity>,
) -> impl IntoResponse {
    Json(engine.start(&user).await)
}

/// Current attempt snapshot; 404 if this identity has no live attempt.
pub async fn snapshot(
    State(engine): State<AssessmentEngine>,
    Extension(user): Extension<Identity>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(engine.snapshot(&user).await?))
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub question: usize,
    pub option: usize,
}

/// Records an answer for one slot. Never advances the cursor; re-answering
/// overwrites. Out-of-range indices leave the attempt untouched.
pub async fn answer(
    State(engine): State<AssessmentEngine>,
    Extension(user): Extension<Identity>,
    Json(payload): Json<AnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = engine.answer(&user, payload.question, payload.option).await?;
    Ok(Json(snapshot))
}

#[derive(Debug, Serialize)]
pub struct NextResponse {
    pub attempt: AttemptSnapshot,
    /// Present only on the transition that completed the attempt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AssessmentResult>,
}

/// Advances the attempt. A refused transition (current slot unanswered)
/// returns the unchanged snapshot rather than an error. The advance off the
/// final question completes the attempt and returns the persisted result.
pub async fn next(
    State(engine): State<AssessmentEngine>,
    Extension(user): Extension<Identity>,
) -> Result<impl IntoResponse, AppError> {
    let (attempt, result) = engine.next(&user).await?;
    Ok(Json(NextResponse { attempt, result }))
}

/// Steps back one question; a no-op at the first question.
pub async fn previous(
    State(engine): State<AssessmentEngine>,
    Extension(user): Extension<Identity>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(engine.previous(&user).await?))
}
