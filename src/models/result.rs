// src/models/result.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The persisted outcome of one completed assessment attempt.
///
/// Field names serialize in camelCase to match the store layout inherited
/// from the original client (`userId`, `totalQuestions`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    pub user_id: String,
    pub user_name: String,
    pub score: usize,
    pub total_questions: usize,

    /// round(100 * score / total_questions), in [0, 100].
    pub percentage: u32,

    pub date: DateTime<Utc>,

    /// The selected option index for each question, in question order.
    pub answers: Vec<usize>,
}

/// Aggregates over an identity's result history, as shown on the results
/// page: attempt count, mean percentage, best percentage, latest date.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultStats {
    pub count: usize,
    pub average_percentage: u32,
    pub best_percentage: u32,
    pub last_date: Option<DateTime<Utc>>,
}
