// src/engine.rs

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::{
    error::AppError,
    models::{
        question::{QUESTION_BANK, QUESTION_COUNT},
        result::AssessmentResult,
        user::Identity,
    },
    results::ResultStore,
};

/// One in-progress assessment attempt: a cursor over the question bank plus
/// the sparse answer set.
#[derive(Debug)]
struct Attempt {
    owner_id: String,
    position: usize,
    answers: Vec<Option<usize>>,
    completed: bool,
}

impl Attempt {
    fn new(owner_id: String) -> Self {
        Self {
            owner_id,
            position: 0,
            answers: vec![None; QUESTION_COUNT],
            completed: false,
        }
    }

    /// Records an answer without advancing. Re-answering a slot overwrites
    /// the prior choice. Out-of-range indices are ignored.
    fn answer(&mut self, question: usize, option: usize) {
        if self.completed || question >= QUESTION_COUNT || option >= 4 {
            return;
        }
        self.answers[question] = Some(option);
    }

    /// Advances the cursor. Refused (returns false) while the current slot
    /// is unanswered, so a completed attempt always has a full answer set.
    /// Returns true when the advance landed on `Completed`.
    fn next(&mut self) -> bool {
        if self.completed || self.answers[self.position].is_none() {
            return false;
        }
        if self.position < QUESTION_COUNT - 1 {
            self.position += 1;
        } else {
            self.completed = true;
        }
        self.completed
    }

    /// Steps back one question. No-op at the first question or after
    /// completion.
    fn previous(&mut self) {
        if !self.completed && self.position > 0 {
            self.position -= 1;
        }
    }

    fn score(&self) -> usize {
        QUESTION_BANK
            .iter()
            .enumerate()
            .filter(|(i, q)| self.answers[*i] == Some(q.correct))
            .count()
    }

    fn snapshot(&self) -> AttemptSnapshot {
        AttemptSnapshot {
            position: self.position,
            total_questions: QUESTION_COUNT,
            answers: self.answers.clone(),
            completed: self.completed,
        }
    }
}

/// Client view of the live attempt.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptSnapshot {
    pub position: usize,
    pub total_questions: usize,
    pub answers: Vec<Option<usize>>,
    pub completed: bool,
}

/// Drives the attempt state machine and persists the outcome.
///
/// Holds at most one live attempt, owned by the identity that started it.
/// An attempt started by a previously active identity is invisible to the
/// current one. Refused transitions return the unchanged snapshot rather
/// than an error; the only hard failures are "no attempt" and storage.
#[derive(Clone)]
pub struct AssessmentEngine {
    attempt: Arc<Mutex<Option<Attempt>>>,
    results: ResultStore,
}

impl AssessmentEngine {
    pub fn new(results: ResultStore) -> Self {
        Self {
            attempt: Arc::new(Mutex::new(None)),
            results,
        }
    }

    /// Begins a fresh attempt for the given identity, discarding any prior
    /// one regardless of owner.
    pub async fn start(&self, user: &Identity) -> AttemptSnapshot {
        let mut slot = self.attempt.lock().await;
        let attempt = Attempt::new(user.id.clone());
        let snapshot = attempt.snapshot();
        *slot = Some(attempt);
        snapshot
    }

    pub async fn snapshot(&self, user: &Identity) -> Result<AttemptSnapshot, AppError> {
        let slot = self.attempt.lock().await;
        Self::owned(&slot, user).map(Attempt::snapshot)
    }

    pub async fn answer(
        &self,
        user: &Identity,
        question: usize,
        option: usize,
    ) -> Result<AttemptSnapshot, AppError> {
        let mut slot = self.attempt.lock().await;
        let attempt = Self::owned_mut(&mut slot, user)?;
        attempt.answer(question, option);
        Ok(attempt.snapshot())
    }

    /// Advances the attempt. When the advance completes it, the result
    /// record is built and appended exactly once; the record is returned
    /// alongside the final snapshot.
    pub async fn next(
        &self,
        user: &Identity,
    ) -> Result<(AttemptSnapshot, Option<AssessmentResult>), AppError> {
        let mut slot = self.attempt.lock().await;
        let attempt = Self::owned_mut(&mut slot, user)?;

        let finished = attempt.next();
        let snapshot = attempt.snapshot();

        if !finished {
            return Ok((snapshot, None));
        }

        let score = attempt.score();
        let record = AssessmentResult {
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            score,
            total_questions: QUESTION_COUNT,
            percentage: ((100 * score) as f64 / QUESTION_COUNT as f64).round() as u32,
            date: Utc::now(),
            answers: attempt.answers.iter().map(|a| a.unwrap_or(0)).collect(),
        };
        self.results.append(&record).await?;

        tracing::info!(
            "Assessment completed by '{}': {}/{} ({}%)",
            record.user_name,
            record.score,
            record.total_questions,
            record.percentage
        );

        Ok((snapshot, Some(record)))
    }

    pub async fn previous(&self, user: &Identity) -> Result<AttemptSnapshot, AppError> {
        let mut slot = self.attempt.lock().await;
        let attempt = Self::owned_mut(&mut slot, user)?;
        attempt.previous();
        Ok(attempt.snapshot())
    }

    fn owned<'a>(
        slot: &'a Option<Attempt>,
        user: &Identity,
    ) -> Result<&'a Attempt, AppError> {
        slot.as_ref()
            .filter(|a| a.owner_id == user.id)
            .ok_or_else(|| AppError::NotFound("No active assessment attempt".to_string()))
    }

    fn owned_mut<'a>(
        slot: &'a mut Option<Attempt>,
        user: &Identity,
    ) -> Result<&'a mut Attempt, AppError> {
        slot.as_mut()
            .filter(|a| a.owner_id == user.id)
            .ok_or_else(|| AppError::NotFound("No active assessment attempt".to_string()))
    }
}
