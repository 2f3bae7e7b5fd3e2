// src/results.rs

use crate::{
    error::AppError,
    models::result::{AssessmentResult, ResultStats},
    store::{Store, keys},
};

/// Append-only collection of assessment outcomes.
///
/// The full history lives under the 'assessments' key as one global,
/// insertion-ordered list; per-identity views filter on read. The most
/// recent record is duplicated under 'lastAssessment' for quick lookup.
#[derive(Clone)]
pub struct ResultStore {
    store: Store,
}

impl ResultStore {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn append(&self, record: &AssessmentResult) -> Result<(), AppError> {
        let _cycle = self.store.lock_updates().await;
        let mut all: Vec<AssessmentResult> =
            self.store.get(keys::ASSESSMENTS).await?.unwrap_or_default();
        all.push(record.clone());
        self.store.set(keys::ASSESSMENTS, &all).await?;
        self.store.set(keys::LAST_ASSESSMENT, record).await?;
        Ok(())
    }

    /// All records in the global insertion order, for the admin view.
    pub async fn all(&self) -> Result<Vec<AssessmentResult>, AppError> {
        Ok(self.store.get(keys::ASSESSMENTS).await?.unwrap_or_default())
    }

    pub async fn all_for_identity(&self, id: &str) -> Result<Vec<AssessmentResult>, AppError> {
        let all = self.all().await?;
        Ok(all.into_iter().filter(|r| r.user_id == id).collect())
    }

    /// The globally last-recorded result, but only if it belongs to the
    /// given identity.
    pub async fn most_recent_for_identity(
        &self,
        id: &str,
    ) -> Result<Option<AssessmentResult>, AppError> {
        let last: Option<AssessmentResult> = self.store.get(keys::LAST_ASSESSMENT).await?;
        Ok(last.filter(|r| r.user_id == id))
    }

    /// Deletes the record at the given position in the global ordering.
    /// Administrative only; there is deliberately no ownership check.
    pub async fn remove(&self, index: usize) -> Result<(), AppError> {
        let _cycle = self.store.lock_updates().await;
        let mut all: Vec<AssessmentResult> =
            self.store.get(keys::ASSESSMENTS).await?.unwrap_or_default();

        if index >= all.len() {
            return Err(AppError::NotFound(format!(
                "No assessment record at index {}",
                index
            )));
        }

        all.remove(index);
        self.store.set(keys::ASSESSMENTS, &all).await?;
        Ok(())
    }

    /// Aggregates for the results page: attempt count, mean percentage
    /// (rounded), best percentage, date of the newest record.
    pub async fn stats_for_identity(&self, id: &str) -> Result<ResultStats, AppError> {
        let records = self.all_for_identity(id).await?;

        if records.is_empty() {
            return Ok(ResultStats {
                count: 0,
                average_percentage: 0,
                best_percentage: 0,
                last_date: None,
            });
        }

        let sum: u32 = records.iter().map(|r| r.percentage).sum();
        Ok(ResultStats {
            count: records.len(),
            average_percentage: (sum as f64 / records.len() as f64).round() as u32,
            best_percentage: records.iter().map(|r| r.percentage).max().unwrap_or(0),
            last_date: records.last().map(|r| r.date),
        })
    }
}
