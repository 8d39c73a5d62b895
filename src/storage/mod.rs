//! Storage layer for the evaltrack service
//!
//! Provides the store abstraction and the SQLite implementation used to
//! persist evaluations against the seeded course table.

pub mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::{Course, Evaluation, UpdateOutcome};
use async_trait::async_trait;

/// Store trait defining the evaluation persistence operations
#[async_trait]
pub trait EvalStore: Send + Sync {
    /// List all courses
    async fn courses(&self) -> Result<Vec<Course>>;

    /// List all stored evaluations
    async fn evaluations(&self) -> Result<Vec<Evaluation>>;

    /// Fetch one evaluation by id; `None` when no row has that id
    async fn evaluation(&self, id: i64) -> Result<Option<Evaluation>>;

    /// Insert a new evaluation, returning its row id
    ///
    /// Fails with [`crate::EvalTrackError::Constraint`] when the course code
    /// does not reference a seeded course; no row is written in that case.
    async fn add_evaluation(&self, eval: &Evaluation) -> Result<i64>;

    /// Rewrite every field of the row matching `eval.id`
    ///
    /// A missing id is reported as [`UpdateOutcome::NotFound`], never as an
    /// error.
    async fn update_evaluation(&self, eval: &Evaluation) -> Result<UpdateOutcome>;
}
