//! Core data types for the evaltrack service

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A course an evaluation belongs to
///
/// Read-only reference data, seeded into the store at startup. The code is
/// the primary key evaluations point at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Course code (e.g. "PROG10082")
    pub code: String,
    /// Descriptive course title
    pub name: String,
}

/// One graded assignment record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Row id; `None` until the store assigns one on insert. Callers may
    /// pre-populate it, in which case the store honors it.
    pub id: Option<i64>,
    /// Assignment title
    pub title: String,
    /// Course code; must reference an existing [`Course`]
    pub course: String,
    /// Achieved score
    pub grade: f64,
    /// Maximum possible score
    pub max: f64,
    /// Percentage weight toward the overall grade
    pub weight: f64,
    /// Due date
    pub due_date: NaiveDate,
}

impl Evaluation {
    /// Build an unsaved evaluation (no id yet)
    pub fn new(
        title: impl Into<String>,
        course: impl Into<String>,
        grade: f64,
        max: f64,
        weight: f64,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            course: course.into(),
            grade,
            max,
            weight,
            due_date,
        }
    }
}

/// Outcome of an update against the store
///
/// Replaces the affected-row-count sentinel: zero rows matched is a normal
/// result at the store layer, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// Exactly one row matched the id and was rewritten
    Updated,
    /// No row matched the id; the store is unchanged
    NotFound,
}
