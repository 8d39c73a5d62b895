//! SQLite store implementation
//!
//! Persists evaluations with rusqlite behind a deadpool connection pool.
//! Foreign keys are enforced on every connection so an insert referencing an
//! unknown course code is rejected by the database rather than by ad-hoc
//! validation.

use crate::error::{EvalTrackError, Result};
use crate::storage::EvalStore;
use crate::types::{Course, Evaluation, UpdateOutcome};
use async_trait::async_trait;
use chrono::NaiveDate;
use deadpool_sqlite::{Config, Pool, Runtime};
use std::path::Path;
use tracing::{debug, info};

/// Schema and seed data, safe to run on every startup
const SCHEMA_SQL: &str = "
    CREATE TABLE IF NOT EXISTS courses (
        code TEXT PRIMARY KEY,
        name TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS evaluations (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        title       TEXT NOT NULL,
        course_code TEXT NOT NULL REFERENCES courses (code),
        grade       REAL NOT NULL,
        max_score   REAL NOT NULL,
        weight      REAL NOT NULL,
        due_date    TEXT NOT NULL
    );

    INSERT OR IGNORE INTO courses (code, name) VALUES
        ('PROG10082', 'Object Oriented Programming 1'),
        ('PROG24178', 'Object Oriented Programming 2'),
        ('SYST10199', 'Web Programming');
";

/// SQLite-backed evaluation store with connection pooling
pub struct SqliteStore {
    pool: Pool,
}

impl SqliteStore {
    /// Create a new store with a connection pool over the given database file
    ///
    /// # Example
    /// ```ignore
    /// let store = SqliteStore::new("evaltrack.db")?;
    /// store.migrate().await?;
    /// ```
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let path_str = db_path.as_ref().to_string_lossy().to_string();
        info!("Creating SQLite store pool at: {}", path_str);

        let config = Config::new(path_str);
        let pool = config.create_pool(Runtime::Tokio1).map_err(|e| {
            EvalTrackError::Database(format!("Failed to create connection pool: {}", e))
        })?;

        Ok(Self { pool })
    }

    /// Create the courses and evaluations tables and seed the course set
    ///
    /// Idempotent; call once during startup.
    pub async fn migrate(&self) -> Result<()> {
        info!("Running schema setup");

        let conn = self.conn().await?;
        conn.interact(|conn| -> Result<()> {
            conn.pragma_update(None, "foreign_keys", true)?;
            conn.execute_batch(SCHEMA_SQL)?;
            Ok(())
        })
        .await
        .map_err(interact_error)??;

        info!("Schema setup completed");
        Ok(())
    }

    async fn conn(&self) -> Result<deadpool_sqlite::Object> {
        self.pool.get().await.map_err(|e| {
            EvalTrackError::Database(format!("Failed to get connection from pool: {}", e))
        })
    }
}

/// Map a pool interaction failure (panicked or aborted closure) to a crate error
fn interact_error(e: deadpool_sqlite::InteractError) -> EvalTrackError {
    EvalTrackError::Database(format!("Pool interaction failed: {}", e))
}

/// Convert a database row to an Evaluation
fn row_to_eval(row: &rusqlite::Row<'_>) -> rusqlite::Result<Evaluation> {
    let due_str: String = row.get("due_date")?;
    let due_date = due_str.parse::<NaiveDate>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Evaluation {
        id: Some(row.get("id")?),
        title: row.get("title")?,
        course: row.get("course_code")?,
        grade: row.get("grade")?,
        max: row.get("max_score")?,
        weight: row.get("weight")?,
        due_date,
    })
}

#[async_trait]
impl EvalStore for SqliteStore {
    async fn courses(&self) -> Result<Vec<Course>> {
        let conn = self.conn().await?;
        let courses = conn
            .interact(|conn| -> Result<Vec<Course>> {
                let mut stmt = conn.prepare("SELECT code, name FROM courses ORDER BY code")?;
                let rows = stmt.query_map([], |row| {
                    Ok(Course {
                        code: row.get("code")?,
                        name: row.get("name")?,
                    })
                })?;
                Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
            })
            .await
            .map_err(interact_error)??;

        debug!("Fetched {} courses", courses.len());
        Ok(courses)
    }

    async fn evaluations(&self) -> Result<Vec<Evaluation>> {
        let conn = self.conn().await?;
        let evals = conn
            .interact(|conn| -> Result<Vec<Evaluation>> {
                let mut stmt = conn.prepare(
                    "SELECT id, title, course_code, grade, max_score, weight, due_date
                     FROM evaluations ORDER BY id",
                )?;
                let rows = stmt.query_map([], row_to_eval)?;
                Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
            })
            .await
            .map_err(interact_error)??;

        debug!("Fetched {} evaluations", evals.len());
        Ok(evals)
    }

    async fn evaluation(&self, id: i64) -> Result<Option<Evaluation>> {
        debug!("Looking up evaluation id={}", id);

        let conn = self.conn().await?;
        conn.interact(move |conn| -> Result<Option<Evaluation>> {
            let mut stmt = conn.prepare(
                "SELECT id, title, course_code, grade, max_score, weight, due_date
                 FROM evaluations WHERE id = ?1",
            )?;
            match stmt.query_row(rusqlite::params![id], row_to_eval) {
                Ok(eval) => Ok(Some(eval)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(interact_error)?
    }

    async fn add_evaluation(&self, eval: &Evaluation) -> Result<i64> {
        debug!("Inserting evaluation '{}' ({})", eval.title, eval.course);

        let eval = eval.clone();
        let conn = self.conn().await?;
        let id = conn
            .interact(move |conn| -> Result<i64> {
                conn.pragma_update(None, "foreign_keys", true)?;
                let due = eval.due_date.to_string();
                match eval.id {
                    // Caller-supplied id is honored; a collision surfaces as
                    // a primary-key constraint violation.
                    Some(id) => {
                        conn.execute(
                            "INSERT INTO evaluations
                                 (id, title, course_code, grade, max_score, weight, due_date)
                             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                            rusqlite::params![
                                id, eval.title, eval.course, eval.grade, eval.max, eval.weight,
                                due,
                            ],
                        )?;
                        Ok(id)
                    }
                    None => {
                        conn.execute(
                            "INSERT INTO evaluations
                                 (title, course_code, grade, max_score, weight, due_date)
                             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                            rusqlite::params![
                                eval.title, eval.course, eval.grade, eval.max, eval.weight, due,
                            ],
                        )?;
                        Ok(conn.last_insert_rowid())
                    }
                }
            })
            .await
            .map_err(interact_error)??;

        debug!("Evaluation inserted with id={}", id);
        Ok(id)
    }

    async fn update_evaluation(&self, eval: &Evaluation) -> Result<UpdateOutcome> {
        let Some(id) = eval.id else {
            debug!("Update requested without an id; nothing to match");
            return Ok(UpdateOutcome::NotFound);
        };

        debug!("Updating evaluation id={}", id);

        let eval = eval.clone();
        let conn = self.conn().await?;
        let affected = conn
            .interact(move |conn| -> Result<usize> {
                conn.pragma_update(None, "foreign_keys", true)?;
                Ok(conn.execute(
                    "UPDATE evaluations
                     SET title = ?2, course_code = ?3, grade = ?4, max_score = ?5,
                         weight = ?6, due_date = ?7
                     WHERE id = ?1",
                    rusqlite::params![
                        id,
                        eval.title,
                        eval.course,
                        eval.grade,
                        eval.max,
                        eval.weight,
                        eval.due_date.to_string(),
                    ],
                )?)
            })
            .await
            .map_err(interact_error)??;

        if affected == 0 {
            debug!("No evaluation matched id={}", id);
            Ok(UpdateOutcome::NotFound)
        } else {
            Ok(UpdateOutcome::Updated)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_store() -> (SqliteStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let store = SqliteStore::new(db_path).unwrap();
        store.migrate().await.unwrap();
        (store, temp_dir)
    }

    fn sample_eval() -> Evaluation {
        Evaluation::new(
            "Assignment1",
            "PROG10082",
            12.0,
            15.0,
            6.0,
            NaiveDate::from_ymd_opt(2021, 7, 27).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let (store, _temp) = create_test_store().await;
        store.migrate().await.unwrap();

        // Seed rows are not duplicated
        assert_eq!(store.courses().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_store_assigns_ids() {
        let (store, _temp) = create_test_store().await;

        let first = store.add_evaluation(&sample_eval()).await.unwrap();
        let second = store.add_evaluation(&sample_eval()).await.unwrap();

        assert!(second > first);
    }

    #[tokio::test]
    async fn test_supplied_id_is_honored() {
        let (store, _temp) = create_test_store().await;

        let mut eval = sample_eval();
        eval.id = Some(42);
        assert_eq!(store.add_evaluation(&eval).await.unwrap(), 42);

        let fetched = store.evaluation(42).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Assignment1");
    }

    #[tokio::test]
    async fn test_colliding_id_is_a_constraint_error() {
        let (store, _temp) = create_test_store().await;

        let mut eval = sample_eval();
        eval.id = Some(1);
        store.add_evaluation(&eval).await.unwrap();

        let result = store.add_evaluation(&eval).await;
        assert!(matches!(result, Err(EvalTrackError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_update_without_id_is_not_found() {
        let (store, _temp) = create_test_store().await;

        let outcome = store.update_evaluation(&sample_eval()).await.unwrap();
        assert_eq!(outcome, UpdateOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_date_round_trips_through_text_column() {
        let (store, _temp) = create_test_store().await;

        let eval = sample_eval();
        let id = store.add_evaluation(&eval).await.unwrap();

        let fetched = store.evaluation(id).await.unwrap().unwrap();
        assert_eq!(fetched.due_date, eval.due_date);
    }
}
