//! Evaltrack - course evaluation tracker
//!
//! A single-process HTTP service that records graded course evaluations
//! against a seeded course list:
//! - **Types**: core data structures (Evaluation, Course, UpdateOutcome)
//! - **Storage**: pooled SQLite store with foreign-key enforcement
//! - **Api**: axum router serving the form, submit, and edit routes
//!
//! # Example
//!
//! ```ignore
//! use evaltrack::{api::{ApiServer, ApiServerConfig}, SqliteStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = SqliteStore::new("evaltrack.db")?;
//!     store.migrate().await?;
//!
//!     ApiServer::new(ApiServerConfig::default(), Arc::new(store))
//!         .serve()
//!         .await
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{EvalTrackError, Result};
pub use storage::{sqlite::SqliteStore, EvalStore};
pub use types::{Course, Evaluation, UpdateOutcome};
