//! HTTP server for the evaluation tracker

use super::views;
use crate::error::EvalTrackError;
use crate::storage::EvalStore;
use crate::types::{Evaluation, UpdateOutcome};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info, warn};

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Server address
    pub addr: SocketAddr,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            addr: ([127, 0, 0, 1], 3000).into(),
        }
    }
}

/// API server state
#[derive(Clone)]
struct AppState {
    /// Evaluation store
    store: Arc<dyn EvalStore>,
}

/// API server
pub struct ApiServer {
    config: ApiServerConfig,
    store: Arc<dyn EvalStore>,
}

/// Build the application router over a store
///
/// Exposed separately from [`ApiServer`] so tests can drive the router
/// in-process without binding a socket.
pub fn router(store: Arc<dyn EvalStore>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/evalc", get(eval_form_handler))
        .route("/evals", post(submit_eval_handler))
        .route("/editEvaluation/:id", get(edit_eval_handler))
        .with_state(AppState { store })
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

impl ApiServer {
    /// Create new API server over a store
    pub fn new(config: ApiServerConfig, store: Arc<dyn EvalStore>) -> Self {
        Self { config, store }
    }

    /// Start serving with dynamic port allocation
    ///
    /// Tries the configured address first, then a few alternative ports if
    /// the primary port is unavailable.
    pub async fn serve(self) -> anyhow::Result<()> {
        let router = router(self.store);

        match tokio::net::TcpListener::bind(self.config.addr).await {
            Ok(listener) => {
                info!("Evaluation tracker listening on http://{}", self.config.addr);
                axum::serve(listener, router).await?;
                return Ok(());
            }
            Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
                debug!(
                    "Port {} in use, trying alternative ports...",
                    self.config.addr.port()
                );
            }
            Err(e) => return Err(e.into()),
        }

        let base_port = self.config.addr.port();
        for offset in 1..=10 {
            let alt_addr = SocketAddr::new(self.config.addr.ip(), base_port + offset);
            match tokio::net::TcpListener::bind(alt_addr).await {
                Ok(listener) => {
                    info!("Evaluation tracker listening on http://{}", alt_addr);
                    axum::serve(listener, router).await?;
                    return Ok(());
                }
                Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(anyhow::anyhow!(
            "All ports ({}-{}) are in use",
            base_port,
            base_port + 10
        ))
    }
}

/// Form payload for POST /evals
///
/// Carries the explicit `edit` flag selecting the create or update flow;
/// nothing about the submission lives in session state.
#[derive(Debug, Deserialize)]
struct EvaluationForm {
    #[serde(default)]
    id: Option<i64>,
    title: String,
    course: String,
    grade: f64,
    max: f64,
    weight: f64,
    due_date: NaiveDate,
    #[serde(default)]
    edit: bool,
}

impl From<EvaluationForm> for Evaluation {
    fn from(form: EvaluationForm) -> Self {
        Evaluation {
            id: form.id,
            title: form.title,
            course: form.course,
            grade: form.grade,
            max: form.max,
            weight: form.weight,
            due_date: form.due_date,
        }
    }
}

fn internal_error(e: EvalTrackError) -> Response {
    warn!("Store operation failed: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(views::error("internal error")),
    )
        .into_response()
}

/// Landing page handler
async fn index_handler() -> Html<String> {
    Html(views::index())
}

/// Blank evaluation form handler
///
/// Loads courses from the store on every request; nothing is cached in
/// session state.
async fn eval_form_handler(State(state): State<AppState>) -> Response {
    let courses = match state.store.courses().await {
        Ok(courses) => courses,
        Err(e) => return internal_error(e),
    };

    let blank = Evaluation::new(
        "",
        "",
        0.0,
        0.0,
        0.0,
        chrono::Local::now().date_naive(),
    );
    Html(views::evaluation_form(&courses, &blank, false)).into_response()
}

/// Submit handler for both the create and edit flows
async fn submit_eval_handler(
    State(state): State<AppState>,
    Form(form): Form<EvaluationForm>,
) -> Response {
    let edit = form.edit;
    let eval: Evaluation = form.into();

    if edit {
        match state.store.update_evaluation(&eval).await {
            Ok(UpdateOutcome::Updated) => {
                let id = eval.id.unwrap_or_default();
                debug!("Updated evaluation id={}", id);
                render_results(&state, Some(id)).await
            }
            Ok(UpdateOutcome::NotFound) => {
                debug!("Update rejected: no evaluation matches id={:?}", eval.id);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Html(views::error("no evaluation with that id exists")),
                )
                    .into_response()
            }
            Err(e) => internal_error(e),
        }
    } else {
        match state.store.add_evaluation(&eval).await {
            Ok(id) => {
                debug!("Created evaluation id={}", id);
                render_results(&state, None).await
            }
            Err(EvalTrackError::Constraint(reason)) => {
                debug!("Insert rejected: {}", reason);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Html(views::error("the evaluation could not be saved")),
                )
                    .into_response()
            }
            Err(e) => internal_error(e),
        }
    }
}

/// Render the results listing, with the evalId marker for edits only
async fn render_results(state: &AppState, eval_id: Option<i64>) -> Response {
    match state.store.evaluations().await {
        Ok(evals) => Html(views::results(&evals, eval_id)).into_response(),
        Err(e) => internal_error(e),
    }
}

/// Pre-filled edit form handler
///
/// A missing id renders an explicit not-found page rather than propagating
/// a failure.
async fn edit_eval_handler(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let eval = match state.store.evaluation(id).await {
        Ok(Some(eval)) => eval,
        Ok(None) => {
            debug!("Edit requested for missing evaluation id={}", id);
            return (
                StatusCode::NOT_FOUND,
                Html(views::error("no evaluation with that id exists")),
            )
                .into_response();
        }
        Err(e) => return internal_error(e),
    };

    let courses = match state.store.courses().await {
        Ok(courses) => courses,
        Err(e) => return internal_error(e),
    };

    Html(views::evaluation_form(&courses, &eval, true)).into_response()
}
