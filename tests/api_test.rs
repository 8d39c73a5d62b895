//! Router-level integration tests for the evaluation form flows
//!
//! Drives the axum router in-process with oneshot requests; no socket is
//! bound.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use evaltrack::{api, EvalStore, Evaluation, SqliteStore};
use http_body_util::BodyExt;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

async fn test_app() -> (Router, Arc<SqliteStore>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(SqliteStore::new(temp_dir.path().join("test.db")).unwrap());
    store.migrate().await.unwrap();

    let app = api::router(store.clone() as Arc<dyn EvalStore>);
    (app, store, temp_dir)
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/evals")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn seed_evaluation(store: &SqliteStore, id: i64) {
    let mut eval = Evaluation::new(
        "Assignment1",
        "PROG10082",
        12.0,
        15.0,
        6.0,
        "2021-07-27".parse::<NaiveDate>().unwrap(),
    );
    eval.id = Some(id);
    store.add_evaluation(&eval).await.unwrap();
}

#[tokio::test]
async fn test_index_page_loads() {
    let (app, _store, _temp) = test_app().await;

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Evaluation Tracker"));
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let (app, _store, _temp) = test_app().await;

    let response = app.oneshot(get("/boo")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_form_page_lists_seeded_courses() {
    let (app, _store, _temp) = test_app().await;

    let response = app.oneshot(get("/evalc")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("<form"));
    assert!(body.contains("PROG10082"));
    // A fresh form submits as a create
    assert!(body.contains("name=\"edit\" value=\"false\""));
}

#[tokio::test]
async fn test_create_flow_renders_results_without_eval_id() {
    let (app, _store, _temp) = test_app().await;

    let response = app
        .oneshot(post_form(
            "title=Assignment1&course=PROG10082&grade=12&max=15&weight=6\
             &due_date=2021-07-27&edit=false",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Assignment1"));
    assert!(!body.contains("evalId"));
}

#[tokio::test]
async fn test_edit_flow_renders_results_with_eval_id() {
    let (app, store, _temp) = test_app().await;
    seed_evaluation(&store, 1).await;

    let response = app
        .oneshot(post_form(
            "id=1&title=Assignment2&course=PROG24178&grade=15&max=20&weight=6\
             &due_date=2021-08-02&edit=true",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("evalId"));
    assert!(body.contains("Assignment2"));
}

#[tokio::test]
async fn test_edit_flow_with_unmatched_id_renders_error() {
    let (app, store, _temp) = test_app().await;
    seed_evaluation(&store, 1).await;

    let response = app
        .oneshot(post_form(
            "id=99&title=Assignment2&course=PROG24178&grade=15&max=20&weight=6\
             &due_date=2021-08-02&edit=true",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("Something went wrong"));
}

#[tokio::test]
async fn test_create_with_unknown_course_renders_error() {
    let (app, store, _temp) = test_app().await;

    let response = app
        .oneshot(post_form(
            "title=Assignment1&course=PROG100823&grade=12&max=15&weight=6\
             &due_date=2021-07-27&edit=false",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Nothing was written
    assert!(store.evaluations().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_with_colliding_id_renders_error() {
    let (app, store, _temp) = test_app().await;
    seed_evaluation(&store, 1).await;

    let response = app
        .oneshot(post_form(
            "id=1&title=Assignment1&course=PROG10082&grade=12&max=15&weight=6\
             &due_date=2021-07-27&edit=false",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_edit_form_is_prefilled_for_existing_id() {
    let (app, store, _temp) = test_app().await;
    seed_evaluation(&store, 1).await;

    let response = app.oneshot(get("/editEvaluation/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("value=\"Assignment1\""));
    assert!(body.contains("name=\"edit\" value=\"true\""));
    assert!(body.contains("name=\"id\" value=\"1\""));
}

#[tokio::test]
async fn test_edit_form_for_missing_id_is_not_found() {
    let (app, store, _temp) = test_app().await;
    seed_evaluation(&store, 1).await;

    let response = app.oneshot(get("/editEvaluation/10")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
