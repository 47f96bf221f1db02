//! `GET /api/jobs` against an in-memory store, without redis.
//!
//! Run with: `cargo test --test listing_http_test`

mod common;

use actix_web::{App, http::StatusCode, test, web};
use serde_json::Value;

use common::{MemoryJobSource, StoredJob, at, job, paginator};
use jobboard_backend::handlers::jobs::list_jobs;

fn board() -> Vec<StoredJob> {
    vec![
        job("Rust engineer", "full-time", "Remote", at(50)),
        job("Data analyst", "remote", "NYC", at(40)),
        job("Designer", "contract", "Berlin", at(30)),
        job("Rust intern", "full-time", "NYC", at(20)),
    ]
}

macro_rules! app {
    ($jobs:expr, $page_size:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(paginator($jobs, $page_size)))
                .route("/api/jobs", web::get().to(list_jobs::<MemoryJobSource>)),
        )
        .await
    };
}

#[actix_web::test]
async fn first_page_carries_a_cursor_when_full() {
    let jobs = board();
    let second_id = jobs[1].id().to_string();
    let app = app!(jobs, 2);

    let req = test::TestRequest::get().uri("/api/jobs").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["items"][0]["title"], "Rust engineer");
    assert_eq!(body["cursor"], Value::String(second_id));
}

#[actix_web::test]
async fn follows_cursor_to_the_end() {
    let app = app!(board(), 10);

    let req = test::TestRequest::get()
        .uri("/api/jobs?limit=3&type=full-time,remote")
        .to_request();
    let first: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(first["items"].as_array().unwrap().len(), 3);
    let cursor = first["cursor"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/api/jobs?type=full-time,remote&limit=3&cursor={cursor}"))
        .to_request();
    let second: Value = test::call_and_read_body_json(&app, req).await;
    assert!(second["items"].as_array().unwrap().is_empty());
    assert!(second["cursor"].is_null());
}

#[actix_web::test]
async fn filters_by_location_and_title() {
    let app = app!(board(), 10);

    let req = test::TestRequest::get()
        .uri("/api/jobs?title=Rust&location=NYC")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Rust intern");
    assert_eq!(items[0]["type"], "full-time");
    assert!(body["cursor"].is_null());
}

#[actix_web::test]
async fn rejects_malformed_requests() {
    let app = app!(board(), 10);

    for uri in [
        "/api/jobs?cursor=not-a-uuid",
        "/api/jobs?title=a,b",
        "/api/jobs?limit=0",
        "/api/jobs?location=%E0%A4%A",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[actix_web::test]
async fn unknown_cursor_is_a_bad_request() {
    let app = app!(board(), 10);
    let stray = uuid::Uuid::new_v4();

    let req = test::TestRequest::get()
        .uri(&format!("/api/jobs?cursor={stray}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn outage_is_service_unavailable() {
    let pages = paginator(board(), 10);
    pages.source().set_offline(true);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pages))
            .route("/api/jobs", web::get().to(list_jobs::<MemoryJobSource>)),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/jobs").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("unavailable"));
}
