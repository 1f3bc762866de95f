// End-to-end cache busting tests through the HTTP router
// Author: kelexine (https://github.com/kelexine)

mod common;

use axum::http::{header, StatusCode};
use common::{body_json, body_string, session_cookie, TestApp};
use csk_sniffer::images::{CACHE_CONTROL_NO_STORE, LAST_MODIFIED_UNIX_EPOCH};

fn assert_no_store_headers(response: &axum::http::Response<axum::body::Body>) {
    let headers = response.headers();
    assert_eq!(headers[header::CACHE_CONTROL], CACHE_CONTROL_NO_STORE);
    assert_eq!(headers[header::CACHE_CONTROL], "no-cache, no-store, must-revalidate, max-age=0");
    assert_eq!(headers[header::PRAGMA], "no-cache");
    assert_eq!(headers[header::EXPIRES], "0");
    assert_eq!(headers[header::LAST_MODIFIED], LAST_MODIFIED_UNIX_EPOCH);
}

#[tokio::test]
async fn test_epoch_lifecycle_scenario() {
    let app = TestApp::new();
    app.write_image("result1.jpg", b"old");
    let cookie = app.start_session().await;

    // Baseline render
    let page = body_string(app.get("/results", Some(cookie.as_str())).await).await;
    assert!(page.contains("/images/result1.jpg?v=1"));

    // New search: old files gone, epoch 2
    let response = app.get("/new_search", Some(cookie.as_str())).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/?refreshed=1");
    assert!(app.image_names().is_empty());

    // The detector regenerates the same file name
    app.write_image("result1.jpg", b"new");
    let page = body_string(app.get("/results", Some(cookie.as_str())).await).await;
    assert!(page.contains("/images/result1.jpg?v=2"));
    assert!(!page.contains("result1.jpg?v=1"));

    // Manual clear: epoch 3, files untouched
    let response = app.post("/clear_cache", Some(cookie.as_str()), "").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["cache_buster"], 3);
    assert_eq!(app.image_names(), vec!["result1.jpg".to_string()]);

    let page = body_string(app.get("/results", Some(cookie.as_str())).await).await;
    assert!(page.contains("/images/result1.jpg?v=3"));
}

#[tokio::test]
async fn test_repeated_new_searches_advance_by_one_each() {
    let app = TestApp::new();
    let cookie = app.start_session().await;

    for _ in 0..4 {
        app.write_image("Image 1.jpg", b"x");
        let response = app.get("/cleanup", Some(cookie.as_str())).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    let status = body_json(app.get("/status", Some(cookie.as_str())).await).await;
    assert_eq!(status["cache_buster"], 5);
    assert_eq!(status["images_count"], 0);
}

#[tokio::test]
async fn test_clear_cache_deletes_nothing() {
    let app = TestApp::new();
    app.write_image("Image 1.jpg", b"x");
    app.write_image("Image 2.png", b"y");
    let before = app.image_names();
    let cookie = app.start_session().await;

    let json = body_json(app.get("/clear_cache", Some(cookie.as_str())).await).await;

    assert_eq!(json["cache_buster"], 2);
    assert_eq!(app.image_names(), before);
}

#[tokio::test]
async fn test_image_headers_ignore_version_parameter() {
    let app = TestApp::new();
    app.write_image("Image 1.jpg", b"jpeg-bytes");

    for uri in [
        "/images/Image%201.jpg",
        "/images/Image%201.jpg?v=1",
        "/images/Image%201.jpg?v=999",
        "/images/Image%201.jpg?v=not-a-number",
        "/images/Image%201.jpg?v=",
    ] {
        let response = app.get(uri, None).await;
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
        assert_no_store_headers(&response);
        assert_eq!(body_string(response).await, "jpeg-bytes");
    }
}

#[tokio::test]
async fn test_deleted_image_gets_placeholder() {
    let app = TestApp::new();
    app.write_image("Image 1.jpg", b"x");
    std::fs::remove_file(app.images_dir().join("Image 1.jpg")).unwrap();

    let response = app.get("/images/Image%201.jpg?v=4", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/svg+xml");
    assert_no_store_headers(&response);
    assert!(body_string(response).await.contains("Image unavailable"));
}

#[tokio::test]
async fn test_traversal_attempt_is_rejected_without_caching() {
    let app = TestApp::new();

    let response = app.get("/images/..%2FKB-CSK-SNIFFER.csv", None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_no_store_headers(&response);
    let json = body_json(response).await;
    assert_eq!(json["error"]["type"], "invalid_filename_error");
}

#[tokio::test]
async fn test_directory_request_gets_placeholder() {
    let app = TestApp::new();
    std::fs::create_dir_all(app.images_dir().join("raw")).unwrap();

    for uri in ["/images/raw", "/images/raw?v=2"] {
        let response = app.get(uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/svg+xml");
        assert_no_store_headers(&response);
        let body = body_string(response).await;
        assert!(body.contains("Image unavailable"), "{}", uri);
        assert!(!body.contains("directory"), "{}", uri);
    }
}

#[tokio::test]
async fn test_dots_inside_a_name_are_served() {
    let app = TestApp::new();
    app.write_image("Image 1..jpg", b"dotted");

    let response = app.get("/images/Image%201..jpg?v=1", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
    assert_no_store_headers(&response);
    assert_eq!(body_string(response).await, "dotted");
}

#[tokio::test]
async fn test_image_requests_do_not_open_sessions() {
    let app = TestApp::new();
    app.write_image("Image 1.jpg", b"x");

    for uri in [
        "/images/Image%201.jpg?v=1",
        "/images/Image%201.jpg?v=2",
        "/images/gone.jpg",
        "/images/..%2Fsecret",
        "/images/Image%201.jpg",
    ] {
        let response = app.get(uri, None).await;
        assert!(session_cookie(&response).is_none(), "{}", uri);
    }

    let health = body_json(app.get("/health", None).await).await;
    assert_eq!(
        health["checks"]["sessions"]["message"],
        "0 of 10000 sessions in use"
    );
}

#[tokio::test]
async fn test_search_submission_runs_pipeline_after_cleanup() {
    let app = TestApp::new();
    app.write_image("stale.jpg", b"old");
    let cookie = app.start_session().await;

    let response = app.post("/", Some(cookie.as_str()), "t=kids+on+boat").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/results");

    assert_eq!(
        app.image_names(),
        vec!["Image 1.jpg".to_string(), "Image 2.jpg".to_string()]
    );

    let status = body_json(app.get("/status", Some(cookie.as_str())).await).await;
    assert_eq!(status["current_query"], "kids on boat");
    assert_eq!(status["cache_buster"], 2);
    assert!(status["search_id"].as_str().unwrap().starts_with("search_"));

    let page = body_string(app.get("/results", Some(cookie.as_str())).await).await;
    assert!(page.contains("/images/Image%201.jpg?v=2"));
    assert!(page.contains("/images/Image%202.jpg?v=2"));
}

#[tokio::test]
async fn test_blank_search_keeps_epoch_and_files() {
    let app = TestApp::new();
    app.write_image("Image 1.jpg", b"x");
    let cookie = app.start_session().await;

    let response = app.post("/", Some(cookie.as_str()), "t=+++").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("Please enter a search term."));

    let status = body_json(app.get("/status", Some(cookie.as_str())).await).await;
    assert_eq!(status["cache_buster"], 1);
    assert_eq!(app.image_names(), vec!["Image 1.jpg".to_string()]);
}

#[tokio::test]
async fn test_unknown_session_restarts_at_baseline() {
    let app = TestApp::new();

    let response = app
        .get(
            "/clear_cache",
            Some("csk_session=00000000-0000-0000-0000-000000000000"),
        )
        .await;

    let cookie = session_cookie(&response).expect("a replacement session cookie");
    assert_ne!(cookie, "csk_session=00000000-0000-0000-0000-000000000000");
    assert_eq!(body_json(response).await["cache_buster"], 2);

    // The replacement cookie keeps its state
    let json = body_json(app.get("/clear_cache", Some(cookie.as_str())).await).await;
    assert_eq!(json["cache_buster"], 3);
}

#[tokio::test]
async fn test_existing_session_does_not_reissue_cookie() {
    let app = TestApp::new();
    let cookie = app.start_session().await;

    let response = app.get("/status", Some(cookie.as_str())).await;
    assert!(session_cookie(&response).is_none());
}

#[tokio::test]
async fn test_sessions_have_independent_epochs() {
    let app = TestApp::new();
    let first = app.start_session().await;
    let second = app.start_session().await;
    assert_ne!(first, second);

    app.get("/clear_cache", Some(first.as_str())).await;
    app.get("/clear_cache", Some(first.as_str())).await;

    let first_status = body_json(app.get("/status", Some(first.as_str())).await).await;
    let second_status = body_json(app.get("/status", Some(second.as_str())).await).await;
    assert_eq!(first_status["cache_buster"], 3);
    assert_eq!(second_status["cache_buster"], 1);
}

#[tokio::test]
async fn test_concurrent_clears_in_one_session_never_share_an_epoch() {
    let app = std::sync::Arc::new(TestApp::new());
    let cookie = app.start_session().await;

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let app = app.clone();
            let cookie = cookie.clone();
            tokio::spawn(async move {
                let json = body_json(app.post("/clear_cache", Some(cookie.as_str()), "").await).await;
                json["cache_buster"].as_u64().unwrap()
            })
        })
        .collect();

    let mut epochs = Vec::new();
    for handle in handles {
        epochs.push(handle.await.unwrap());
    }
    epochs.sort_unstable();
    epochs.dedup();

    assert_eq!(epochs.len(), 20);
    assert_eq!(epochs.first(), Some(&2));
    assert_eq!(epochs.last(), Some(&21));
}

#[tokio::test]
async fn test_refreshed_home_shows_one_time_message() {
    let app = TestApp::new();

    let with_flag = body_string(app.get("/?refreshed=1", None).await).await;
    let without_flag = body_string(app.get("/", None).await).await;

    assert!(with_flag.contains("Previous search files have been cleared"));
    assert!(!without_flag.contains("Previous search files have been cleared"));
}
