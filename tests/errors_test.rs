mod common;

use axum::http::{header, Method, StatusCode};
use common::{assert_error_body, test_app};

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = test_app().await;

    let (status, body) = app.json(Method::GET, "/nowhere", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error_body(&body, 404, "Resource Not Found");
}

#[tokio::test]
async fn wrong_method_is_method_not_allowed() {
    let app = test_app().await;

    let (status, body) = app.json(Method::DELETE, "/categories", None).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_error_body(&body, 405, "Method not allowed");

    let (status, body) = app.json(Method::GET, "/quizzes", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_error_body(&body, 405, "Method not allowed");
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = test_app().await;

    let response = app
        .request(Method::POST, "/questions", Some(serde_json::json!("not an object")))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cors_headers_are_on_every_response() {
    let app = test_app().await;

    for uri in ["/categories", "/nowhere"] {
        let response = app.request(Method::GET, uri, None).await;
        let headers = response.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "Content-Type, Authorization"
        );
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET, POST, PATCH, DELETE, OPTIONS"
        );
    }
}

#[tokio::test]
async fn storage_failure_is_a_server_error() {
    let app = test_app().await;
    sqlx::query("DROP TABLE categories")
        .execute(&app.pool)
        .await
        .unwrap();

    let (status, body) = app.json(Method::GET, "/categories", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_error_body(&body, 500, "Server error");
}

#[tokio::test]
async fn metrics_are_exposed() {
    let app = test_app().await;
    let (status, _) = app
        .json(
            Method::POST,
            "/quizzes",
            Some(serde_json::json!({"previous_questions": [], "quiz_category": {"type": "click"}})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let response = app.request(Method::GET, "/metrics", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("trivia_quiz_questions_served_total"));
}
