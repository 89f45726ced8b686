#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use trivia_api::db;
use trivia_api::server::app::{router, ApiOptions, AppState};

/// Seeded database in a throwaway directory. Keep it alive for the whole test.
pub struct TestApp {
    pub router: Router,
    pub pool: sqlx::SqlitePool,
    _dir: TempDir,
}

pub async fn test_app() -> TestApp {
    test_app_with(ApiOptions {
        legacy_current_category: true,
    })
    .await
}

pub async fn test_app_with(options: ApiOptions) -> TestApp {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("trivia.db");
    let pool = db::establish_connection(&path.display().to_string(), 2)
        .await
        .expect("open test database");
    db::run_migrations(&pool).await.expect("run migrations");

    let router = router(AppState {
        pool: pool.clone(),
        options,
    });
    TestApp {
        router,
        pool,
        _dir: dir,
    }
}

impl TestApp {
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request build should succeed");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router should respond")
    }

    pub async fn json(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let response = self.request(method, uri, body).await;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }
}

pub const SEEDED_QUESTIONS: usize = 19;
pub const SEEDED_CATEGORIES: [&str; 6] = ["1", "2", "3", "4", "5", "6"];

pub fn question_ids(body: &Value) -> Vec<i64> {
    body["questions"]
        .as_array()
        .expect("questions array")
        .iter()
        .map(|q| q["id"].as_i64().expect("question id"))
        .collect()
}

pub fn assert_error_body(body: &Value, code: u16, message: &str) {
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], code);
    assert_eq!(body["message"], message);
}
