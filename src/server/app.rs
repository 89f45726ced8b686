use std::any::Any;

use anyhow::Context;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ALLOW, AUTHORIZATION, CONTENT_TYPE,
};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{extract::FromRef, middleware, routing::get, Router};
use prometheus::{Encoder, TextEncoder};
use routes::{category_router, questions_router, quizzes_router};
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use super::error::ApiError;
use super::routes;
use crate::settings::Settings;

const ALLOWED_HEADERS: &str = "Content-Type, Authorization";
const ALLOWED_METHODS: &str = "GET, POST, PATCH, DELETE, OPTIONS";

#[derive(Clone, Copy, Debug)]
pub struct ApiOptions {
    pub legacy_current_category: bool,
}

impl From<&Settings> for ApiOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            legacy_current_category: settings.legacy_current_category,
        }
    }
}

#[derive(FromRef, Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub options: ApiOptions,
}

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/metrics", get(metrics))
        .merge(category_router(state.clone()))
        .merge(questions_router(state.clone()))
        .merge(quizzes_router(state))
        .fallback(|| async {
            tracing::info!("Fallback");
            ApiError::NotFound
        });
    with_layers(routes)
}

// catch-panic must sit inside the header layers
fn with_layers(routes: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    routes
        .layer(middleware::map_response(method_not_allowed_body))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        ))
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(pool: SqlitePool, settings: &Settings) -> anyhow::Result<()> {
    let state = AppState {
        pool,
        options: ApiOptions::from(settings),
    };

    let app = router(state);
    let listener = TcpListener::bind(&settings.address)
        .await
        .with_context(|| format!("Failed to bind {}", settings.address))?;

    tracing::info!("Serving on {}", settings.address);
    axum::serve(listener, app).await?;
    Ok(())
}

// axum answers a known path with an unsupported method by an empty 405
async fn method_not_allowed_body(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }
    let allow = response.headers().get(ALLOW).cloned();
    let mut replaced = ApiError::MethodNotAllowed.into_response();
    if let Some(allow) = allow {
        replaced.headers_mut().insert(ALLOW, allow);
    }
    replaced
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let reason = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_owned()
    };
    ApiError::Internal(reason).into_response()
}

async fn metrics() -> Result<Response, ApiError> {
    let encoder = TextEncoder::new();
    let metrics = prometheus::gather();
    let mut buf = vec![];
    encoder
        .encode(&metrics, &mut buf)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok((
        [(CONTENT_TYPE, encoder.format_type().to_owned())],
        buf,
    )
        .into_response())
}
