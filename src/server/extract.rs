use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use sqlx::{pool::PoolConnection, Sqlite, SqlitePool};

use super::{error::ApiError, pagination::PageQuery};

/// A pooled connection held for the lifetime of one request.
///
/// Dropping it at the end of the handler hands the connection back to the pool.
pub struct DbConn(pub PoolConnection<Sqlite>);

impl<S> FromRequestParts<S> for DbConn
where
    SqlitePool: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pool = SqlitePool::from_ref(state);
        let conn = pool.acquire().await?;
        Ok(DbConn(conn))
    }
}

/// Requested page from the `page` query parameter, 1 when absent or unparsable.
pub struct Page(pub i64);

impl<S: Send + Sync> FromRequestParts<S> for Page {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = Query::<PageQuery>::try_from_uri(&parts.uri)
            .map(|Query(query)| query)
            .unwrap_or_default();
        Ok(Page(query.page))
    }
}

/// `Json` whose rejections render as the API's error body.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
        }
    }
}
