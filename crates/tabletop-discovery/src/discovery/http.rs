//! Pieces shared by the discovery routers: query parsing, admin checks, error payloads.

use std::sync::Arc;

use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use super::geo::{CoordinateError, Coordinates};
use super::origin::OriginRequest;

/// Header carrying the operator token for admin-only routes.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Query string accepted by every proximity search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProximityParams {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub radius: Option<f64>,
    #[serde(default)]
    pub q: Option<String>,
}

impl ProximityParams {
    pub fn origin_request(&self) -> Result<OriginRequest, CoordinateError> {
        let checked = Coordinates::checked(self.lat, self.lon)?;
        Ok(OriginRequest {
            latitude: checked.map(|c| c.latitude),
            longitude: checked.map(|c| c.longitude),
            search: self.search.clone(),
            profile_zip: self.zip.clone(),
        })
    }

    pub fn radius(&self) -> Result<Option<f64>, InvalidRadius> {
        match self.radius {
            Some(radius) if !radius.is_finite() || radius < 0.0 => Err(InvalidRadius(radius)),
            other => Ok(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("radius must be a non-negative number of miles, got {0}")]
pub struct InvalidRadius(pub f64);

/// Operator token guarding admin routes. `None` disables those routes entirely.
#[derive(Debug, Clone, Default)]
pub struct AdminToken(Option<Arc<str>>);

impl AdminToken {
    pub fn new(token: Option<String>) -> Self {
        Self(token.filter(|value| !value.trim().is_empty()).map(Arc::from))
    }

    pub fn authorize(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let presented = headers
            .get(ADMIN_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(AuthError::MissingCredentials)?;

        match self.0.as_deref() {
            Some(expected) if expected == presented => Ok(()),
            Some(_) => Err(AuthError::Forbidden),
            None => Err(AuthError::Disabled),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("admin token required")]
    MissingCredentials,
    #[error("admin token rejected")]
    Forbidden,
    #[error("admin routes are disabled")]
    Disabled,
}

impl AuthError {
    pub fn status(self) -> StatusCode {
        match self {
            AuthError::MissingCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden | AuthError::Disabled => StatusCode::FORBIDDEN,
        }
    }
}

/// `Query` extractor whose rejection uses the JSON error body.
#[derive(Debug, Clone)]
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(error_response(
                StatusCode::BAD_REQUEST,
                &rejection.body_text(),
            )),
        }
    }
}

/// `Path` extractor whose rejection uses the JSON error body.
#[derive(Debug, Clone)]
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(error_response(rejection.status(), &rejection.body_text())),
        }
    }
}

/// `Json` extractor whose rejection uses the JSON error body.
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(request, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(error_response(
                StatusCode::BAD_REQUEST,
                &rejection.body_text(),
            )),
        }
    }
}

pub(crate) fn error_response(status: StatusCode, error: &dyn std::fmt::Display) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}
