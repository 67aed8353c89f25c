use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::{AdvertisementId, NewAdvertisement};
use super::repository::AdvertisementRepository;
use super::service::{
    AdvertisementService, AdvertisementServiceError, AdvertisementValidationError,
};
use crate::discovery::http::{
    error_response, AdminToken, ApiJson, ApiPath, ApiQuery, ProximityParams,
};
use crate::discovery::origin::{Geocoder, PlacementError};
use crate::discovery::repository::RepositoryError;
use crate::error::AppError;

/// Shared handler state: the service plus the admin gate.
pub struct AdvertisementApi<R, G> {
    pub service: Arc<AdvertisementService<R, G>>,
    pub admin: AdminToken,
}

impl<R, G> Clone for AdvertisementApi<R, G> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            admin: self.admin.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActivePayload {
    active: bool,
}

/// Router builder exposing advertisement listing, selection, and tracking endpoints.
pub fn advertisement_router<R, G>(api: AdvertisementApi<R, G>) -> Router
where
    R: AdvertisementRepository + 'static,
    G: Geocoder + 'static,
{
    Router::new()
        .route(
            "/api/v1/advertisements",
            get(list_handler::<R, G>).post(create_handler::<R, G>),
        )
        .route(
            "/api/v1/advertisements/nearby",
            get(nearby_handler::<R, G>),
        )
        .route(
            "/api/v1/advertisements/select",
            get(select_handler::<R, G>),
        )
        .route(
            "/api/v1/advertisements/:ad_id/click",
            post(click_handler::<R, G>),
        )
        .route(
            "/api/v1/advertisements/:ad_id/active",
            put(active_handler::<R, G>),
        )
        .with_state(api)
}

pub(crate) async fn list_handler<R, G>(State(api): State<AdvertisementApi<R, G>>) -> Response
where
    R: AdvertisementRepository + 'static,
    G: Geocoder + 'static,
{
    match api.service.list() {
        Ok(ads) => (StatusCode::OK, Json(ads)).into_response(),
        Err(err) => service_error(err),
    }
}

pub(crate) async fn create_handler<R, G>(
    State(api): State<AdvertisementApi<R, G>>,
    headers: HeaderMap,
    ApiJson(request): ApiJson<NewAdvertisement>,
) -> Response
where
    R: AdvertisementRepository + 'static,
    G: Geocoder + 'static,
{
    if let Err(err) = api.admin.authorize(&headers) {
        return AppError::from(err).into_response();
    }

    match api.service.create(request) {
        Ok(ad) => (StatusCode::CREATED, Json(ad)).into_response(),
        Err(err) => service_error(err),
    }
}

pub(crate) async fn nearby_handler<R, G>(
    State(api): State<AdvertisementApi<R, G>>,
    ApiQuery(params): ApiQuery<ProximityParams>,
) -> Response
where
    R: AdvertisementRepository + 'static,
    G: Geocoder + 'static,
{
    let request = match params.origin_request() {
        Ok(request) => request,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, &err),
    };
    let radius = match params.radius() {
        Ok(radius) => radius,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, &err),
    };

    let origin = api.service.resolve_origin(&request);
    match api.service.nearby(origin, radius, Utc::now().date_naive()) {
        Ok(ads) => (StatusCode::OK, Json(ads)).into_response(),
        Err(err) => service_error(err),
    }
}

pub(crate) async fn select_handler<R, G>(
    State(api): State<AdvertisementApi<R, G>>,
    ApiQuery(params): ApiQuery<ProximityParams>,
) -> Response
where
    R: AdvertisementRepository + 'static,
    G: Geocoder + 'static,
{
    let request = match params.origin_request() {
        Ok(request) => request,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, &err),
    };

    let user = api.service.resolve_origin(&request);
    match api.service.select_for(user, Utc::now().date_naive()) {
        Ok(Some(ad)) => (StatusCode::OK, Json(ad)).into_response(),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => service_error(err),
    }
}

pub(crate) async fn click_handler<R, G>(
    State(api): State<AdvertisementApi<R, G>>,
    ApiPath(ad_id): ApiPath<String>,
) -> Response
where
    R: AdvertisementRepository + 'static,
    G: Geocoder + 'static,
{
    let id = AdvertisementId(ad_id);
    match api.service.record_click(&id) {
        Ok(clicks) => {
            let payload = json!({
                "id": id.0,
                "clicks": clicks,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => service_error(err),
    }
}

pub(crate) async fn active_handler<R, G>(
    State(api): State<AdvertisementApi<R, G>>,
    ApiPath(ad_id): ApiPath<String>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<ActivePayload>,
) -> Response
where
    R: AdvertisementRepository + 'static,
    G: Geocoder + 'static,
{
    if let Err(err) = api.admin.authorize(&headers) {
        return AppError::from(err).into_response();
    }

    match api
        .service
        .set_active(&AdvertisementId(ad_id), payload.active)
    {
        Ok(ad) => (StatusCode::OK, Json(ad)).into_response(),
        Err(err) => service_error(err),
    }
}

fn service_error(err: AdvertisementServiceError) -> Response {
    let status = match &err {
        AdvertisementServiceError::Validation(AdvertisementValidationError::Placement(
            PlacementError::Geocode(_),
        )) => StatusCode::SERVICE_UNAVAILABLE,
        AdvertisementServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        AdvertisementServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AdvertisementServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AdvertisementServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_response(status, &err)
}
