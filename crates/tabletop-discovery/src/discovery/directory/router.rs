use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::{NewPlayer, NewVendor, PlayerId, SearchRequest};
use super::repository::DirectoryRepository;
use super::service::{DirectoryService, DirectoryServiceError};
use crate::discovery::http::{
    error_response, AdminToken, ApiJson, ApiPath, ApiQuery, ProximityParams,
};
use crate::discovery::origin::{Geocoder, PlacementError};
use crate::discovery::repository::RepositoryError;
use crate::error::AppError;
use crate::scheduling::AvailabilitySlot;

pub struct DirectoryApi<R, G> {
    pub service: Arc<DirectoryService<R, G>>,
    pub admin: AdminToken,
}

impl<R, G> Clone for DirectoryApi<R, G> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            admin: self.admin.clone(),
        }
    }
}

/// Router builder exposing vendor and player search plus availability endpoints.
pub fn directory_router<R, G>(api: DirectoryApi<R, G>) -> Router
where
    R: DirectoryRepository + 'static,
    G: Geocoder + 'static,
{
    Router::new()
        .route(
            "/api/v1/vendors",
            get(vendor_search_handler::<R, G>).post(vendor_create_handler::<R, G>),
        )
        .route(
            "/api/v1/players",
            get(player_search_handler::<R, G>).post(player_create_handler::<R, G>),
        )
        .route(
            "/api/v1/players/:player_id",
            get(player_handler::<R, G>),
        )
        .route(
            "/api/v1/players/:player_id/availability/toggle",
            post(toggle_handler::<R, G>),
        )
        .route(
            "/api/v1/players/:player_id/availability/overlap/:other_id",
            get(overlap_handler::<R, G>),
        )
        .with_state(api)
}

fn search_request(params: &ProximityParams) -> Result<SearchRequest, Response> {
    let origin = params
        .origin_request()
        .map_err(|err| error_response(StatusCode::BAD_REQUEST, &err))?;
    let radius_miles = params
        .radius()
        .map_err(|err| error_response(StatusCode::BAD_REQUEST, &err))?;
    Ok(SearchRequest {
        origin,
        radius_miles,
        keyword: params.q.clone(),
    })
}

pub(crate) async fn vendor_search_handler<R, G>(
    State(api): State<DirectoryApi<R, G>>,
    ApiQuery(params): ApiQuery<ProximityParams>,
) -> Response
where
    R: DirectoryRepository + 'static,
    G: Geocoder + 'static,
{
    let request = match search_request(&params) {
        Ok(request) => request,
        Err(response) => return response,
    };
    match api.service.search_vendors(&request) {
        Ok(vendors) => (StatusCode::OK, Json(vendors)).into_response(),
        Err(err) => service_error(err),
    }
}

pub(crate) async fn vendor_create_handler<R, G>(
    State(api): State<DirectoryApi<R, G>>,
    headers: HeaderMap,
    ApiJson(request): ApiJson<NewVendor>,
) -> Response
where
    R: DirectoryRepository + 'static,
    G: Geocoder + 'static,
{
    if let Err(err) = api.admin.authorize(&headers) {
        return AppError::from(err).into_response();
    }
    match api.service.add_vendor(request) {
        Ok(vendor) => (StatusCode::CREATED, Json(vendor)).into_response(),
        Err(err) => service_error(err),
    }
}

pub(crate) async fn player_search_handler<R, G>(
    State(api): State<DirectoryApi<R, G>>,
    ApiQuery(params): ApiQuery<ProximityParams>,
) -> Response
where
    R: DirectoryRepository + 'static,
    G: Geocoder + 'static,
{
    let request = match search_request(&params) {
        Ok(request) => request,
        Err(response) => return response,
    };
    match api.service.search_players(&request) {
        Ok(players) => (StatusCode::OK, Json(players)).into_response(),
        Err(err) => service_error(err),
    }
}

pub(crate) async fn player_create_handler<R, G>(
    State(api): State<DirectoryApi<R, G>>,
    ApiJson(request): ApiJson<NewPlayer>,
) -> Response
where
    R: DirectoryRepository + 'static,
    G: Geocoder + 'static,
{
    match api.service.add_player(request) {
        Ok(player) => (StatusCode::CREATED, Json(player)).into_response(),
        Err(err) => service_error(err),
    }
}

pub(crate) async fn player_handler<R, G>(
    State(api): State<DirectoryApi<R, G>>,
    ApiPath(player_id): ApiPath<String>,
) -> Response
where
    R: DirectoryRepository + 'static,
    G: Geocoder + 'static,
{
    match api.service.get_player(&PlayerId(player_id)) {
        Ok(player) => (StatusCode::OK, Json(player)).into_response(),
        Err(err) => service_error(err),
    }
}

pub(crate) async fn toggle_handler<R, G>(
    State(api): State<DirectoryApi<R, G>>,
    ApiPath(player_id): ApiPath<String>,
    ApiJson(slot): ApiJson<AvailabilitySlot>,
) -> Response
where
    R: DirectoryRepository + 'static,
    G: Geocoder + 'static,
{
    let id = PlayerId(player_id);
    match api.service.toggle_player_availability(&id, slot) {
        Ok(player) => {
            let payload = json!({
                "id": id.0,
                "enabled": player.availability.contains(&slot),
                "availability": player.availability,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => service_error(err),
    }
}

pub(crate) async fn overlap_handler<R, G>(
    State(api): State<DirectoryApi<R, G>>,
    ApiPath((player_id, other_id)): ApiPath<(String, String)>,
) -> Response
where
    R: DirectoryRepository + 'static,
    G: Geocoder + 'static,
{
    match api
        .service
        .common_availability(&PlayerId(player_id), &PlayerId(other_id))
    {
        Ok(slots) => (StatusCode::OK, Json(slots)).into_response(),
        Err(err) => service_error(err),
    }
}

fn service_error(err: DirectoryServiceError) -> Response {
    let status = match &err {
        DirectoryServiceError::Placement(PlacementError::Geocode(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        DirectoryServiceError::MissingName | DirectoryServiceError::Placement(_) => {
            StatusCode::BAD_REQUEST
        }
        DirectoryServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        DirectoryServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        DirectoryServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_response(status, &err)
}
