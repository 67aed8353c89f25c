use axum::{routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use super::geo::{Coordinates, EARTH_RADIUS_MILES};
use super::http::ApiQuery;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct DistanceParams {
    pub lat1: f64,
    pub lon1: f64,
    pub lat2: f64,
    pub lon2: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceResponse {
    pub from: Coordinates,
    pub to: Coordinates,
    pub distance_miles: f64,
    pub earth_radius_miles: f64,
}

pub fn distance_router() -> Router {
    Router::new().route("/api/v1/distance", get(distance_handler))
}

pub(crate) async fn distance_handler(
    ApiQuery(params): ApiQuery<DistanceParams>,
) -> Result<Json<DistanceResponse>, AppError> {
    let from = checked(params.lat1, params.lon1)?;
    let to = checked(params.lat2, params.lon2)?;
    Ok(Json(DistanceResponse {
        from,
        to,
        distance_miles: from.distance_miles(&to),
        earth_radius_miles: EARTH_RADIUS_MILES,
    }))
}

fn checked(latitude: f64, longitude: f64) -> Result<Coordinates, AppError> {
    Coordinates::checked(Some(latitude), Some(longitude))
        .map_err(|err| AppError::Validation(err.to_string()))?
        .ok_or_else(|| AppError::Validation("coordinates are required".to_string()))
}
