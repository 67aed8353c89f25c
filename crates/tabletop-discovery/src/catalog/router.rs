use std::sync::Arc;

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::boardgames::{BoardGame, BoardGameCatalog};
use crate::discovery::http::{ApiPath, ApiQuery};
use crate::error::AppError;

const DEFAULT_SEARCH_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
pub struct BoardGameSearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

pub fn boardgame_router(catalog: Arc<BoardGameCatalog>) -> Router {
    Router::new()
        .route("/api/v1/boardgames/search", get(search_handler))
        .route("/api/v1/boardgames/:game_id", get(game_handler))
        .with_state(catalog)
}

pub(crate) async fn search_handler(
    State(catalog): State<Arc<BoardGameCatalog>>,
    ApiQuery(params): ApiQuery<BoardGameSearchParams>,
) -> Result<Json<Vec<BoardGame>>, AppError> {
    if params.q.trim().is_empty() {
        return Err(AppError::Validation("query parameter 'q' is required".to_string()));
    }
    let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    let games = catalog
        .search(&params.q, limit)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(games))
}

pub(crate) async fn game_handler(
    State(catalog): State<Arc<BoardGameCatalog>>,
    ApiPath(game_id): ApiPath<u64>,
) -> Result<Json<BoardGame>, AppError> {
    catalog
        .get(game_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("board game {game_id}")))
}
