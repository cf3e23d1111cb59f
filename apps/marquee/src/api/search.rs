//! Search API endpoint.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::error::{AppError, Result};
use crate::services::CatalogPage;
use crate::views::search::SearchParams;
use crate::AppState;

/// GET /api/search?query=...&kind=movie|tv&page=N
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<CatalogPage>> {
    let query = params.query();
    if query.is_empty() {
        return Err(AppError::BadRequest("query must not be empty".to_string()));
    }

    let page = state
        .catalog()
        .search(params.kind(), query, params.page())
        .await?;
    Ok(Json(page))
}
