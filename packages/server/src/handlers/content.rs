use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::models::content::{
    CategoryListResponse, CategoryResponse, EntryListQuery, EntryListResponse, EntryResponse,
};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Categories",
    operation_id = "listCategories",
    summary = "List categories",
    responses(
        (status = 200, description = "Category list", body = CategoryListResponse),
        (status = 500, description = "Store failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoryListResponse>, AppError> {
    let categories: Vec<CategoryResponse> = state
        .store
        .list_categories()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let total = categories.len() as u64;

    Ok(Json(CategoryListResponse { categories, total }))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Entries",
    operation_id = "listEntries",
    summary = "List entries",
    description = "Returns entries oldest first, optionally restricted to one category.",
    params(EntryListQuery),
    responses(
        (status = 200, description = "Entry list", body = EntryListResponse),
        (status = 400, description = "Malformed query (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Store failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<EntryListQuery>,
) -> Result<Json<EntryListResponse>, AppError> {
    let entries: Vec<EntryResponse> = state
        .store
        .list_entries(&query.into())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let total = entries.len() as u64;

    Ok(Json(EntryListResponse { entries, total }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Entries",
    operation_id = "getEntry",
    summary = "Get an entry",
    params(("id" = i64, Path, description = "Entry ID")),
    responses(
        (status = 200, description = "Entry details", body = EntryResponse),
        (status = 404, description = "Entry not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<EntryResponse>, AppError> {
    let entry = state
        .store
        .get_entry(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Entry not found".into()))?;

    Ok(Json(entry.into()))
}
