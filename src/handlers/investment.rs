//! Investment board handlers
//!
//! /api/investments CRUD plus the status-only PATCH used for drag and drop.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::{error, warn};

use crate::error::ItemError;
use crate::models::investment::{
    DeleteItemResponse, ErrorResponse, GroupedItems, InvestmentItem, ItemPatch, ItemStatus,
    NewItem, StatusUpdateRequest,
};
use crate::services::projector;
use crate::AppState;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// GET /api/investments
///
/// All items grouped by board column, newest first within each column.
pub async fn get_all_items(
    State(state): State<AppState>,
) -> Result<Json<GroupedItems>, ApiError> {
    let items = state
        .items
        .get_all()
        .await
        .map_err(|e| map_item_error(e, "Error fetching items"))?;

    Ok(Json(projector::project(items)))
}

/// GET /api/investments/{id}
pub async fn get_item_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InvestmentItem>, ApiError> {
    let item = state
        .items
        .get_by_id(&id)
        .await
        .map_err(|e| map_item_error(e, "Error fetching item"))?;

    Ok(Json(item))
}

/// POST /api/investments
pub async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<NewItem>, JsonRejection>,
) -> Result<(StatusCode, Json<InvestmentItem>), ApiError> {
    let Json(new_item) = payload.map_err(map_rejection)?;

    let item = state
        .items
        .create(new_item)
        .await
        .map_err(|e| map_item_error(e, "Error creating item"))?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/investments/{id}
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ItemPatch>, JsonRejection>,
) -> Result<Json<InvestmentItem>, ApiError> {
    let Json(patch) = payload.map_err(map_rejection)?;

    let item = state
        .items
        .update(&id, patch)
        .await
        .map_err(|e| map_item_error(e, "Error updating item"))?;

    Ok(Json(item))
}

/// PATCH /api/investments/{id}/status
pub async fn update_item_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Result<Json<InvestmentItem>, ApiError> {
    let Json(request) = payload.map_err(map_rejection)?;

    let status = request
        .status
        .parse::<ItemStatus>()
        .map_err(|e| map_item_error(ItemError::Validation(e), "Error updating item status"))?;

    let item = state
        .items
        .update_status(&id, status)
        .await
        .map_err(|e| map_item_error(e, "Error updating item status"))?;

    Ok(Json(item))
}

/// DELETE /api/investments/{id}
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteItemResponse>, ApiError> {
    state
        .items
        .delete(&id)
        .await
        .map_err(|e| map_item_error(e, "Error deleting item"))?;

    Ok(Json(DeleteItemResponse {
        message: "Item deleted successfully".to_string(),
        id,
    }))
}

/// Map a repository failure to a status code and client-safe message.
/// Store errors are logged here and replaced by `context`.
fn map_item_error(err: ItemError, context: &str) -> ApiError {
    match err {
        ItemError::Validation(msg) => {
            warn!(error = %msg, "{}", context);
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    message: format!("{}: {}", context, msg),
                }),
            )
        }
        ItemError::NotFound(id) => {
            warn!(id = %id, "Item not found");
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    message: "Item not found".to_string(),
                }),
            )
        }
        ItemError::Database(e) => {
            error!(error = %e, "{}", context);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    message: context.to_string(),
                }),
            )
        }
    }
}

/// Malformed bodies are a client error, reported in the same `{message}` shape
fn map_rejection(rejection: JsonRejection) -> ApiError {
    let status = match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
        _ => StatusCode::BAD_REQUEST,
    };

    warn!(error = %rejection.body_text(), "Rejected request body");

    (
        status,
        Json(ErrorResponse {
            message: rejection.body_text(),
        }),
    )
}
