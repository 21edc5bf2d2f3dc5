//! HTTP handlers for purchases and stock

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::models::{Ingredient, Purchase};
use crate::services::inventory::{InventoryService, PurchaseInput, PurchaseReceipt};
use crate::AppState;

/// Record a purchase and blend it into stock
pub async fn record_purchase(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<PurchaseInput>,
) -> AppResult<(StatusCode, Json<PurchaseReceipt>)> {
    let service = InventoryService::new(state.db);
    let receipt = service.apply_purchase(input).await?;
    tracing::debug!(user = %current_user.0.username, purchase_id = receipt.purchase.id, "Purchase recorded");
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// Purchase history, newest first
pub async fn list_purchases(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Purchase>>> {
    let service = InventoryService::new(state.db);
    let purchases = service.list_purchases().await?;
    Ok(Json(purchases))
}

pub async fn delete_purchase(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(purchase_id): Path<i64>,
) -> AppResult<StatusCode> {
    let service = InventoryService::new(state.db);
    service.delete_purchase(purchase_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Current stock and average cost of every ingredient
pub async fn list_ingredients(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Ingredient>>> {
    let service = InventoryService::new(state.db);
    let ingredients = service.list_ingredients().await?;
    Ok(Json(ingredients))
}
