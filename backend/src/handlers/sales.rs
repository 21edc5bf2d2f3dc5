//! HTTP handlers for sales

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use shared::normalize_fee_input;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::models::Sale;
use crate::services::sales::{SaleInput, SaleListing, SalesService};
use crate::AppState;

/// Sale form as typed at the counter
#[derive(Debug, Deserialize)]
pub struct RecordSaleRequest {
    pub recipe_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
    /// Either a fraction (0.12) or a percentage (12)
    #[serde(default)]
    pub platform_fee: f64,
}

impl From<RecordSaleRequest> for SaleInput {
    fn from(req: RecordSaleRequest) -> Self {
        SaleInput {
            recipe_id: req.recipe_id,
            quantity: req.quantity,
            unit_price: req.unit_price,
            platform_fee_fraction: normalize_fee_input(req.platform_fee),
        }
    }
}

pub async fn record_sale(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(body): Json<RecordSaleRequest>,
) -> AppResult<(StatusCode, Json<Sale>)> {
    let service = SalesService::new(state.db);
    let sale = service.record_sale(body.into()).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

/// Sales with recipe names, newest first
pub async fn list_sales(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<SaleListing>>> {
    let service = SalesService::new(state.db);
    let sales = service.list_sales().await?;
    Ok(Json(sales))
}

pub async fn delete_sale(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(sale_id): Path<i64>,
) -> AppResult<StatusCode> {
    let service = SalesService::new(state.db);
    service.delete_sale(sale_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
