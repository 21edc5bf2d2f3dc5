//! Sales recorder

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use shared::{local_now, truncate_to_seconds, validate_sale, Sale, SaleTotals};

use crate::error::{AppError, AppResult};

/// Sales service
#[derive(Clone)]
pub struct SalesService {
    db: SqlitePool,
}

/// Input for recording a sale. The fee is already a fraction here.
#[derive(Debug, Clone, Deserialize)]
pub struct SaleInput {
    pub recipe_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
    #[serde(default)]
    pub platform_fee_fraction: f64,
}

/// A sale together with the name of the recipe sold
#[derive(Debug, Clone, Serialize)]
pub struct SaleListing {
    #[serde(flatten)]
    pub sale: Sale,
    pub recipe_name: String,
}

#[derive(Debug, FromRow)]
struct SaleRow {
    id: i64,
    recipe_id: i64,
    quantity: i64,
    unit_price: f64,
    fee_fraction: f64,
    gross_total: f64,
    cost_total: f64,
    net_profit: f64,
    occurred_at: NaiveDateTime,
}

impl From<SaleRow> for Sale {
    fn from(row: SaleRow) -> Self {
        Sale {
            id: row.id,
            recipe_id: row.recipe_id,
            quantity: row.quantity,
            unit_price: row.unit_price,
            fee_fraction: row.fee_fraction,
            gross_total: row.gross_total,
            cost_total: row.cost_total,
            net_profit: row.net_profit,
            occurred_at: row.occurred_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct SaleListingRow {
    #[sqlx(flatten)]
    sale: SaleRow,
    recipe_name: String,
}

const SALE_COLUMNS: &str =
    "id, recipe_id, quantity, unit_price, fee_fraction, gross_total, cost_total, net_profit, occurred_at";

impl SalesService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Record a sale stamped with the current local time
    pub async fn record_sale(&self, input: SaleInput) -> AppResult<Sale> {
        self.record_sale_at(input, local_now()).await
    }

    /// Record a sale at an explicit time, for back-dating and imports.
    ///
    /// The unit price is whatever the caller charged; it is not checked
    /// against the recipe's list price.
    pub async fn record_sale_at(
        &self,
        input: SaleInput,
        occurred_at: NaiveDateTime,
    ) -> AppResult<Sale> {
        validate_sale(input.quantity, input.unit_price, input.platform_fee_fraction)?;
        let occurred_at = truncate_to_seconds(occurred_at);

        let recipe_count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM recipes WHERE id = ?")
                .bind(input.recipe_id)
                .fetch_one(&self.db)
                .await?;

        if recipe_count == 0 {
            return Err(AppError::not_found("Recipe"));
        }

        let totals = SaleTotals::compute(
            input.quantity,
            input.unit_price,
            input.platform_fee_fraction,
        );

        let row = sqlx::query_as::<_, SaleRow>(&format!(
            r#"
            INSERT INTO sales (recipe_id, quantity, unit_price, fee_fraction,
                               gross_total, cost_total, net_profit, occurred_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {SALE_COLUMNS}
            "#
        ))
        .bind(input.recipe_id)
        .bind(input.quantity)
        .bind(input.unit_price)
        .bind(input.platform_fee_fraction)
        .bind(totals.gross_total)
        .bind(totals.cost_total)
        .bind(totals.net_profit)
        .bind(occurred_at)
        .fetch_one(&self.db)
        .await?;

        let sale = Sale::from(row);
        tracing::info!(
            sale_id = sale.id,
            recipe_id = sale.recipe_id,
            quantity = sale.quantity,
            gross_total = sale.gross_total,
            net_profit = sale.net_profit,
            "Sale recorded"
        );
        Ok(sale)
    }

    /// Sales with their recipe names, newest first
    pub async fn list_sales(&self) -> AppResult<Vec<SaleListing>> {
        let rows = sqlx::query_as::<_, SaleListingRow>(
            r#"
            SELECT s.id, s.recipe_id, s.quantity, s.unit_price, s.fee_fraction,
                   s.gross_total, s.cost_total, s.net_profit, s.occurred_at,
                   r.name AS recipe_name
            FROM sales s
            JOIN recipes r ON r.id = s.recipe_id
            ORDER BY s.occurred_at DESC, s.id DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| SaleListing {
                sale: row.sale.into(),
                recipe_name: row.recipe_name,
            })
            .collect())
    }

    pub async fn delete_sale(&self, sale_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM sales WHERE id = ?")
            .bind(sale_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Sale"));
        }

        tracing::info!(sale_id, "Sale deleted");
        Ok(())
    }
}
