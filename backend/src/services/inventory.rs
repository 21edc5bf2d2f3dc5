//! Inventory ledger: purchases and the moving-average stock valuation

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use shared::{
    local_now, truncate_to_seconds, validate_purchase, Ingredient, Purchase, StockPosition, Unit,
};

use crate::error::{AppError, AppResult};

/// Inventory service for recording purchases and reading stock
#[derive(Clone)]
pub struct InventoryService {
    db: SqlitePool,
}

/// Input for recording a purchase
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseInput {
    pub ingredient_name: String,
    pub quantity: f64,
    pub unit_price: f64,
}

/// Outcome of a purchase: the appended record and the ingredient after blending
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseReceipt {
    pub purchase: Purchase,
    pub ingredient: Ingredient,
    /// True when this purchase introduced the ingredient
    pub created_ingredient: bool,
}

/// Ingredient columns as stored
#[derive(Debug, FromRow)]
pub(crate) struct IngredientRow {
    id: i64,
    name: String,
    category: Option<String>,
    #[sqlx(try_from = "String")]
    unit: Unit,
    stock_qty: f64,
    avg_cost: f64,
}

impl From<IngredientRow> for Ingredient {
    fn from(row: IngredientRow) -> Self {
        Ingredient {
            id: row.id,
            name: row.name,
            category: row.category,
            unit: row.unit,
            stock_qty: row.stock_qty,
            avg_cost: row.avg_cost,
        }
    }
}

/// Purchase columns as stored
#[derive(Debug, FromRow)]
struct PurchaseRow {
    id: i64,
    ingredient_name: String,
    quantity: f64,
    unit_price: f64,
    occurred_at: NaiveDateTime,
}

impl From<PurchaseRow> for Purchase {
    fn from(row: PurchaseRow) -> Self {
        Purchase {
            id: row.id,
            ingredient_name: row.ingredient_name,
            quantity: row.quantity,
            unit_price: row.unit_price,
            occurred_at: row.occurred_at,
        }
    }
}

pub(crate) const INGREDIENT_COLUMNS: &str = "id, name, category, unit, stock_qty, avg_cost";
const PURCHASE_COLUMNS: &str = "id, ingredient_name, quantity, unit_price, occurred_at";

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Record a purchase stamped with the current local time
    pub async fn apply_purchase(&self, input: PurchaseInput) -> AppResult<PurchaseReceipt> {
        self.apply_purchase_at(input, local_now()).await
    }

    /// Record a purchase and blend it into the ingredient's stock and average cost.
    ///
    /// The purchase row keeps the raw acquisition price. An unknown name creates
    /// the ingredient with the purchase as its opening position. Both writes
    /// commit together or not at all.
    pub async fn apply_purchase_at(
        &self,
        input: PurchaseInput,
        occurred_at: NaiveDateTime,
    ) -> AppResult<PurchaseReceipt> {
        let name = validate_purchase(&input.ingredient_name, input.quantity, input.unit_price)?;
        let occurred_at = truncate_to_seconds(occurred_at);

        let mut tx = self.db.begin().await?;

        let purchase = sqlx::query_as::<_, PurchaseRow>(&format!(
            r#"
            INSERT INTO purchases (ingredient_name, quantity, unit_price, occurred_at)
            VALUES (?, ?, ?, ?)
            RETURNING {PURCHASE_COLUMNS}
            "#
        ))
        .bind(&name)
        .bind(input.quantity)
        .bind(input.unit_price)
        .bind(occurred_at)
        .fetch_one(&mut *tx)
        .await?;

        let existing = sqlx::query_as::<_, IngredientRow>(&format!(
            "SELECT {INGREDIENT_COLUMNS} FROM ingredients WHERE name = ?"
        ))
        .bind(&name)
        .fetch_optional(&mut *tx)
        .await?;

        let created_ingredient = existing.is_none();
        let ingredient = match existing {
            None => {
                let opening = StockPosition::opening(input.quantity, input.unit_price)?;
                sqlx::query_as::<_, IngredientRow>(&format!(
                    r#"
                    INSERT INTO ingredients (name, category, unit, stock_qty, avg_cost)
                    VALUES (?, NULL, ?, ?, ?)
                    RETURNING {INGREDIENT_COLUMNS}
                    "#
                ))
                .bind(&name)
                .bind(Unit::default().as_str())
                .bind(opening.stock_qty)
                .bind(opening.avg_cost)
                .fetch_one(&mut *tx)
                .await?
            }
            Some(row) => {
                let current = StockPosition {
                    stock_qty: row.stock_qty,
                    avg_cost: row.avg_cost,
                };
                let next = current.apply_purchase(input.quantity, input.unit_price)?;
                sqlx::query_as::<_, IngredientRow>(&format!(
                    r#"
                    UPDATE ingredients SET stock_qty = ?, avg_cost = ?
                    WHERE id = ?
                    RETURNING {INGREDIENT_COLUMNS}
                    "#
                ))
                .bind(next.stock_qty)
                .bind(next.avg_cost)
                .bind(row.id)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        tx.commit().await?;

        let purchase: Purchase = purchase.into();
        let ingredient: Ingredient = ingredient.into();

        tracing::info!(
            purchase_id = purchase.id,
            ingredient = %ingredient.name,
            quantity = purchase.quantity,
            unit_price = purchase.unit_price,
            stock_qty = ingredient.stock_qty,
            avg_cost = ingredient.avg_cost,
            created = created_ingredient,
            "Purchase applied"
        );

        Ok(PurchaseReceipt {
            purchase,
            ingredient,
            created_ingredient,
        })
    }

    /// All ingredients ordered by name
    pub async fn list_ingredients(&self) -> AppResult<Vec<Ingredient>> {
        let rows = sqlx::query_as::<_, IngredientRow>(&format!(
            "SELECT {INGREDIENT_COLUMNS} FROM ingredients ORDER BY name ASC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Ingredient::from).collect())
    }

    /// Purchase history, newest first
    pub async fn list_purchases(&self) -> AppResult<Vec<Purchase>> {
        let rows = sqlx::query_as::<_, PurchaseRow>(&format!(
            "SELECT {PURCHASE_COLUMNS} FROM purchases ORDER BY id DESC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Purchase::from).collect())
    }

    /// Remove a purchase record.
    ///
    /// The ingredient's stock and average cost keep the purchase's effect.
    pub async fn delete_purchase(&self, purchase_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM purchases WHERE id = ?")
            .bind(purchase_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Purchase"));
        }

        tracing::info!(purchase_id, "Purchase deleted; stock left unchanged");
        Ok(())
    }
}
