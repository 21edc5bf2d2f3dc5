//! Catalog manager: ingredient and recipe definitions

use serde::Deserialize;
use sqlx::{FromRow, SqlitePool};

use shared::{
    normalize_optional, validate_name, validate_positive, DeleteOutcome, Ingredient, Recipe, Unit,
};

use crate::error::{AppError, AppResult};
use crate::services::inventory::{IngredientRow, INGREDIENT_COLUMNS};

/// Catalog service
#[derive(Clone)]
pub struct CatalogService {
    db: SqlitePool,
}

/// Input for creating or renaming an ingredient
#[derive(Debug, Clone, Deserialize)]
pub struct IngredientInput {
    pub name: String,
    pub category: Option<String>,
    pub unit: Option<Unit>,
}

/// Input for creating or updating a recipe
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeInput {
    pub name: String,
    pub sale_price: f64,
}

#[derive(Debug, FromRow)]
struct RecipeRow {
    id: i64,
    name: String,
    sale_price: f64,
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        Recipe {
            id: row.id,
            name: row.name,
            sale_price: row.sale_price,
        }
    }
}

const RECIPE_COLUMNS: &str = "id, name, sale_price";

impl CatalogService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    // ========================================================================
    // Ingredients
    // ========================================================================

    /// Define an ingredient with zero stock and zero average cost
    pub async fn create_ingredient(&self, input: IngredientInput) -> AppResult<Ingredient> {
        let name = validate_name("name", &input.name)?;
        let category = normalize_optional(input.category.as_deref());
        let unit = input.unit.unwrap_or_default();

        let row = sqlx::query_as::<_, IngredientRow>(&format!(
            r#"
            INSERT INTO ingredients (name, category, unit, stock_qty, avg_cost)
            VALUES (?, ?, ?, 0, 0)
            RETURNING {INGREDIENT_COLUMNS}
            "#
        ))
        .bind(&name)
        .bind(&category)
        .bind(unit.as_str())
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::from_write(e, "ingredient", &name))?;

        let ingredient = Ingredient::from(row);
        tracing::info!(ingredient_id = ingredient.id, name = %ingredient.name, "Ingredient created");
        Ok(ingredient)
    }

    pub async fn get_ingredient(&self, ingredient_id: i64) -> AppResult<Ingredient> {
        sqlx::query_as::<_, IngredientRow>(&format!(
            "SELECT {INGREDIENT_COLUMNS} FROM ingredients WHERE id = ?"
        ))
        .bind(ingredient_id)
        .fetch_optional(&self.db)
        .await?
        .map(Ingredient::from)
        .ok_or_else(|| AppError::not_found("Ingredient"))
    }

    /// Change the descriptive fields; stock and average cost only move through purchases.
    ///
    /// A missing unit keeps the current one.
    pub async fn update_ingredient(
        &self,
        ingredient_id: i64,
        input: IngredientInput,
    ) -> AppResult<Ingredient> {
        let name = validate_name("name", &input.name)?;
        let category = normalize_optional(input.category.as_deref());

        let row = sqlx::query_as::<_, IngredientRow>(&format!(
            r#"
            UPDATE ingredients
            SET name = ?, category = ?, unit = COALESCE(?, unit)
            WHERE id = ?
            RETURNING {INGREDIENT_COLUMNS}
            "#
        ))
        .bind(&name)
        .bind(&category)
        .bind(input.unit.map(|u| u.as_str()))
        .bind(ingredient_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| AppError::from_write(e, "ingredient", &name))?
        .ok_or_else(|| AppError::not_found("Ingredient"))?;

        Ok(Ingredient::from(row))
    }

    /// Remove an ingredient. Its purchase history is kept, keyed by name.
    pub async fn delete_ingredient(&self, ingredient_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM ingredients WHERE id = ?")
            .bind(ingredient_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Ingredient"));
        }

        tracing::info!(ingredient_id, "Ingredient deleted");
        Ok(())
    }

    // ========================================================================
    // Recipes
    // ========================================================================

    pub async fn create_recipe(&self, input: RecipeInput) -> AppResult<Recipe> {
        let name = validate_name("name", &input.name)?;
        let sale_price = validate_positive("sale_price", input.sale_price)?;

        let row = sqlx::query_as::<_, RecipeRow>(&format!(
            "INSERT INTO recipes (name, sale_price) VALUES (?, ?) RETURNING {RECIPE_COLUMNS}"
        ))
        .bind(&name)
        .bind(sale_price)
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::from_write(e, "recipe", &name))?;

        let recipe = Recipe::from(row);
        tracing::info!(recipe_id = recipe.id, name = %recipe.name, "Recipe created");
        Ok(recipe)
    }

    pub async fn get_recipe(&self, recipe_id: i64) -> AppResult<Recipe> {
        sqlx::query_as::<_, RecipeRow>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = ?"
        ))
        .bind(recipe_id)
        .fetch_optional(&self.db)
        .await?
        .map(Recipe::from)
        .ok_or_else(|| AppError::not_found("Recipe"))
    }

    /// All recipes ordered by name
    pub async fn list_recipes(&self) -> AppResult<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, RecipeRow>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes ORDER BY name ASC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Recipe::from).collect())
    }

    /// Rename or reprice a recipe. Past sales keep the price they were charged.
    pub async fn update_recipe(&self, recipe_id: i64, input: RecipeInput) -> AppResult<Recipe> {
        let name = validate_name("name", &input.name)?;
        let sale_price = validate_positive("sale_price", input.sale_price)?;

        let row = sqlx::query_as::<_, RecipeRow>(&format!(
            "UPDATE recipes SET name = ?, sale_price = ? WHERE id = ? RETURNING {RECIPE_COLUMNS}"
        ))
        .bind(&name)
        .bind(sale_price)
        .bind(recipe_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| AppError::from_write(e, "recipe", &name))?
        .ok_or_else(|| AppError::not_found("Recipe"))?;

        Ok(Recipe::from(row))
    }

    /// Delete a recipe and, through the foreign-key cascade, every sale of it
    pub async fn delete_recipe(&self, recipe_id: i64) -> AppResult<DeleteOutcome> {
        let mut tx = self.db.begin().await?;

        let cascaded =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sales WHERE recipe_id = ?")
                .bind(recipe_id)
                .fetch_one(&mut *tx)
                .await?;

        let result = sqlx::query("DELETE FROM recipes WHERE id = ?")
            .bind(recipe_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Recipe"));
        }

        tx.commit().await?;

        tracing::info!(recipe_id, cascaded, "Recipe deleted with its sales");
        Ok(DeleteOutcome {
            deleted_id: recipe_id,
            cascaded,
        })
    }
}
