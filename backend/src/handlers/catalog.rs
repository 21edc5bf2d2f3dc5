//! HTTP handlers for ingredient and recipe definitions

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::models::{DeleteOutcome, Ingredient, Recipe};
use crate::services::catalog::{CatalogService, IngredientInput, RecipeInput};
use crate::AppState;

pub async fn create_ingredient(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<IngredientInput>,
) -> AppResult<(StatusCode, Json<Ingredient>)> {
    let service = CatalogService::new(state.db);
    let ingredient = service.create_ingredient(input).await?;
    Ok((StatusCode::CREATED, Json(ingredient)))
}

pub async fn get_ingredient(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(ingredient_id): Path<i64>,
) -> AppResult<Json<Ingredient>> {
    let service = CatalogService::new(state.db);
    let ingredient = service.get_ingredient(ingredient_id).await?;
    Ok(Json(ingredient))
}

pub async fn update_ingredient(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(ingredient_id): Path<i64>,
    Json(input): Json<IngredientInput>,
) -> AppResult<Json<Ingredient>> {
    let service = CatalogService::new(state.db);
    let ingredient = service.update_ingredient(ingredient_id, input).await?;
    Ok(Json(ingredient))
}

pub async fn delete_ingredient(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(ingredient_id): Path<i64>,
) -> AppResult<StatusCode> {
    let service = CatalogService::new(state.db);
    service.delete_ingredient(ingredient_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_recipes(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Recipe>>> {
    let service = CatalogService::new(state.db);
    let recipes = service.list_recipes().await?;
    Ok(Json(recipes))
}

pub async fn create_recipe(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<RecipeInput>,
) -> AppResult<(StatusCode, Json<Recipe>)> {
    let service = CatalogService::new(state.db);
    let recipe = service.create_recipe(input).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

pub async fn get_recipe(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(recipe_id): Path<i64>,
) -> AppResult<Json<Recipe>> {
    let service = CatalogService::new(state.db);
    let recipe = service.get_recipe(recipe_id).await?;
    Ok(Json(recipe))
}

pub async fn update_recipe(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(recipe_id): Path<i64>,
    Json(input): Json<RecipeInput>,
) -> AppResult<Json<Recipe>> {
    let service = CatalogService::new(state.db);
    let recipe = service.update_recipe(recipe_id, input).await?;
    Ok(Json(recipe))
}

/// Delete a recipe; the response reports how many sales went with it
pub async fn delete_recipe(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(recipe_id): Path<i64>,
) -> AppResult<Json<DeleteOutcome>> {
    let service = CatalogService::new(state.db);
    let outcome = service.delete_recipe(recipe_id).await?;
    Ok(Json(outcome))
}
