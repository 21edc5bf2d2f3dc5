//! Route definitions for Bistro Ledger

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Protected routes
        .nest("/ingredients", ingredient_routes(state.clone()))
        .nest("/recipes", recipe_routes(state.clone()))
        .nest("/purchases", purchase_routes(state.clone()))
        .nest("/sales", sale_routes(state.clone()))
        .nest("/reports", report_routes(state))
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(handlers::login))
}

/// Ingredient routes (protected)
fn ingredient_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_ingredients).post(handlers::create_ingredient),
        )
        .route(
            "/:ingredient_id",
            get(handlers::get_ingredient)
                .put(handlers::update_ingredient)
                .delete(handlers::delete_ingredient),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Recipe routes (protected)
fn recipe_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_recipes).post(handlers::create_recipe),
        )
        .route(
            "/:recipe_id",
            get(handlers::get_recipe)
                .put(handlers::update_recipe)
                .delete(handlers::delete_recipe),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Purchase routes (protected)
fn purchase_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_purchases).post(handlers::record_purchase),
        )
        .route("/:purchase_id", delete(handlers::delete_purchase))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Sale routes (protected)
fn sale_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_sales).post(handlers::record_sale))
        .route("/:sale_id", delete(handlers::delete_sale))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Report routes (protected)
fn report_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/sales", get(handlers::get_sales_report))
        .route("/sales/summary", get(handlers::get_sales_summary))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
