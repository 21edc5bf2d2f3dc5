//! HTTP handlers

pub mod auth;
pub mod catalog;
pub mod health;
pub mod inventory;
pub mod reporting;
pub mod sales;

pub use auth::login;
pub use catalog::{
    create_ingredient, create_recipe, delete_ingredient, delete_recipe, get_ingredient,
    get_recipe, list_recipes, update_ingredient, update_recipe,
};
pub use health::health_check;
pub use inventory::{delete_purchase, list_ingredients, list_purchases, record_purchase};
pub use reporting::{get_sales_report, get_sales_summary};
pub use sales::{delete_sale, list_sales, record_sale};
