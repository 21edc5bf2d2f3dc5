//! Menu recipe models

use serde::{Deserialize, Serialize};

/// A menu item with its current list price
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub sale_price: f64,
}
