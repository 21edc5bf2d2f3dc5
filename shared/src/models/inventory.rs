//! Ingredient inventory models and the moving-average cost rule

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Units of measure an ingredient can be stocked in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    #[serde(alias = "un")]
    Piece,
    #[serde(alias = "g")]
    Gram,
    #[serde(alias = "kg")]
    Kilogram,
    #[serde(alias = "ml")]
    Milliliter,
    #[serde(alias = "l")]
    Liter,
}

impl Unit {
    pub const ALL: [Unit; 5] = [
        Unit::Piece,
        Unit::Gram,
        Unit::Kilogram,
        Unit::Milliliter,
        Unit::Liter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Piece => "piece",
            Unit::Gram => "gram",
            Unit::Kilogram => "kilogram",
            Unit::Milliliter => "milliliter",
            Unit::Liter => "liter",
        }
    }

    /// Short label shown next to quantities
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Piece => "un",
            Unit::Gram => "g",
            Unit::Kilogram => "kg",
            Unit::Milliliter => "ml",
            Unit::Liter => "l",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored or supplied unit code is not recognised
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown unit of measure: {0}")]
pub struct UnknownUnit(pub String);

impl std::str::FromStr for Unit {
    type Err = UnknownUnit;

    /// Accepts both the stored names and the short symbols
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "piece" | "un" => Ok(Unit::Piece),
            "gram" | "g" => Ok(Unit::Gram),
            "kilogram" | "kg" => Ok(Unit::Kilogram),
            "milliliter" | "ml" => Ok(Unit::Milliliter),
            "liter" | "l" => Ok(Unit::Liter),
            _ => Err(UnknownUnit(s.to_string())),
        }
    }
}

impl TryFrom<String> for Unit {
    type Error = UnknownUnit;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A stocked ingredient
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub unit: Unit,
    pub stock_qty: f64,
    pub avg_cost: f64,
}

impl Ingredient {
    pub fn position(&self) -> StockPosition {
        StockPosition {
            stock_qty: self.stock_qty,
            avg_cost: self.avg_cost,
        }
    }

    /// Value of the stock on hand at the blended cost
    pub fn stock_value(&self) -> f64 {
        self.position().value()
    }
}

/// An immutable ingredient acquisition, keyed by name rather than id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Purchase {
    pub id: i64,
    pub ingredient_name: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub occurred_at: NaiveDateTime,
}

/// Errors raised by the stock arithmetic when its preconditions are broken
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    #[error("Purchase quantity must be positive, got {0}")]
    NonPositiveQuantity(f64),

    #[error("Purchase unit price must be positive, got {0}")]
    NonPositivePrice(f64),

    #[error("Stock position is corrupt: stock {stock_qty}, average cost {avg_cost}")]
    CorruptPosition { stock_qty: f64, avg_cost: f64 },

    #[error("Purchase of {quantity} at {unit_price} overflows the stock position")]
    Overflow { quantity: f64, unit_price: f64 },
}

/// Stock quantity together with its moving-average unit cost
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct StockPosition {
    pub stock_qty: f64,
    pub avg_cost: f64,
}

impl StockPosition {
    /// Position of an ingredient created by its first purchase
    pub fn opening(quantity: f64, unit_price: f64) -> Result<Self, LedgerError> {
        StockPosition::default().apply_purchase(quantity, unit_price)
    }

    /// Blend a purchase into the position using the weighted-average rule.
    ///
    /// `S1 = S0 + q`, `C1 = (S0*C0 + q*p) / S1`, and `C1 = p` when `S1` is zero.
    pub fn apply_purchase(&self, quantity: f64, unit_price: f64) -> Result<Self, LedgerError> {
        if !(quantity.is_finite() && quantity > 0.0) {
            return Err(LedgerError::NonPositiveQuantity(quantity));
        }
        if !(unit_price.is_finite() && unit_price > 0.0) {
            return Err(LedgerError::NonPositivePrice(unit_price));
        }
        if !(self.stock_qty.is_finite() && self.stock_qty >= 0.0)
            || !(self.avg_cost.is_finite() && self.avg_cost >= 0.0)
        {
            return Err(LedgerError::CorruptPosition {
                stock_qty: self.stock_qty,
                avg_cost: self.avg_cost,
            });
        }

        let stock_qty = self.stock_qty + quantity;
        let avg_cost = if stock_qty > 0.0 {
            (self.stock_qty * self.avg_cost + quantity * unit_price) / stock_qty
        } else {
            unit_price
        };

        if !(stock_qty.is_finite() && avg_cost.is_finite()) {
            return Err(LedgerError::Overflow {
                quantity,
                unit_price,
            });
        }

        Ok(StockPosition { stock_qty, avg_cost })
    }

    pub fn value(&self) -> f64 {
        self.stock_qty * self.avg_cost
    }
}
