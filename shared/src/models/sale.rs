//! Sale records and the per-sale profit arithmetic

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// An immutable sale event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sale {
    pub id: i64,
    pub recipe_id: i64,
    pub quantity: i64,
    /// Price charged per unit at the time of sale
    pub unit_price: f64,
    /// Share of the gross kept by the ordering platform, in `[0, 1)`
    pub fee_fraction: f64,
    pub gross_total: f64,
    pub cost_total: f64,
    pub net_profit: f64,
    pub occurred_at: NaiveDateTime,
}

impl Sale {
    pub fn platform_fee(&self) -> f64 {
        self.gross_total * self.fee_fraction
    }
}

/// Derived money fields of a sale
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SaleTotals {
    pub gross_total: f64,
    pub platform_fee: f64,
    pub cost_total: f64,
    pub net_profit: f64,
}

impl SaleTotals {
    /// Compute gross, platform fee and net profit for one sale.
    ///
    /// Cost of goods is fixed at zero: ingredient consumption is not
    /// attributed to sales.
    pub fn compute(quantity: i64, unit_price: f64, fee_fraction: f64) -> Self {
        let gross_total = unit_price * quantity as f64;
        let platform_fee = gross_total * fee_fraction;
        let cost_total = 0.0;
        let net_profit = gross_total - platform_fee - cost_total;

        SaleTotals {
            gross_total,
            platform_fee,
            cost_total,
            net_profit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_sale_with_platform_fee() {
        let totals = SaleTotals::compute(4, 10.0, 0.12);
        assert!(approx(totals.gross_total, 40.0));
        assert!(approx(totals.platform_fee, 4.8));
        assert!(approx(totals.net_profit, 35.2));
        assert_eq!(totals.cost_total, 0.0);
    }

    #[test]
    fn test_sale_without_fee_keeps_gross() {
        let totals = SaleTotals::compute(3, 25.9, 0.0);
        assert!(approx(totals.gross_total, 77.7));
        assert_eq!(totals.platform_fee, 0.0);
        assert!(approx(totals.net_profit, totals.gross_total));
    }
}
