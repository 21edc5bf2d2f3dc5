//! Display formatting for money and quantities
//!
//! The separator convention is carried as data so a deployment can pick its
//! locale without touching the formatting code.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::validation::ValidationError;

/// Separator and symbol convention used when rendering amounts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoneyFormat {
    pub symbol: String,
    pub decimal_separator: String,
    pub group_separator: String,
}

impl Default for MoneyFormat {
    fn default() -> Self {
        Self::brazilian()
    }
}

impl MoneyFormat {
    /// `R$ 1.234,50`
    pub fn brazilian() -> Self {
        Self {
            symbol: "R$".to_string(),
            decimal_separator: ",".to_string(),
            group_separator: ".".to_string(),
        }
    }

    /// `$ 1,234.50`
    pub fn plain() -> Self {
        Self {
            symbol: "$".to_string(),
            decimal_separator: ".".to_string(),
            group_separator: ",".to_string(),
        }
    }

    /// Symbol, grouped integer part and two fractional digits
    pub fn format_money(&self, amount: f64) -> String {
        match fixed_point(amount, 2) {
            Some(text) => format!("{} {}", self.symbol, self.render(&text, true)),
            None => format!("{} {}", self.symbol, amount),
        }
    }

    /// Three fractional digits, no grouping
    pub fn format_quantity(&self, quantity: f64) -> String {
        match fixed_point(quantity, 3) {
            Some(text) => self.render(&text, false),
            None => quantity.to_string(),
        }
    }

    /// Parse user-typed numeric text written with this convention
    pub fn parse_amount(&self, input: &str) -> Result<f64, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::NotNumeric(input.to_string()));
        }

        let normalized = if self.decimal_separator == "." {
            trimmed.to_string()
        } else {
            trimmed.replace(self.decimal_separator.as_str(), ".")
        };

        Decimal::from_str(&normalized)
            .ok()
            .and_then(|d| d.to_f64())
            .ok_or_else(|| ValidationError::NotNumeric(input.to_string()))
    }

    fn render(&self, fixed: &str, grouped: bool) -> String {
        let (sign, digits) = match fixed.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", fixed),
        };
        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));

        let int_text = if grouped {
            group_digits(int_part, &self.group_separator)
        } else {
            int_part.to_string()
        };

        if frac_part.is_empty() {
            format!("{}{}", sign, int_text)
        } else {
            format!("{}{}{}{}", sign, int_text, self.decimal_separator, frac_part)
        }
    }
}

/// Exact decimal text of `value` rounded half-to-even at `dp` places
fn fixed_point(value: f64, dp: u32) -> Option<String> {
    let mut rounded = Decimal::from_f64_retain(value)
        .or_else(|| Decimal::from_f64(value))?
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(dp);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    Some(rounded.to_string())
}

fn group_digits(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brazilian_money() {
        let fmt = MoneyFormat::brazilian();
        assert_eq!(fmt.format_money(1234.5), "R$ 1.234,50");
        assert_eq!(fmt.format_money(0.0), "R$ 0,00");
        assert_eq!(fmt.format_money(7.5), "R$ 7,50");
        assert_eq!(fmt.format_money(1_000_000.0), "R$ 1.000.000,00");
        assert_eq!(fmt.format_money(-35.2), "R$ -35,20");
        assert_eq!(fmt.format_money(999.999), "R$ 1.000,00");
    }

    #[test]
    fn test_plain_money() {
        let fmt = MoneyFormat::plain();
        assert_eq!(fmt.format_money(1234.5), "$ 1,234.50");
        assert_eq!(fmt.format_money(12.0), "$ 12.00");
    }

    #[test]
    fn test_quantities_use_three_places() {
        let fmt = MoneyFormat::brazilian();
        assert_eq!(fmt.format_quantity(2.5), "2,500");
        assert_eq!(fmt.format_quantity(1500.0), "1500,000");
        assert_eq!(MoneyFormat::plain().format_quantity(0.1234), "0.123");
    }

    #[test]
    fn test_rounding_follows_binary_value() {
        // 2.675 is stored as 2.67499999...
        assert_eq!(MoneyFormat::plain().format_money(2.675), "$ 2.67");
    }

    #[test]
    fn test_non_finite_falls_back() {
        let fmt = MoneyFormat::brazilian();
        assert_eq!(fmt.format_money(f64::NAN), "R$ NaN");
    }

    #[test]
    fn test_parse_amount() {
        let fmt = MoneyFormat::brazilian();
        assert_eq!(fmt.parse_amount("12,50").unwrap(), 12.5);
        assert_eq!(fmt.parse_amount(" 3 ").unwrap(), 3.0);
        assert!(fmt.parse_amount("abc").is_err());
        assert!(fmt.parse_amount("").is_err());
        assert_eq!(MoneyFormat::plain().parse_amount("0.15").unwrap(), 0.15);
    }
}
