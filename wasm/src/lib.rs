//! WebAssembly module for Bistro Ledger
//!
//! Lets the browser preview what the server will compute:
//! - Sale totals before a sale is recorded
//! - The blended average cost a purchase would produce
//! - Money and quantity display strings
//! - The standard sales report over cached sales, for offline use

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::money::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("Bistro Ledger WASM module loaded"));
}

fn to_js_error(message: String) -> JsValue {
    JsValue::from_str(&message)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization failed: {}", e))
}

fn parse_format(format_json: Option<String>) -> Result<MoneyFormat, String> {
    match format_json {
        Some(json) if !json.trim().is_empty() => {
            serde_json::from_str(&json).map_err(|e| format!("Invalid money format JSON: {}", e))
        }
        _ => Ok(MoneyFormat::default()),
    }
}

// ============================================================================
// Sale preview
// ============================================================================

fn sale_preview(quantity: i64, unit_price: f64, fee_input: f64) -> Result<SaleTotals, String> {
    let fee = normalize_fee_input(fee_input);
    validate_sale(quantity, unit_price, fee).map_err(|e| e.to_string())?;
    Ok(SaleTotals::compute(quantity, unit_price, fee))
}

/// Gross, platform fee and net profit for a prospective sale, as JSON.
///
/// The fee may be typed as a fraction or a percentage.
#[wasm_bindgen]
pub fn preview_sale(quantity: i64, unit_price: f64, fee_input: f64) -> Result<String, JsValue> {
    sale_preview(quantity, unit_price, fee_input)
        .and_then(|totals| to_json(&totals))
        .map_err(to_js_error)
}

// ============================================================================
// Purchase preview
// ============================================================================

fn purchase_preview(
    stock_qty: f64,
    avg_cost: f64,
    quantity: f64,
    unit_price: f64,
) -> Result<StockPosition, String> {
    StockPosition { stock_qty, avg_cost }
        .apply_purchase(quantity, unit_price)
        .map_err(|e| e.to_string())
}

/// Stock and average cost after a prospective purchase, as JSON
#[wasm_bindgen]
pub fn preview_purchase(
    stock_qty: f64,
    avg_cost: f64,
    quantity: f64,
    unit_price: f64,
) -> Result<String, JsValue> {
    purchase_preview(stock_qty, avg_cost, quantity, unit_price)
        .and_then(|position| to_json(&position))
        .map_err(to_js_error)
}

// ============================================================================
// Formatting
// ============================================================================

/// Format an amount; `format_json` is a serialized `MoneyFormat`, or empty for the default
#[wasm_bindgen]
pub fn format_money(amount: f64, format_json: Option<String>) -> Result<String, JsValue> {
    parse_format(format_json)
        .map(|format| format.format_money(amount))
        .map_err(to_js_error)
}

#[wasm_bindgen]
pub fn format_quantity(quantity: f64, format_json: Option<String>) -> Result<String, JsValue> {
    parse_format(format_json)
        .map(|format| format.format_quantity(quantity))
        .map_err(to_js_error)
}

/// Parse a number typed with the configured decimal separator
#[wasm_bindgen]
pub fn parse_amount(input: &str, format_json: Option<String>) -> Result<f64, JsValue> {
    parse_format(format_json)
        .and_then(|format| format.parse_amount(input).map_err(|e| e.to_string()))
        .map_err(to_js_error)
}

/// Fee as a fraction; values above 1 are read as percentages
#[wasm_bindgen]
pub fn normalize_fee(raw: f64) -> f64 {
    normalize_fee_input(raw)
}

/// Short symbol for a unit code such as `kilogram` or `kg`
#[wasm_bindgen]
pub fn unit_symbol(code: &str) -> Result<String, JsValue> {
    code.parse::<Unit>()
        .map(|unit| unit.symbol().to_string())
        .map_err(|e| to_js_error(e.to_string()))
}

// ============================================================================
// Offline report
// ============================================================================

#[derive(Serialize)]
struct OfflineReportRow {
    period: ReportPeriod,
    label: &'static str,
    #[serde(flatten)]
    summary: SalesSummary,
    gross_revenue_display: String,
    net_profit_display: String,
}

fn offline_report(
    facts_json: &str,
    now: NaiveDateTime,
    format: &MoneyFormat,
) -> Result<Vec<OfflineReportRow>, String> {
    let facts: Vec<SaleFact> =
        serde_json::from_str(facts_json).map_err(|e| format!("Invalid sales JSON: {}", e))?;

    Ok(ReportPeriod::ALL
        .iter()
        .map(|period| {
            let summary = SalesSummary::aggregate(&facts, &period.window(now));
            OfflineReportRow {
                period: *period,
                label: period.label(),
                summary,
                gross_revenue_display: format.format_money(summary.gross_revenue),
                net_profit_display: format.format_money(summary.net_profit),
            }
        })
        .collect())
}

/// Browser wall-clock time, in local time and truncated to seconds
fn browser_now() -> Option<NaiveDateTime> {
    let date = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        date.get_full_year() as i32,
        date.get_month() + 1,
        date.get_date(),
    )?
    .and_hms_opt(date.get_hours(), date.get_minutes(), date.get_seconds())
}

/// Current local time in the ledger's timestamp format
#[wasm_bindgen]
pub fn current_timestamp() -> Result<String, JsValue> {
    browser_now()
        .map(|now| now.format(TIMESTAMP_FORMAT).to_string())
        .ok_or_else(|| to_js_error("Browser clock returned an invalid date".to_string()))
}

/// Today, last 7 days, last 30 days and all time over cached sales.
///
/// `now` uses the ledger timestamp format; empty means the browser clock.
#[wasm_bindgen]
pub fn standard_report(
    facts_json: &str,
    now: &str,
    format_json: Option<String>,
) -> Result<String, JsValue> {
    let parsed = if now.trim().is_empty() {
        browser_now()
    } else {
        parse_timestamp(now)
    };
    let now = parsed.ok_or_else(|| to_js_error(format!("Invalid timestamp: {}", now)))?;

    parse_format(format_json)
        .and_then(|format| offline_report(facts_json, now, &format))
        .and_then(|rows| to_json(&rows))
        .map_err(to_js_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sale_preview_accepts_percentage_fee() {
        let totals = sale_preview(4, 10.0, 12.0).unwrap();
        assert!((totals.gross_total - 40.0).abs() < 1e-9);
        assert!((totals.net_profit - 35.2).abs() < 1e-9);

        assert!(sale_preview(0, 10.0, 0.1).is_err());
        assert!(sale_preview(1, 10.0, 100.0).is_err());
    }

    #[test]
    fn test_purchase_preview_blends_cost() {
        let position = purchase_preview(10.0, 5.0, 10.0, 10.0).unwrap();
        assert_eq!(position.stock_qty, 20.0);
        assert_eq!(position.avg_cost, 7.5);
        assert!(purchase_preview(10.0, 5.0, 0.0, 10.0).is_err());
    }

    #[test]
    fn test_parse_format_defaults_when_empty() {
        assert_eq!(parse_format(None).unwrap(), MoneyFormat::default());
        assert_eq!(parse_format(Some(" ".into())).unwrap(), MoneyFormat::default());

        let plain = parse_format(Some(
            r#"{"symbol":"$","decimal_separator":".","group_separator":","}"#.into(),
        ))
        .unwrap();
        assert_eq!(plain.format_money(1234.5), "$ 1,234.50");
        assert!(parse_format(Some("{".into())).is_err());
    }

    #[test]
    fn test_offline_report() {
        let now = parse_timestamp("2024-06-15 18:00:00").unwrap();
        let facts = r#"[
            {"occurred_at":"2024-06-15T12:00:00","quantity":2,"gross_total":20.0,"net_profit":18.0},
            {"occurred_at":"2024-06-01T12:00:00","quantity":1,"gross_total":10.0,"net_profit":10.0},
            {"occurred_at":"2023-01-01T12:00:00","quantity":5,"gross_total":50.0,"net_profit":45.0}
        ]"#;

        let rows = offline_report(facts, now, &MoneyFormat::default()).unwrap();
        let counts: Vec<i64> = rows.iter().map(|row| row.summary.sale_count).collect();
        assert_eq!(counts, vec![1, 1, 2, 3]);
        assert_eq!(rows[3].gross_revenue_display, "R$ 80,00");

        assert!(offline_report("not json", now, &MoneyFormat::default()).is_err());
    }
}
