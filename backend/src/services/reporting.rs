//! Reporting aggregator: sales totals over time windows, plus CSV export

use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use shared::{MoneyFormat, ReportPeriod, ReportWindow, SaleFact, SalesSummary};

use crate::error::{AppError, AppResult};

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: SqlitePool,
}

/// One line of the standard report, with numbers and their display strings.
///
/// Flat so it can be written as a CSV record.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReportRow {
    pub period: ReportPeriod,
    pub label: String,
    pub sale_count: i64,
    pub total_quantity: i64,
    pub gross_revenue: f64,
    pub net_profit: f64,
    pub gross_revenue_display: String,
    pub net_profit_display: String,
}

impl ReportRow {
    fn new(period: ReportPeriod, summary: SalesSummary, format: &MoneyFormat) -> Self {
        Self {
            period,
            label: period.label().to_string(),
            sale_count: summary.sale_count,
            total_quantity: summary.total_quantity,
            gross_revenue: summary.gross_revenue,
            net_profit: summary.net_profit,
            gross_revenue_display: format.format_money(summary.gross_revenue),
            net_profit_display: format.format_money(summary.net_profit),
        }
    }

    pub fn summary(&self) -> SalesSummary {
        SalesSummary {
            sale_count: self.sale_count,
            total_quantity: self.total_quantity,
            gross_revenue: self.gross_revenue,
            net_profit: self.net_profit,
        }
    }
}

/// The four fixed windows evaluated at one instant
#[derive(Debug, Clone, Serialize)]
pub struct StandardReport {
    pub generated_at: NaiveDateTime,
    pub rows: Vec<ReportRow>,
}

impl StandardReport {
    pub fn row(&self, period: ReportPeriod) -> Option<&ReportRow> {
        self.rows.iter().find(|row| row.period == period)
    }
}

#[derive(Debug, FromRow)]
struct SaleFactRow {
    occurred_at: NaiveDateTime,
    quantity: i64,
    gross_total: f64,
    net_profit: f64,
}

impl From<SaleFactRow> for SaleFact {
    fn from(row: SaleFactRow) -> Self {
        SaleFact {
            occurred_at: row.occurred_at,
            quantity: row.quantity,
            gross_total: row.gross_total,
            net_profit: row.net_profit,
        }
    }
}

impl ReportingService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Every sale reduced to the fields the aggregator needs
    async fn load_facts(&self) -> AppResult<Vec<SaleFact>> {
        let rows = sqlx::query_as::<_, SaleFactRow>(
            "SELECT occurred_at, quantity, gross_total, net_profit FROM sales",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(SaleFact::from).collect())
    }

    /// Count and sums of the sales inside `window`
    pub async fn aggregate(&self, window: ReportWindow) -> AppResult<SalesSummary> {
        let facts = self.load_facts().await?;
        let summary = SalesSummary::aggregate(&facts, &window);

        tracing::debug!(
            start = ?window.start,
            end = ?window.end,
            sale_count = summary.sale_count,
            "Sales aggregated"
        );
        Ok(summary)
    }

    /// Today, last 7 days, last 30 days and all time, from a single read of the sales
    pub async fn standard_report(
        &self,
        now: NaiveDateTime,
        format: &MoneyFormat,
    ) -> AppResult<StandardReport> {
        let facts = self.load_facts().await?;

        let rows = ReportPeriod::ALL
            .iter()
            .map(|period| {
                let summary = SalesSummary::aggregate(&facts, &period.window(now));
                ReportRow::new(*period, summary, format)
            })
            .collect();

        Ok(StandardReport {
            generated_at: now,
            rows,
        })
    }

    /// Export data to CSV format
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
    }
}
