//! HTTP handlers for sales reports

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDateTime;
use serde::Deserialize;

use shared::{local_now, parse_timestamp, ReportWindow, ValidationError};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::models::SalesSummary;
use crate::services::ReportingService;
use crate::AppState;

/// Custom window; either bound may be omitted
#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub format: Option<String>, // "json" or "csv"
}

fn parse_bound(raw: Option<&str>) -> Result<Option<NaiveDateTime>, ValidationError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(text) => parse_timestamp(text)
            .map(Some)
            .ok_or_else(|| ValidationError::InvalidTimestamp(text.to_string())),
    }
}

/// Totals for sales in `[start, end)`
pub async fn get_sales_report(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<WindowQuery>,
) -> AppResult<Json<SalesSummary>> {
    let window = ReportWindow::new(
        parse_bound(query.start.as_deref())?,
        parse_bound(query.end.as_deref())?,
    );

    let service = ReportingService::new(state.db.clone());
    let summary = service.aggregate(window).await?;
    Ok(Json(summary))
}

/// Today, last 7 days, last 30 days and all time
pub async fn get_sales_summary(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Response> {
    let service = ReportingService::new(state.db.clone());
    let report = service
        .standard_report(local_now(), &state.config.display)
        .await?;

    if query.format.as_deref() == Some("csv") {
        let csv = ReportingService::export_to_csv(&report.rows)?;
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"sales_summary.csv\"",
                ),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(report).into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bound() {
        assert_eq!(parse_bound(None), Ok(None));
        assert_eq!(parse_bound(Some("  ")), Ok(None));
        assert!(parse_bound(Some("2024-03-01")).unwrap().is_some());
        assert!(parse_bound(Some("2024-03-01 08:30:00")).unwrap().is_some());
        assert_eq!(
            parse_bound(Some("March")),
            Err(ValidationError::InvalidTimestamp("March".to_string()))
        );
    }
}
