//! Reporting aggregator tests
//!
//! Window boundaries and the four standard periods over stored sales

mod common;

use bistro_ledger_backend::services::catalog::{CatalogService, RecipeInput};
use bistro_ledger_backend::services::sales::{SaleInput, SalesService};
use bistro_ledger_backend::services::ReportingService;
use bistro_ledger_backend::AppError;
use shared::{
    MoneyFormat, ReportPeriod, ReportWindow, SalesSummary, ValidationError, MAX_SALE_QUANTITY,
};

use common::{approx, at, test_pool};

async fn seeded() -> ReportingService {
    let pool = test_pool().await;
    let recipe = CatalogService::new(pool.clone())
        .create_recipe(RecipeInput {
            name: "Espresso".to_string(),
            sale_price: 8.0,
        })
        .await
        .unwrap();
    let sales = SalesService::new(pool.clone());

    // (when, quantity, unit price, fee)
    let history = [
        (at(2024, 6, 15, 0, 0, 0), 1, 8.0, 0.0),
        (at(2024, 6, 15, 23, 59, 59), 2, 8.0, 0.25),
        (at(2024, 6, 9, 0, 0, 0), 1, 10.0, 0.0),
        (at(2024, 6, 8, 23, 59, 59), 1, 10.0, 0.0),
        (at(2024, 5, 17, 8, 0, 0), 3, 5.0, 0.0),
        (at(2023, 12, 25, 10, 0, 0), 4, 5.0, 0.1),
    ];

    for (when, quantity, unit_price, fee) in history {
        sales
            .record_sale_at(
                SaleInput {
                    recipe_id: recipe.id,
                    quantity,
                    unit_price,
                    platform_fee_fraction: fee,
                },
                when,
            )
            .await
            .unwrap();
    }

    ReportingService::new(pool)
}

#[tokio::test]
async fn test_empty_report_is_zero() {
    let service = ReportingService::new(test_pool().await);

    let summary = service.aggregate(ReportWindow::all_time()).await.unwrap();
    assert_eq!(summary, SalesSummary::default());

    let report = service
        .standard_report(at(2024, 6, 15, 12, 0, 0), &MoneyFormat::default())
        .await
        .unwrap();
    assert_eq!(report.rows.len(), 4);
    for row in &report.rows {
        assert_eq!(row.sale_count, 0);
        assert_eq!(row.gross_revenue_display, "R$ 0,00");
    }
}

#[tokio::test]
async fn test_custom_window_is_half_open() {
    let service = seeded().await;

    let window = ReportWindow::new(Some(at(2024, 6, 9, 0, 0, 0)), Some(at(2024, 6, 15, 0, 0, 0)));
    let summary = service.aggregate(window).await.unwrap();

    // Includes the sale exactly at the start, excludes the one exactly at the end
    assert_eq!(summary.sale_count, 1);
    assert!(approx(summary.gross_revenue, 10.0));
}

#[tokio::test]
async fn test_open_ended_windows() {
    let service = seeded().await;

    let since = service
        .aggregate(ReportWindow::new(Some(at(2024, 6, 1, 0, 0, 0)), None))
        .await
        .unwrap();
    assert_eq!(since.sale_count, 4);

    let until = service
        .aggregate(ReportWindow::new(None, Some(at(2024, 1, 1, 0, 0, 0))))
        .await
        .unwrap();
    assert_eq!(until.sale_count, 1);
    assert_eq!(until.total_quantity, 4);
    assert!(approx(until.net_profit, 18.0));
}

#[tokio::test]
async fn test_standard_report_periods() {
    let service = seeded().await;

    let report = service
        .standard_report(at(2024, 6, 15, 14, 30, 0), &MoneyFormat::default())
        .await
        .unwrap();

    let today = report.row(ReportPeriod::Today).unwrap();
    assert_eq!(today.sale_count, 2);
    assert_eq!(today.total_quantity, 3);
    assert!(approx(today.gross_revenue, 24.0));
    assert!(approx(today.net_profit, 20.0));
    assert_eq!(today.gross_revenue_display, "R$ 24,00");
    assert_eq!(today.net_profit_display, "R$ 20,00");

    // Six days back from midnight today: June 9 is in, June 8 is out
    let week = report.row(ReportPeriod::Last7Days).unwrap();
    assert_eq!(week.sale_count, 3);

    // Twenty-nine days back: May 17 is in
    let month = report.row(ReportPeriod::Last30Days).unwrap();
    assert_eq!(month.sale_count, 5);

    let all = report.row(ReportPeriod::AllTime).unwrap();
    assert_eq!(all.sale_count, 6);
    assert_eq!(all.total_quantity, 12);
    assert!(approx(all.gross_revenue, 79.0));
    assert!(approx(all.net_profit, 73.0));
}

#[tokio::test]
async fn test_report_uses_configured_format() {
    let service = seeded().await;

    let report = service
        .standard_report(at(2024, 6, 15, 14, 30, 0), &MoneyFormat::plain())
        .await
        .unwrap();
    let all = report.row(ReportPeriod::AllTime).unwrap();
    assert_eq!(all.gross_revenue_display, "$ 79.00");
}

#[tokio::test]
async fn test_report_exports_as_csv() {
    let service = seeded().await;

    let report = service
        .standard_report(at(2024, 6, 15, 14, 30, 0), &MoneyFormat::default())
        .await
        .unwrap();
    let csv = ReportingService::export_to_csv(&report.rows).unwrap();

    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("period,label,sale_count"));
    assert!(lines[1].starts_with("today,Today,2,3,"));
    assert!(lines[4].starts_with("all_time,All time,6,12,"));
}

#[tokio::test]
async fn test_large_sales_keep_reports_working() {
    let pool = test_pool().await;
    let recipe = CatalogService::new(pool.clone())
        .create_recipe(RecipeInput {
            name: "Catering tray".to_string(),
            sale_price: 1.0,
        })
        .await
        .unwrap();
    let sales = SalesService::new(pool.clone());
    let big = |quantity| SaleInput {
        recipe_id: recipe.id,
        quantity,
        unit_price: 1.0,
        platform_fee_fraction: 0.0,
    };

    // Quantities that would overflow the report sums never get stored
    let err = sales.record_sale(big(i64::MAX / 2 + 1)).await.unwrap_err();
    assert!(
        matches!(
            err,
            AppError::Validation(ValidationError::TooLarge {
                field: "quantity",
                ..
            })
        ),
        "got {:?}",
        err
    );

    sales.record_sale(big(MAX_SALE_QUANTITY)).await.unwrap();
    sales.record_sale(big(MAX_SALE_QUANTITY)).await.unwrap();

    let summary = ReportingService::new(pool)
        .aggregate(ReportWindow::all_time())
        .await
        .unwrap();
    assert_eq!(summary.sale_count, 2);
    assert_eq!(summary.total_quantity, 2 * MAX_SALE_QUANTITY);
    assert!(approx(summary.gross_revenue, 2.0 * MAX_SALE_QUANTITY as f64));
}
