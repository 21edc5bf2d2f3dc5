//! Sales recorder tests

mod common;

use bistro_ledger_backend::services::catalog::{CatalogService, RecipeInput};
use bistro_ledger_backend::services::sales::{SaleInput, SalesService};
use bistro_ledger_backend::AppError;
use shared::ValidationError;

use common::{approx, at, test_pool};

async fn setup() -> (SalesService, i64) {
    let pool = test_pool().await;
    let recipe = CatalogService::new(pool.clone())
        .create_recipe(RecipeInput {
            name: "Lasagna".to_string(),
            sale_price: 42.0,
        })
        .await
        .unwrap();
    (SalesService::new(pool), recipe.id)
}

fn sale(recipe_id: i64, quantity: i64, unit_price: f64, fee: f64) -> SaleInput {
    SaleInput {
        recipe_id,
        quantity,
        unit_price,
        platform_fee_fraction: fee,
    }
}

#[tokio::test]
async fn test_record_sale_computes_totals() {
    let (service, recipe_id) = setup().await;

    let recorded = service.record_sale(sale(recipe_id, 4, 10.0, 0.12)).await.unwrap();

    assert_eq!(recorded.recipe_id, recipe_id);
    assert_eq!(recorded.quantity, 4);
    assert!(approx(recorded.gross_total, 40.0));
    assert!(approx(recorded.platform_fee(), 4.8));
    assert!(approx(recorded.net_profit, 35.2));
    assert_eq!(recorded.cost_total, 0.0);
}

#[tokio::test]
async fn test_sale_price_is_not_taken_from_recipe() {
    let (service, recipe_id) = setup().await;

    let recorded = service.record_sale(sale(recipe_id, 1, 35.0, 0.0)).await.unwrap();

    assert_eq!(recorded.unit_price, 35.0);
    assert_eq!(recorded.net_profit, 35.0);
}

#[tokio::test]
async fn test_sale_for_unknown_recipe_is_not_found() {
    let (service, recipe_id) = setup().await;

    let err = service
        .record_sale(sale(recipe_id + 100, 1, 10.0, 0.0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(service.list_sales().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_sales_are_rejected() {
    let (service, recipe_id) = setup().await;

    let cases = [
        sale(recipe_id, 0, 10.0, 0.1),
        sale(recipe_id, -2, 10.0, 0.1),
        sale(recipe_id, 1, 0.0, 0.1),
        sale(recipe_id, 1, 10.0, 1.0),
        sale(recipe_id, 1, 10.0, -0.1),
        // A percentage is never rescaled by the recorder
        sale(recipe_id, 1, 10.0, 12.0),
    ];

    for input in cases {
        let err = service.record_sale(input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "got {:?}", err);
    }
    assert!(service.list_sales().await.unwrap().is_empty());

    let err = service
        .record_sale(sale(recipe_id, 1, 10.0, 1.5))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::FeeOutOfRange(_))
    ));
}

#[tokio::test]
async fn test_sale_totals_that_overflow_are_rejected() {
    let (service, recipe_id) = setup().await;

    let err = service
        .record_sale(sale(recipe_id, 10, 1e308, 0.1))
        .await
        .unwrap_err();
    assert!(
        matches!(
            err,
            AppError::Validation(ValidationError::OutOfRange {
                field: "unit_price"
            })
        ),
        "got {:?}",
        err
    );
    assert!(service.list_sales().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_sales_newest_first_with_recipe_name() {
    let (service, recipe_id) = setup().await;

    let older = service
        .record_sale_at(sale(recipe_id, 1, 42.0, 0.0), at(2024, 2, 1, 12, 0, 0))
        .await
        .unwrap();
    let newer = service
        .record_sale_at(sale(recipe_id, 2, 42.0, 0.0), at(2024, 2, 3, 19, 30, 0))
        .await
        .unwrap();

    let listed = service.list_sales().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].sale.id, newer.id);
    assert_eq!(listed[1].sale.id, older.id);
    assert_eq!(listed[0].recipe_name, "Lasagna");
    assert_eq!(listed[1].sale.occurred_at, at(2024, 2, 1, 12, 0, 0));
}

#[tokio::test]
async fn test_delete_sale() {
    let (service, recipe_id) = setup().await;
    let recorded = service.record_sale(sale(recipe_id, 1, 42.0, 0.0)).await.unwrap();

    service.delete_sale(recorded.id).await.unwrap();
    assert!(service.list_sales().await.unwrap().is_empty());

    assert!(matches!(
        service.delete_sale(recorded.id).await,
        Err(AppError::NotFound(_))
    ));
}
