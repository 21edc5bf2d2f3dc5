//! Business logic services for Bistro Ledger

pub mod auth;
pub mod catalog;
pub mod inventory;
pub mod reporting;
pub mod sales;

pub use auth::AuthService;
pub use catalog::CatalogService;
pub use inventory::InventoryService;
pub use reporting::ReportingService;
pub use sales::SalesService;
