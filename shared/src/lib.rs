//! Shared types and models for Bistro Ledger
//!
//! This crate holds the storage-free parts of the system: domain records,
//! the stock costing rule, sale arithmetic, report windows and display
//! formatting. It is used by the backend and by the WASM client helpers.

pub mod models;
pub mod money;
pub mod types;
pub mod validation;

pub use models::*;
pub use money::*;
pub use types::*;
pub use validation::*;
