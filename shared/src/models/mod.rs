//! Domain models for Bistro Ledger

mod inventory;
mod recipe;
mod report;
mod sale;
mod user;

pub use inventory::*;
pub use recipe::*;
pub use report::*;
pub use sale::*;
pub use user::*;
