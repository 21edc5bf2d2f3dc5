//! Domain models
//!
//! Re-exports the models shared with the WebAssembly client

pub use shared::models::*;
pub use shared::DeleteOutcome;
