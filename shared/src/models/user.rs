//! User account models

use serde::{Deserialize, Serialize};

/// A login identity; the password verifier never leaves the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
}
