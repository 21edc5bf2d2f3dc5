//! Helpers shared by the integration tests

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::SqlitePool;

use bistro_ledger_backend::{db, AppState, Config};

/// Fresh in-memory database with the schema applied
pub async fn test_pool() -> SqlitePool {
    db::connect_in_memory()
        .await
        .expect("in-memory database should open")
}

pub async fn test_state() -> AppState {
    AppState::new(test_pool().await, Config::default())
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}
