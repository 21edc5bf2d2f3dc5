//! Common types used across the ledger

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Storage format for every timestamp column
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Local wall-clock time truncated to whole seconds
pub fn local_now() -> NaiveDateTime {
    truncate_to_seconds(Local::now().naive_local())
}

pub fn truncate_to_seconds(at: NaiveDateTime) -> NaiveDateTime {
    at.with_nanosecond(0).unwrap_or(at)
}

/// Parse a `YYYY-MM-DD HH:MM:SS` timestamp or a bare `YYYY-MM-DD` date (midnight)
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .ok()
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Result of a delete that may take dependent rows with it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub deleted_id: i64,
    /// Rows removed by cascade alongside the target
    pub cascaded: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_timestamp() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(13, 45, 10)
            .unwrap();
        assert_eq!(parse_timestamp("2024-05-01 13:45:10"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-05-01"),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_local_now_has_no_fraction() {
        assert_eq!(local_now().nanosecond(), 0);
    }
}
