//! Time-windowed sales aggregation

use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// The part of a sale the aggregator looks at
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SaleFact {
    pub occurred_at: NaiveDateTime,
    pub quantity: i64,
    pub gross_total: f64,
    pub net_profit: f64,
}

/// Half-open interval `[start, end)`; a missing bound leaves that side open
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ReportWindow {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl ReportWindow {
    pub fn new(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        Self { start, end }
    }

    pub fn all_time() -> Self {
        Self::default()
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start.map_or(true, |start| start <= at) && self.end.map_or(true, |end| at < end)
    }
}

/// Count and sums over the sales inside a window
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct SalesSummary {
    pub sale_count: i64,
    pub total_quantity: i64,
    pub gross_revenue: f64,
    pub net_profit: f64,
}

impl SalesSummary {
    /// Fold every fact inside `window` into a summary; zero-valued when nothing matches.
    ///
    /// Integer sums saturate rather than overflow.
    pub fn aggregate<'a, I>(facts: I, window: &ReportWindow) -> Self
    where
        I: IntoIterator<Item = &'a SaleFact>,
    {
        facts
            .into_iter()
            .filter(|fact| window.contains(fact.occurred_at))
            .fold(SalesSummary::default(), |acc, fact| SalesSummary {
                sale_count: acc.sale_count.saturating_add(1),
                total_quantity: acc.total_quantity.saturating_add(fact.quantity),
                gross_revenue: acc.gross_revenue + fact.gross_total,
                net_profit: acc.net_profit + fact.net_profit,
            })
    }
}

/// The fixed report periods shown on the dashboard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReportPeriod {
    Today,
    #[serde(rename = "last_7_days")]
    Last7Days,
    #[serde(rename = "last_30_days")]
    Last30Days,
    AllTime,
}

impl ReportPeriod {
    pub const ALL: [ReportPeriod; 4] = [
        ReportPeriod::Today,
        ReportPeriod::Last7Days,
        ReportPeriod::Last30Days,
        ReportPeriod::AllTime,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ReportPeriod::Today => "Today",
            ReportPeriod::Last7Days => "Last 7 days",
            ReportPeriod::Last30Days => "Last 30 days",
            ReportPeriod::AllTime => "All time",
        }
    }

    /// Window for this period relative to `now`, with starts truncated to midnight.
    /// Bounded periods end at the start of tomorrow.
    pub fn window(&self, now: NaiveDateTime) -> ReportWindow {
        let today_start = now.date().and_time(NaiveTime::MIN);
        let tomorrow_start = today_start + Duration::days(1);

        let days_back = match self {
            ReportPeriod::Today => 0,
            ReportPeriod::Last7Days => 6,
            ReportPeriod::Last30Days => 29,
            ReportPeriod::AllTime => return ReportWindow::all_time(),
        };

        ReportWindow::new(
            Some(today_start - Duration::days(days_back)),
            Some(tomorrow_start),
        )
    }
}

impl std::fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
