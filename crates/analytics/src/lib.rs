//! # Journal Analytics Engine
//!
//! This crate turns a collection of journaled trades into the statistics a trader
//! reviews: per-trade metrics, period summaries, calendar breakdowns, the
//! winning-exit histogram and the chart series.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of storage or
//!   presentation. It depends only on `core-types` and the `AnalyticsSettings` from
//!   `configuration`.
//! - **Stateless Calculation:** The `AnalyticsEngine` holds settings and nothing else.
//!   Every result is recomputed from the trades passed in, so "now" is an argument
//!   wherever a calculation depends on it.
//! - **Exact Arithmetic:** Every return, rate and ratio is a `Decimal`.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: The calculator. Each analysis module adds its methods to it.
//! - `TradeMetrics`: The values derived from a single trade.
//! - The report structs in `report`: `PerformanceStats`, `WeekDayStats`,
//!   `DailySummary`, `ExitAnalysis` and the series points.

// Declare the modules that constitute this crate.
pub mod buckets;
pub mod daily;
pub mod engine;
pub mod exits;
pub mod metrics;
pub mod performance;
pub mod report;
pub mod series;
mod util;

// Re-export the key components to create a clean, public-facing API.
pub use buckets::{weekday_buckets, HOURS_PER_DAY};
pub use engine::AnalyticsEngine;
pub use exits::BIN_WIDTH_PERCENT;
pub use metrics::{TradeMetrics, BREAKEVEN_THRESHOLD_PERCENT};
pub use performance::{filter_by_period, period_start, streaks};
pub use report::{
    BestWorstDays, CumulativeReturnPoint, DailyReturn, DailySummary, ExitAnalysis, HistogramBin,
    PerformanceStats, RankedTrade, RankedTrades, WeekDayStats,
};
