use crate::metrics::TradeMetrics;
use chrono::{NaiveDate, Weekday};
use core_types::{Period, Trade};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Summary statistics over a filtered set of trades.
///
/// This struct is the main output of the `AnalyticsEngine`; the hourly breakdown
/// produces one per hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStats {
    pub period: Period,

    // I. Returns
    pub total_return_percent: Decimal,
    pub best_trade_percent: Decimal,
    pub worst_trade_percent: Decimal,

    // II. Trade counts
    pub trade_count: usize,
    pub win_count: usize,
    pub loss_count: usize,
    pub breakeven_count: usize,
    pub win_rate: Decimal, // 0-100

    // III. Per-outcome averages
    pub average_win_percent: Decimal,
    pub average_loss_percent: Decimal,
    pub expectancy_percent: Decimal,
    pub average_risk_reward_ratio: Decimal,

    // IV. Streaks and timing
    pub max_win_streak: usize,
    pub max_loss_streak: usize,
    pub average_duration_minutes: i64,
}

impl PerformanceStats {
    /// Creates a zeroed-out record, the defined result for an empty trade set.
    pub fn empty(period: Period) -> Self {
        Self {
            period,
            total_return_percent: Decimal::ZERO,
            best_trade_percent: Decimal::ZERO,
            worst_trade_percent: Decimal::ZERO,
            trade_count: 0,
            win_count: 0,
            loss_count: 0,
            breakeven_count: 0,
            win_rate: Decimal::ZERO,
            average_win_percent: Decimal::ZERO,
            average_loss_percent: Decimal::ZERO,
            expectancy_percent: Decimal::ZERO,
            average_risk_reward_ratio: Decimal::ZERO,
            max_win_streak: 0,
            max_loss_streak: 0,
            average_duration_minutes: 0,
        }
    }
}

impl Default for PerformanceStats {
    fn default() -> Self {
        Self::empty(Period::All)
    }
}

/// Performance of all trades entered on one day of the week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekDayStats {
    pub day_of_week: Weekday,
    /// Position in the configured bucket set, Monday being 0.
    pub day_index: usize,
    pub total_return_percent: Decimal,
    pub average_return_percent: Decimal,
    pub trade_count: usize,
    pub win_rate: Decimal,
    /// Best single return, never below zero.
    pub largest_win_percent: Decimal,
    /// Worst single return, never above zero.
    pub largest_loss_percent: Decimal,
}

impl WeekDayStats {
    pub fn empty(day_of_week: Weekday, day_index: usize) -> Self {
        Self {
            day_of_week,
            day_index,
            total_return_percent: Decimal::ZERO,
            average_return_percent: Decimal::ZERO,
            trade_count: 0,
            win_rate: Decimal::ZERO,
            largest_win_percent: Decimal::ZERO,
            largest_loss_percent: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestWorstDays {
    pub best: WeekDayStats,
    pub worst: WeekDayStats,
}

/// Compact report of a single calendar day of trading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub day_of_week: Weekday,
    pub total_return_percent: Decimal,
    pub trade_count: usize,
    pub win_count: usize,
    pub loss_count: usize,
    pub breakeven_count: usize,
    pub win_rate: Decimal,
    pub best_trade: Option<Trade>,
    pub worst_trade: Option<Trade>,
    /// Non-blank trade notes, in trade order.
    pub notes: Vec<String>,
}

/// One non-empty bucket of the winning-exit histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    /// Inclusive lower bound, in percent.
    pub range_start: Decimal,
    /// Exclusive upper bound, in percent.
    pub range_end: Decimal,
    pub count: usize,
    /// Share of all winning trades that landed in this bin, 0-100.
    pub percentage: Decimal,
}

impl fmt::Display for HistogramBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}-{:.1}%", self.range_start, self.range_end)
    }
}

/// Where winning trades were closed, and the band they cluster in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitAnalysis {
    pub optimal_exit_percent: Decimal,
    pub exit_range_min: Decimal,
    pub exit_range_max: Decimal,
    pub average_exit_percent: Decimal,
    pub winning_trade_count: usize,
    pub histogram: Vec<HistogramBin>,
    pub analysis_note: String,
}

/// Running total of returns after each included trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeReturnPoint {
    pub trade_id: String,
    pub date: NaiveDate,
    pub trade_return_percent: Decimal,
    pub cumulative_return_percent: Decimal,
}

/// Sum of returns for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReturn {
    pub date: NaiveDate,
    pub trade_count: usize,
    pub total_return_percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTrade {
    pub trade: Trade,
    pub metrics: TradeMetrics,
}

/// The strongest and weakest trades, each list ordered from the extreme inwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTrades {
    pub best: Vec<RankedTrade>,
    pub worst: Vec<RankedTrade>,
}
