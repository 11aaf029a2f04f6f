use crate::engine::AnalyticsEngine;
use crate::report::DailySummary;
use crate::util::percentage;
use chrono::{Datelike, NaiveDate};
use core_types::{Trade, TradeResult};
use rust_decimal::Decimal;

impl AnalyticsEngine {
    /// Builds the journal summary for a single local calendar day.
    #[tracing::instrument(skip_all, fields(trades = trades.len(), date = %date))]
    pub fn daily_summary(&self, trades: &[Trade], date: NaiveDate) -> DailySummary {
        let day: Vec<_> = self
            .included(trades)
            .into_iter()
            .filter(|(_, metrics)| metrics.entry_date == date)
            .collect();

        let count = |result: TradeResult| day.iter().filter(|(_, m)| m.result == result).count();
        let win_count = count(TradeResult::Win);

        // Strict comparisons keep the earliest trade on ties.
        let mut best: Option<(&Trade, Decimal)> = None;
        let mut worst: Option<(&Trade, Decimal)> = None;
        for (trade, metrics) in &day {
            let r = metrics.trade_return_percent;
            if best.is_none_or(|(_, b)| r > b) {
                best = Some((*trade, r));
            }
            if worst.is_none_or(|(_, w)| r < w) {
                worst = Some((*trade, r));
            }
        }

        let notes = day
            .iter()
            .map(|(trade, _)| trade.notes.as_str())
            .filter(|note| !note.trim().is_empty())
            .map(str::to_string)
            .collect();

        DailySummary {
            date,
            day_of_week: date.weekday(),
            total_return_percent: day.iter().map(|(_, m)| m.trade_return_percent).sum(),
            trade_count: day.len(),
            win_count,
            loss_count: count(TradeResult::Loss),
            breakeven_count: count(TradeResult::Breakeven),
            win_rate: percentage(win_count, day.len()),
            best_trade: best.map(|(trade, _)| trade.clone()),
            worst_trade: worst.map(|(trade, _)| trade.clone()),
            notes,
        }
    }
}
