use crate::engine::AnalyticsEngine;
use crate::metrics::TradeMetrics;
use crate::report::{BestWorstDays, PerformanceStats, WeekDayStats};
use crate::util::{mean, percentage};
use chrono::Weekday;
use configuration::WeekdayBuckets;
use core_types::{Period, Trade, TradeResult};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

const WEEKDAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

const FULL_WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub const HOURS_PER_DAY: u32 = 24;

/// The days reported by the day-of-week breakdown, in output order.
pub fn weekday_buckets(buckets: WeekdayBuckets) -> &'static [Weekday] {
    match buckets {
        WeekdayBuckets::Weekdays => &WEEKDAYS,
        WeekdayBuckets::FullWeek => &FULL_WEEK,
    }
}

impl AnalyticsEngine {
    /// Performance per day of the week, one record per configured bucket in
    /// Monday-first order, empty buckets included.
    ///
    /// Trades entered on a day outside the bucket set are ignored here only.
    #[tracing::instrument(skip_all, fields(trades = trades.len()))]
    pub fn weekday_stats(&self, trades: &[Trade]) -> Vec<WeekDayStats> {
        let days = weekday_buckets(self.settings().weekday_buckets);
        let mut grouped: Vec<Vec<TradeMetrics>> = vec![Vec::new(); days.len()];
        let mut dropped = 0usize;

        for (_, metrics) in self.included(trades) {
            match days.iter().position(|d| *d == metrics.entry_day_of_week) {
                Some(index) => grouped[index].push(metrics),
                None => dropped += 1,
            }
        }
        if dropped > 0 {
            tracing::debug!(dropped, "Trades outside the weekday buckets were skipped.");
        }

        days.iter()
            .zip(grouped)
            .enumerate()
            .map(|(day_index, (day, metrics))| weekday_record(*day, day_index, &metrics))
            .collect()
    }

    /// The weekdays with the highest and lowest average return. The first
    /// bucket wins ties.
    pub fn best_worst_days(&self, trades: &[Trade]) -> Option<BestWorstDays> {
        let mut stats = self.weekday_stats(trades).into_iter();
        let first = stats.next()?;

        let (best, worst) = stats.fold((first.clone(), first), |(best, worst), day| {
            let best = if day.average_return_percent > best.average_return_percent {
                day.clone()
            } else {
                best
            };
            let worst = if day.average_return_percent < worst.average_return_percent {
                day
            } else {
                worst
            };
            (best, worst)
        });

        Some(BestWorstDays { best, worst })
    }

    /// Full performance statistics for each hour of the day, keyed 0 through 23.
    /// Every hour is present; hours without trades carry the all-zero record.
    #[tracing::instrument(skip_all, fields(trades = trades.len()))]
    pub fn hourly_performance(&self, trades: &[Trade]) -> BTreeMap<u32, PerformanceStats> {
        let mut by_hour: BTreeMap<u32, Vec<&Trade>> =
            (0..HOURS_PER_DAY).map(|hour| (hour, Vec::new())).collect();

        for (trade, metrics) in self.included(trades) {
            by_hour.entry(metrics.entry_hour).or_default().push(trade);
        }

        by_hour
            .into_iter()
            .map(|(hour, hour_trades)| (hour, self.summarize(hour_trades, Period::All)))
            .collect()
    }
}

fn weekday_record(day: Weekday, day_index: usize, metrics: &[TradeMetrics]) -> WeekDayStats {
    if metrics.is_empty() {
        return WeekDayStats::empty(day, day_index);
    }

    let returns: Vec<Decimal> = metrics.iter().map(|m| m.trade_return_percent).collect();
    let win_count = metrics.iter().filter(|m| m.result == TradeResult::Win).count();

    WeekDayStats {
        day_of_week: day,
        day_index,
        total_return_percent: returns.iter().sum(),
        average_return_percent: mean(&returns),
        trade_count: metrics.len(),
        win_rate: percentage(win_count, metrics.len()),
        largest_win_percent: returns.iter().copied().fold(Decimal::ZERO, Decimal::max),
        largest_loss_percent: returns.iter().copied().fold(Decimal::ZERO, Decimal::min),
    }
}
