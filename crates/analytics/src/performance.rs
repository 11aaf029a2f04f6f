use crate::engine::AnalyticsEngine;
use crate::metrics::TradeMetrics;
use crate::report::PerformanceStats;
use crate::util::{mean, percentage, HUNDRED};
use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use configuration::ExpectancyFormula;
use core_types::{Period, Trade, TradeResult};
use rust_decimal::Decimal;

impl AnalyticsEngine {
    /// Calculates summary statistics for the trades entered within `period`.
    ///
    /// # Arguments
    ///
    /// * `trades` - The full trade collection, in the order streaks should be read.
    /// * `period` - Reporting window; everything but `All` is anchored to `now`.
    /// * `now` - The reference instant. Passed in rather than read from a clock so
    ///   the result is reproducible.
    #[tracing::instrument(skip_all, fields(trades = trades.len(), period = %period))]
    pub fn performance_stats(
        &self,
        trades: &[Trade],
        period: Period,
        now: DateTime<Utc>,
    ) -> PerformanceStats {
        let in_period = filter_by_period(trades, period, now, self.settings().utc_offset());
        self.summarize(in_period, period)
    }

    /// Aggregates an already period-filtered set of trades.
    pub(crate) fn summarize<'a, I>(&self, trades: I, period: Period) -> PerformanceStats
    where
        I: IntoIterator<Item = &'a Trade>,
    {
        let included = self.included(trades);
        if included.is_empty() {
            // Nothing to measure; an all-zero record is the defined answer.
            return PerformanceStats::empty(period);
        }

        let metrics: Vec<&TradeMetrics> = included.iter().map(|(_, m)| m).collect();
        let trade_count = metrics.len();

        let returns_of = |result: TradeResult| -> Vec<Decimal> {
            metrics
                .iter()
                .filter(|m| m.result == result)
                .map(|m| m.trade_return_percent)
                .collect()
        };
        let wins = returns_of(TradeResult::Win);
        let losses = returns_of(TradeResult::Loss);
        let breakeven_count = trade_count - wins.len() - losses.len();

        let win_rate = percentage(wins.len(), trade_count);
        let average_win_percent = mean(&wins);
        let average_loss_percent = mean(&losses);
        let expectancy_percent = expectancy(
            self.settings().expectancy_formula,
            win_rate,
            average_win_percent,
            average_loss_percent,
        );

        let (max_win_streak, max_loss_streak) = streaks(metrics.iter().map(|m| m.result));

        let ratios: Vec<Decimal> = metrics.iter().filter_map(|m| m.risk_reward_ratio).collect();

        let returns: Vec<Decimal> = metrics.iter().map(|m| m.trade_return_percent).collect();
        let total_return_percent: Decimal = returns.iter().sum();
        let best_trade_percent = returns.iter().copied().max().unwrap_or_default();
        let worst_trade_percent = returns.iter().copied().min().unwrap_or_default();

        let total_minutes: i64 = metrics.iter().map(|m| m.trade_duration_minutes).sum();
        let average_duration_minutes = total_minutes / trade_count as i64;

        tracing::debug!(
            trade_count,
            wins = wins.len(),
            losses = losses.len(),
            %total_return_percent,
            "Performance summarized."
        );

        PerformanceStats {
            period,
            total_return_percent,
            best_trade_percent,
            worst_trade_percent,
            trade_count,
            win_count: wins.len(),
            loss_count: losses.len(),
            breakeven_count,
            win_rate,
            average_win_percent,
            average_loss_percent,
            expectancy_percent,
            average_risk_reward_ratio: mean(&ratios),
            max_win_streak,
            max_loss_streak,
            average_duration_minutes,
        }
    }
}

/// Keeps the trades whose entry falls between the start of `period` and `now`,
/// both inclusive. Boundaries are local midnight in `offset`.
pub fn filter_by_period<'a>(
    trades: &'a [Trade],
    period: Period,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Vec<&'a Trade> {
    match period_start(period, now, offset) {
        None => trades.iter().collect(),
        Some(start) => trades
            .iter()
            .filter(|t| t.entry_time >= start && t.entry_time <= now)
            .collect(),
    }
}

/// First instant of the calendar week (Monday), month, or year containing `now`,
/// as seen from `offset`. `None` for `Period::All`, which has no lower bound.
pub fn period_start(period: Period, now: DateTime<Utc>, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let today = now.with_timezone(&offset).date_naive();

    let first_day = match period {
        Period::All => return None,
        Period::Week => today.checked_sub_days(Days::new(u64::from(
            today.weekday().num_days_from_monday(),
        )))?,
        Period::Month => today.with_day(1)?,
        Period::Year => NaiveDate::from_ymd_opt(today.year(), 1, 1)?,
    };

    offset
        .from_local_datetime(&first_day.and_time(NaiveTime::MIN))
        .single()
        .map(|start| start.with_timezone(&Utc))
}

fn expectancy(
    formula: ExpectancyFormula,
    win_rate: Decimal,
    average_win: Decimal,
    average_loss: Decimal,
) -> Decimal {
    let loss_probability = Decimal::ONE - win_rate / HUNDRED;
    match formula {
        // The win term deliberately multiplies by the 0-100 rate.
        ExpectancyFormula::Legacy => win_rate * average_win + loss_probability * average_loss,
        ExpectancyFormula::ProbabilityWeighted => {
            win_rate / HUNDRED * average_win + loss_probability * average_loss
        }
    }
}

/// Longest run of consecutive wins and of consecutive losses.
/// A breakeven trade ends both runs.
pub fn streaks(results: impl IntoIterator<Item = TradeResult>) -> (usize, usize) {
    let (mut current_win, mut current_loss) = (0, 0);
    let (mut max_win, mut max_loss) = (0, 0);

    for result in results {
        match result {
            TradeResult::Win => {
                current_win += 1;
                current_loss = 0;
                max_win = max_win.max(current_win);
            }
            TradeResult::Loss => {
                current_loss += 1;
                current_win = 0;
                max_loss = max_loss.max(current_loss);
            }
            TradeResult::Breakeven => {
                current_win = 0;
                current_loss = 0;
            }
        }
    }

    (max_win, max_loss)
}
