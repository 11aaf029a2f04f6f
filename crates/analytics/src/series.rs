use crate::engine::AnalyticsEngine;
use crate::report::{CumulativeReturnPoint, DailyReturn, RankedTrade, RankedTrades};
use chrono::{DateTime, Days, NaiveDate, Utc};
use core_types::Trade;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

impl AnalyticsEngine {
    /// Running sum of returns across the included trades, in input order.
    pub fn cumulative_returns(&self, trades: &[Trade]) -> Vec<CumulativeReturnPoint> {
        let mut running = Decimal::ZERO;
        self.included(trades)
            .into_iter()
            .map(|(trade, metrics)| {
                running += metrics.trade_return_percent;
                CumulativeReturnPoint {
                    trade_id: trade.id.clone(),
                    date: metrics.entry_date,
                    trade_return_percent: metrics.trade_return_percent,
                    cumulative_return_percent: running,
                }
            })
            .collect()
    }

    /// One entry per local calendar day for the `days_back` days ending on the day
    /// containing `now`, oldest first. Days without trades are reported as zero.
    #[tracing::instrument(skip_all, fields(trades = trades.len(), days_back = days_back))]
    pub fn daily_returns(&self, trades: &[Trade], days_back: u32, now: DateTime<Utc>) -> Vec<DailyReturn> {
        let today = now.with_timezone(&self.settings().utc_offset()).date_naive();

        let mut by_date: BTreeMap<NaiveDate, (usize, Decimal)> = BTreeMap::new();
        for (_, metrics) in self.included(trades) {
            let entry = by_date.entry(metrics.entry_date).or_default();
            entry.0 += 1;
            entry.1 += metrics.trade_return_percent;
        }

        (0..days_back)
            .rev()
            .filter_map(|back| today.checked_sub_days(Days::new(u64::from(back))))
            .map(|date| {
                let (trade_count, total_return_percent) =
                    by_date.get(&date).copied().unwrap_or_default();
                DailyReturn {
                    date,
                    trade_count,
                    total_return_percent,
                }
            })
            .collect()
    }

    /// The `limit` best and `limit` worst included trades by return.
    ///
    /// Equal returns keep their input order, and with fewer than `2 * limit`
    /// trades the two lists overlap.
    pub fn top_and_bottom_trades(&self, trades: &[Trade], limit: usize) -> RankedTrades {
        let mut ranked: Vec<RankedTrade> = self
            .included(trades)
            .into_iter()
            .map(|(trade, metrics)| RankedTrade {
                trade: trade.clone(),
                metrics,
            })
            .collect();
        ranked.sort_by(|a, b| b.metrics.trade_return_percent.cmp(&a.metrics.trade_return_percent));

        let best = ranked.iter().take(limit).cloned().collect();
        let worst = ranked.iter().rev().take(limit).cloned().collect();
        RankedTrades { best, worst }
    }
}
