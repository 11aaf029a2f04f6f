use crate::metrics::{calculate_trade_metrics, TradeMetrics};
use configuration::AnalyticsSettings;
use core_types::Trade;

/// A stateless calculator for deriving journal analytics from a set of trades.
///
/// The engine only carries settings. Every method is a pure function of its
/// arguments and recomputes from scratch, so one engine can be shared freely
/// across threads. The individual analyses live in their own modules and add
/// their methods to this type.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    settings: AnalyticsSettings,
}

impl AnalyticsEngine {
    pub fn new(settings: AnalyticsSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AnalyticsSettings {
        &self.settings
    }

    /// Derives the per-trade metrics for a single trade.
    pub fn trade_metrics(&self, trade: &Trade) -> TradeMetrics {
        calculate_trade_metrics(trade, &self.settings)
    }

    /// Yields the trades that count towards statistics, paired with their metrics,
    /// in input order.
    pub(crate) fn included<'a, I>(&self, trades: I) -> Vec<(&'a Trade, TradeMetrics)>
    where
        I: IntoIterator<Item = &'a Trade>,
    {
        trades
            .into_iter()
            .filter(|trade| !trade.exclude_from_stats)
            .map(|trade| (trade, self.trade_metrics(trade)))
            .collect()
    }
}
