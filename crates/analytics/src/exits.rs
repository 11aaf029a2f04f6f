use crate::engine::AnalyticsEngine;
use crate::report::{ExitAnalysis, HistogramBin};
use crate::util::{mean, percentage};
use core_types::{Trade, TradeResult};
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

/// Width of one histogram bin, in percentage points.
pub const BIN_WIDTH_PERCENT: Decimal = dec!(0.5);

const NO_WINNERS_NOTE: &str = "No winning trades to analyze.";

impl AnalyticsEngine {
    /// Analyses where winning trades were closed and recommends the half-point
    /// band they most often land in.
    #[tracing::instrument(skip_all, fields(trades = trades.len()))]
    pub fn exit_analysis(&self, trades: &[Trade]) -> ExitAnalysis {
        let winning_returns: Vec<Decimal> = self
            .included(trades)
            .into_iter()
            .filter(|(_, metrics)| metrics.result == TradeResult::Win)
            .map(|(_, metrics)| metrics.trade_return_percent)
            .collect();

        if winning_returns.is_empty() {
            return ExitAnalysis {
                optimal_exit_percent: Decimal::ZERO,
                exit_range_min: Decimal::ZERO,
                exit_range_max: Decimal::ZERO,
                average_exit_percent: Decimal::ZERO,
                winning_trade_count: 0,
                histogram: Vec::new(),
                analysis_note: NO_WINNERS_NOTE.to_string(),
            };
        }

        let histogram = build_histogram(&winning_returns);

        // First bin with the largest share; bins are ascending, so ties go to the lower band.
        let mut optimal_exit_percent = Decimal::ZERO;
        let mut top_share = Decimal::MIN;
        for bin in &histogram {
            if bin.percentage > top_share {
                top_share = bin.percentage;
                optimal_exit_percent = bin.range_start;
            }
        }

        let sample_size = winning_returns.len();
        tracing::debug!(sample_size, bins = histogram.len(), %optimal_exit_percent, "Exit histogram built.");

        ExitAnalysis {
            optimal_exit_percent,
            exit_range_min: winning_returns.iter().copied().min().unwrap_or_default(),
            exit_range_max: winning_returns.iter().copied().max().unwrap_or_default(),
            average_exit_percent: mean(&winning_returns),
            winning_trade_count: sample_size,
            histogram,
            analysis_note: format!(
                "Based on {} winning trades, exits between {:.2}% and {:.2}% were the most common. \
                 This is a statistical observation, not a guarantee.",
                sample_size,
                optimal_exit_percent,
                optimal_exit_percent + BIN_WIDTH_PERCENT
            ),
        }
    }
}

/// Counts returns into `[i * width, (i + 1) * width)` bins starting at zero and
/// keeps only the bins that received something, in ascending order.
///
/// Every return lands in exactly one bin; values too large to divide by the
/// width share the topmost representable bin.
fn build_histogram(returns: &[Decimal]) -> Vec<HistogramBin> {
    let mut counts: BTreeMap<Decimal, usize> = BTreeMap::new();
    for value in returns {
        let index = value
            .checked_div(BIN_WIDTH_PERCENT)
            .unwrap_or(Decimal::MAX)
            .floor();
        *counts.entry(index).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(index, count)| {
            let range_start = index * BIN_WIDTH_PERCENT;
            HistogramBin {
                range_start,
                range_end: range_start.saturating_add(BIN_WIDTH_PERCENT),
                count,
                percentage: percentage(count, returns.len()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use core_types::Direction;

    fn trade(direction: Direction, exit: Decimal) -> Trade {
        let entry = Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap();
        Trade::new("t", "AUDUSD", direction, dec!(100), exit, entry, entry + chrono::Duration::hours(2))
    }

    #[test]
    fn no_winners_means_no_histogram() {
        let engine = AnalyticsEngine::default();
        let trades = vec![
            trade(Direction::Long, dec!(97)),
            trade(Direction::Short, dec!(100)),
            trade(Direction::Long, dec!(120)).excluded(),
        ];
        let analysis = engine.exit_analysis(&trades);
        assert!(analysis.histogram.is_empty());
        assert_eq!(analysis.exit_range_min, Decimal::ZERO);
        assert_eq!(analysis.exit_range_max, Decimal::ZERO);
        assert_eq!(analysis.optimal_exit_percent, Decimal::ZERO);
        assert_eq!(analysis.analysis_note, NO_WINNERS_NOTE);
    }

    #[test]
    fn histogram_bins_are_half_open_and_sparse() {
        let engine = AnalyticsEngine::default();
        let trades = vec![
            trade(Direction::Long, dec!(100.3)),  // 0.3  -> [0.0, 0.5)
            trade(Direction::Long, dec!(101.0)),  // 1.0  -> [1.0, 1.5)
            trade(Direction::Short, dec!(98.8)),  // 1.2  -> [1.0, 1.5)
            trade(Direction::Long, dec!(101.5)),  // 1.5  -> [1.5, 2.0)
            trade(Direction::Long, dec!(99)),     // loss, ignored
        ];
        let analysis = engine.exit_analysis(&trades);

        assert_eq!(analysis.winning_trade_count, 4);
        assert_eq!(analysis.exit_range_min, dec!(0.3));
        assert_eq!(analysis.exit_range_max, dec!(1.5));
        assert_eq!(analysis.average_exit_percent, dec!(1));

        let bins: Vec<(Decimal, usize)> =
            analysis.histogram.iter().map(|b| (b.range_start, b.count)).collect();
        assert_eq!(bins, vec![(dec!(0), 1), (dec!(1.0), 2), (dec!(1.5), 1)]);
        assert_eq!(analysis.histogram[1].percentage, dec!(50));
        assert_eq!(analysis.histogram[1].to_string(), "1.0-1.5%");

        assert_eq!(analysis.optimal_exit_percent, dec!(1.0));
        assert!(analysis.analysis_note.contains("4 winning trades"));
        assert!(analysis.analysis_note.contains("1.00% and 1.50%"));
    }

    #[test]
    fn ties_pick_the_lowest_band() {
        let engine = AnalyticsEngine::default();
        let trades = vec![
            trade(Direction::Long, dec!(102.2)),
            trade(Direction::Long, dec!(100.6)),
        ];
        let analysis = engine.exit_analysis(&trades);
        assert_eq!(analysis.histogram.len(), 2);
        assert_eq!(analysis.optimal_exit_percent, dec!(0.5));
    }

    #[test]
    fn outsized_returns_still_fill_a_bin() {
        let engine = AnalyticsEngine::default();
        let trades = vec![
            trade(Direction::Long, dec!(101)),
            trade(Direction::Long, dec!(100000000000000000000000)),
        ];
        let analysis = engine.exit_analysis(&trades);

        assert_eq!(analysis.histogram.len(), 2);
        let counted: usize = analysis.histogram.iter().map(|bin| bin.count).sum();
        assert_eq!(counted, analysis.winning_trade_count);
        let share: Decimal = analysis.histogram.iter().map(|bin| bin.percentage).sum();
        assert_eq!(share, dec!(100));
        assert!(analysis.histogram[1].range_start > dec!(18446744073709551615));
    }

    #[test]
    fn returns_beyond_the_divisible_range_use_the_top_bin() {
        let histogram = build_histogram(&[dec!(2), Decimal::MAX]);
        assert_eq!(histogram.len(), 2);
        assert_eq!(histogram[0].range_start, dec!(2.0));
        assert_eq!(histogram[1].count, 1);
        assert_eq!(histogram[1].percentage, dec!(50));
    }
}
