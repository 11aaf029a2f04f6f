use crate::util::HUNDRED;
use chrono::{Datelike, NaiveDate, Timelike, Weekday};
use configuration::{AnalyticsSettings, RiskRewardFallback};
use core_types::{Direction, Trade, TradeResult};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Returns within this many percentage points of zero count as breakeven.
pub const BREAKEVEN_THRESHOLD_PERCENT: Decimal = dec!(0.01);

/// Share of the realised move assumed to have been risked when a trade has no
/// planned stop and target.
const ASSUMED_RISK_SHARE: Decimal = dec!(0.5);

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Values derived from a single trade. Always computed fresh, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeMetrics {
    /// Signed percent return, positive when the trade made money in its direction.
    pub trade_return_percent: Decimal,
    /// Planned (or assumed) reward over risk. `None` when the configured fallback
    /// leaves it undefined.
    pub risk_reward_ratio: Option<Decimal>,
    pub result: TradeResult,
    pub trade_duration_minutes: i64,
    /// Calendar decomposition of the entry time in the configured UTC offset.
    pub entry_date: NaiveDate,
    pub entry_day_of_week: Weekday,
    pub entry_hour: u32,
}

pub fn calculate_trade_metrics(trade: &Trade, settings: &AnalyticsSettings) -> TradeMetrics {
    let trade_return_percent =
        trade_return_percent(trade.direction, trade.entry_price, trade.exit_price);
    let local_entry = trade.entry_time.with_timezone(&settings.utc_offset());

    TradeMetrics {
        trade_return_percent,
        risk_reward_ratio: risk_reward_ratio(trade, settings.risk_reward_fallback),
        result: classify_result(trade_return_percent),
        trade_duration_minutes: duration_minutes(trade),
        entry_date: local_entry.date_naive(),
        entry_day_of_week: local_entry.weekday(),
        entry_hour: local_entry.hour(),
    }
}

/// Percent return of a move from `entry_price` to `exit_price`, from the point of
/// view of the given direction: shorts profit when the price falls.
pub fn trade_return_percent(direction: Direction, entry_price: Decimal, exit_price: Decimal) -> Decimal {
    if entry_price.is_zero() {
        return Decimal::ZERO;
    }
    let move_in_favour = match direction {
        Direction::Long => exit_price - entry_price,
        Direction::Short => entry_price - exit_price,
    };
    move_in_favour / entry_price * HUNDRED
}

pub fn risk_reward_ratio(trade: &Trade, fallback: RiskRewardFallback) -> Option<Decimal> {
    let entry = trade.entry_price;

    match (trade.stop_loss, trade.take_profit) {
        (Some(stop_loss), Some(take_profit)) => {
            let risk = (entry - stop_loss).abs();
            let reward = (take_profit - entry).abs();
            Some(ratio(reward, risk))
        }
        _ => match fallback {
            RiskRewardFallback::AssumedTwoToOne => {
                let reward = (trade.exit_price - entry).abs();
                Some(ratio(reward, reward * ASSUMED_RISK_SHARE))
            }
            RiskRewardFallback::Undefined => None,
        },
    }
}

fn ratio(reward: Decimal, risk: Decimal) -> Decimal {
    if risk.is_zero() {
        Decimal::ZERO
    } else {
        reward / risk
    }
}

pub fn classify_result(return_percent: Decimal) -> TradeResult {
    if return_percent > BREAKEVEN_THRESHOLD_PERCENT {
        TradeResult::Win
    } else if return_percent < -BREAKEVEN_THRESHOLD_PERCENT {
        TradeResult::Loss
    } else {
        TradeResult::Breakeven
    }
}

/// Time in the market in whole minutes, half a minute rounding up.
pub fn duration_minutes(trade: &Trade) -> i64 {
    let millis = (trade.exit_time - trade.entry_time).num_milliseconds();
    (millis + MILLIS_PER_MINUTE / 2).div_euclid(MILLIS_PER_MINUTE)
}
