use crate::input::{CalculatorInput, ContributionType, ReturnPeriod};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

const HUNDRED: Decimal = dec!(100);
const MONTHS_PER_YEAR: u64 = 12;
const DAYS_PER_WEEK: u64 = 7;
/// Weekly periods are mapped onto the calendar with 30-day months.
const DAYS_PER_MONTH: u64 = 30;
const MONTHS_PER_QUARTER: u64 = 3;

/// Balance snapshot after a number of completed periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectoryPoint {
    /// Approximate calendar position of the snapshot, in whole years and
    /// remaining months since the start.
    pub year: u32,
    pub month: u32,
    pub periods_completed: u32,
    pub balance: Decimal,
    /// Balance minus everything contributed plus everything withdrawn. Kept under
    /// both names for compatibility; it is cumulative, not per period.
    pub interest_earned: Decimal,
    pub cumulative_interest: Decimal,
    /// Growth produced by this period alone, before any contribution.
    pub period_interest: Decimal,
    pub total_contributed: Decimal,
    pub total_withdrawn: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorResult {
    pub input: CalculatorInput,
    pub final_balance: Decimal,
    pub total_interest_earned: Decimal,
    /// Contributions minus withdrawals, the principal included.
    pub total_principal_invested: Decimal,
    pub total_return_percent: Decimal,
    /// One point per period, preceded by the starting point.
    pub trajectory: Vec<TrajectoryPoint>,
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Calendar offset reached after `period` periods, as `(year, month)`.
pub fn calendar_offset(return_period: ReturnPeriod, period: u32) -> (u32, u32) {
    let period = u64::from(period);
    let months = match return_period {
        ReturnPeriod::Weekly => period * DAYS_PER_WEEK / DAYS_PER_MONTH,
        ReturnPeriod::Monthly => period,
        ReturnPeriod::Quarterly => period * MONTHS_PER_QUARTER,
        ReturnPeriod::Annually => period * MONTHS_PER_YEAR,
    };
    // The year count never exceeds `period`, so it always fits back into u32.
    let year = u32::try_from(months / MONTHS_PER_YEAR).unwrap_or(u32::MAX);
    (year, (months % MONTHS_PER_YEAR) as u32)
}

/// Projects the balance period by period.
///
/// Growth is applied first, then the contribution or withdrawal. Every
/// intermediate balance is rounded to cents and the rounded value is carried
/// into the next period. Withdrawals never take the balance below zero, but the
/// full requested amount still counts towards `total_withdrawn`.
///
/// Money arithmetic saturates at `Decimal::MAX`/`Decimal::MIN` instead of
/// overflowing, so runaway projections level off rather than abort.
#[tracing::instrument(skip_all, fields(periods = input.period_count, return_period = %input.return_period))]
pub fn simulate(input: &CalculatorInput) -> CalculatorResult {
    let growth_factor = Decimal::ONE + input.return_rate / HUNDRED;
    let amount = input.contribution();

    let mut balance = round2(input.principal);
    let mut total_contributed = balance;
    let mut total_withdrawn = Decimal::ZERO;

    let mut trajectory = Vec::with_capacity(input.period_count as usize + 1);
    trajectory.push(TrajectoryPoint {
        year: 0,
        month: 0,
        periods_completed: 0,
        balance,
        interest_earned: Decimal::ZERO,
        cumulative_interest: Decimal::ZERO,
        period_interest: Decimal::ZERO,
        total_contributed,
        total_withdrawn,
    });

    for period in 1..=input.period_count {
        let grown = round2(balance.saturating_mul(growth_factor));
        let period_interest = grown.saturating_sub(balance);
        balance = grown;

        if amount > Decimal::ZERO {
            match input.contribution_type {
                ContributionType::Addition => {
                    balance = balance.saturating_add(amount);
                    total_contributed = total_contributed.saturating_add(amount);
                }
                ContributionType::Withdrawal => {
                    balance = balance.saturating_sub(amount).max(Decimal::ZERO);
                    total_withdrawn = total_withdrawn.saturating_add(amount);
                }
                ContributionType::None => {}
            }
        }

        let (year, month) = calendar_offset(input.return_period, period);
        let interest = balance
            .saturating_sub(total_contributed)
            .saturating_add(total_withdrawn);
        tracing::trace!(period, %balance, %period_interest, "Period applied.");

        trajectory.push(TrajectoryPoint {
            year,
            month,
            periods_completed: period,
            balance,
            interest_earned: interest,
            cumulative_interest: interest,
            period_interest,
            total_contributed,
            total_withdrawn,
        });
    }

    let total_principal_invested = total_contributed.saturating_sub(total_withdrawn);
    let total_interest_earned = balance.saturating_sub(total_principal_invested);
    let total_return_percent = if total_principal_invested > Decimal::ZERO {
        total_interest_earned
            .checked_div(total_principal_invested)
            .and_then(|ratio| ratio.checked_mul(HUNDRED))
            .map_or(Decimal::MAX, round2)
    } else {
        Decimal::ZERO
    };

    tracing::debug!(final_balance = %balance, %total_return_percent, "Compound projection finished.");

    CalculatorResult {
        input: input.clone(),
        final_balance: balance,
        total_interest_earned,
        total_principal_invested,
        total_return_percent,
        trajectory,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monthly_compounding_rounds_every_step() {
        let input = CalculatorInput::new(dec!(10000), dec!(4), ReturnPeriod::Monthly, 12);
        let result = simulate(&input);

        assert_eq!(result.final_balance, dec!(16010.32));
        assert_eq!(result.total_interest_earned, dec!(6010.32));
        assert_eq!(result.total_principal_invested, dec!(10000));
        assert_eq!(result.total_return_percent, dec!(60.10));
        assert_eq!(result.trajectory.len(), 13);
        assert_eq!(result.trajectory[1].balance, dec!(10400.00));
        assert_eq!(result.trajectory[2].balance, dec!(10816.00));
        assert_eq!(result.trajectory[3].balance, dec!(11248.64));
        assert_eq!(result.trajectory[3].period_interest, dec!(432.64));
        assert_eq!(result.trajectory[12].cumulative_interest, dec!(6010.32));
        assert_eq!((result.trajectory[12].year, result.trajectory[12].month), (1, 0));
    }

    #[test]
    fn zero_periods_returns_the_principal() {
        let result = simulate(&CalculatorInput::new(dec!(5000), dec!(3), ReturnPeriod::Annually, 0));
        assert_eq!(result.final_balance, dec!(5000));
        assert_eq!(result.total_interest_earned, Decimal::ZERO);
        assert_eq!(result.total_return_percent, Decimal::ZERO);
        assert_eq!(result.trajectory.len(), 1);
        assert_eq!(result.trajectory[0].periods_completed, 0);
    }

    #[test]
    fn additions_grow_the_contributed_total() {
        let input = CalculatorInput::new(dec!(1000), dec!(10), ReturnPeriod::Monthly, 3).with_addition(dec!(100));
        let result = simulate(&input);

        let balances: Vec<Decimal> = result.trajectory.iter().skip(1).map(|p| p.balance).collect();
        assert_eq!(balances, vec![dec!(1200.00), dec!(1420.00), dec!(1662.00)]);
        assert_eq!(result.trajectory[2].period_interest, dec!(120.00));
        assert_eq!(result.trajectory[3].total_contributed, dec!(1300));
        assert_eq!(result.total_principal_invested, dec!(1300));
        assert_eq!(result.total_interest_earned, dec!(362.00));
        assert_eq!(result.total_return_percent, dec!(27.85));
    }

    #[test]
    fn withdrawals_floor_the_balance_at_zero() {
        let input = CalculatorInput::new(dec!(1000), dec!(5), ReturnPeriod::Monthly, 3).with_withdrawal(dec!(600));
        let result = simulate(&input);

        let balances: Vec<Decimal> = result.trajectory.iter().skip(1).map(|p| p.balance).collect();
        assert_eq!(balances, vec![dec!(450.00), dec!(0), dec!(0)]);
        assert_eq!(result.trajectory[3].total_withdrawn, dec!(1800));
        assert_eq!(result.total_principal_invested, dec!(-800));
        assert_eq!(result.total_return_percent, Decimal::ZERO);
    }

    #[test]
    fn contribution_without_a_type_is_ignored() {
        let mut input = CalculatorInput::new(dec!(1000), dec!(10), ReturnPeriod::Monthly, 1);
        input.contribution_amount = Some(dec!(500));
        assert_eq!(simulate(&input).final_balance, dec!(1100.00));
    }

    #[test]
    fn periods_map_onto_the_calendar() {
        assert_eq!(calendar_offset(ReturnPeriod::Weekly, 5), (0, 1));
        assert_eq!(calendar_offset(ReturnPeriod::Weekly, 52), (1, 0));
        assert_eq!(calendar_offset(ReturnPeriod::Monthly, 14), (1, 2));
        assert_eq!(calendar_offset(ReturnPeriod::Quarterly, 5), (1, 3));
        assert_eq!(calendar_offset(ReturnPeriod::Annually, 3), (3, 0));
    }

    #[test]
    fn calendar_offset_handles_the_largest_period_count() {
        assert_eq!(calendar_offset(ReturnPeriod::Quarterly, u32::MAX), (1_073_741_823, 9));
        assert_eq!(calendar_offset(ReturnPeriod::Weekly, u32::MAX), (83_513_252, 11));
        assert_eq!(calendar_offset(ReturnPeriod::Annually, u32::MAX), (u32::MAX, 0));
    }

    #[test]
    fn runaway_growth_saturates_instead_of_panicking() {
        let input = CalculatorInput::new(dec!(10000), dec!(100), ReturnPeriod::Monthly, 100);
        let result = simulate(&input);

        assert_eq!(result.trajectory.len(), 101);
        assert_eq!(result.final_balance, Decimal::MAX);
        assert!(result.trajectory.windows(2).all(|pair| pair[0].balance <= pair[1].balance));
        assert_eq!(result.trajectory[100].period_interest, Decimal::ZERO);
        assert_eq!(result.total_principal_invested, dec!(10000));
        assert!(result.total_return_percent > Decimal::ZERO);

        let with_additions = simulate(&input.clone().with_addition(dec!(1000000)));
        assert_eq!(with_additions.final_balance, Decimal::MAX);
    }

    #[test]
    fn long_moderate_projection_stays_exact() {
        let result = simulate(&CalculatorInput::new(dec!(10000), dec!(10), ReturnPeriod::Monthly, 600));
        assert_eq!(result.trajectory.len(), 601);
        assert!(result.final_balance < Decimal::MAX);
        assert_eq!(result.final_balance, result.final_balance.round_dp(2));
    }

    #[test]
    fn result_serializes_in_camel_case() {
        let result = simulate(&CalculatorInput::new(dec!(100), dec!(1), ReturnPeriod::Weekly, 1));
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("finalBalance").is_some());
        assert!(json["trajectory"][1].get("periodInterest").is_some());
    }
}
