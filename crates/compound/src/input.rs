use crate::error::CalculatorError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of one compounding period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ReturnPeriod {
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Annually,
}

impl fmt::Display for ReturnPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnPeriod::Weekly => write!(f, "weekly"),
            ReturnPeriod::Monthly => write!(f, "monthly"),
            ReturnPeriod::Quarterly => write!(f, "quarterly"),
            ReturnPeriod::Annually => write!(f, "annually"),
        }
    }
}

/// What happens to the balance at the end of every period, after growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ContributionType {
    #[default]
    None,
    Addition,
    Withdrawal,
}

impl fmt::Display for ContributionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContributionType::None => write!(f, "none"),
            ContributionType::Addition => write!(f, "addition"),
            ContributionType::Withdrawal => write!(f, "withdrawal"),
        }
    }
}

/// Parameters of a compound growth projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorInput {
    /// ISO currency code, used for display only.
    #[serde(default = "default_currency")]
    pub currency: String,
    pub principal: Decimal,
    /// Growth per period, in percent. May be negative.
    pub return_rate: Decimal,
    pub return_period: ReturnPeriod,
    pub period_count: u32,
    #[serde(default)]
    pub contribution_type: ContributionType,
    #[serde(default)]
    pub contribution_amount: Option<Decimal>,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl CalculatorInput {
    /// A plain projection with no contributions, in USD.
    pub fn new(principal: Decimal, return_rate: Decimal, return_period: ReturnPeriod, period_count: u32) -> Self {
        Self {
            currency: default_currency(),
            principal,
            return_rate,
            return_period,
            period_count,
            contribution_type: ContributionType::None,
            contribution_amount: None,
        }
    }

    pub fn with_addition(mut self, amount: Decimal) -> Self {
        self.contribution_type = ContributionType::Addition;
        self.contribution_amount = Some(amount);
        self
    }

    pub fn with_withdrawal(mut self, amount: Decimal) -> Self {
        self.contribution_type = ContributionType::Withdrawal;
        self.contribution_amount = Some(amount);
        self
    }

    /// The per-period amount to add or withdraw, zero when nothing applies.
    pub fn contribution(&self) -> Decimal {
        match self.contribution_type {
            ContributionType::None => Decimal::ZERO,
            _ => self.contribution_amount.unwrap_or_default(),
        }
    }

    /// Rejects inputs that would make the projection meaningless.
    /// `simulate` does not call this.
    pub fn validate(&self) -> Result<(), CalculatorError> {
        if self.principal <= Decimal::ZERO {
            return Err(CalculatorError::InvalidInput(
                "principal".to_string(),
                format!("must be greater than 0, got {}", self.principal),
            ));
        }

        match (self.contribution_type, self.contribution_amount) {
            (_, Some(amount)) if amount < Decimal::ZERO => Err(CalculatorError::InvalidInput(
                "contributionAmount".to_string(),
                format!("must not be negative, got {amount}"),
            )),
            (ContributionType::Addition | ContributionType::Withdrawal, None) => {
                Err(CalculatorError::InvalidInput(
                    "contributionAmount".to_string(),
                    format!("is required for a {} contribution", self.contribution_type),
                ))
            }
            _ => Ok(()),
        }
    }
}

/// Display symbol for a currency code. Unknown codes fall back to `$`.
pub fn currency_symbol(currency: &str) -> &'static str {
    match currency {
        "USD" => "$",
        "EUR" => "€",
        "TRY" => "₺",
        "GBP" => "£",
        "JPY" => "¥",
        "CHF" => "CHF",
        "CAD" => "C$",
        "AUD" => "A$",
        _ => "$",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn accepts_a_plain_projection() {
        let input = CalculatorInput::new(dec!(10000), dec!(4), ReturnPeriod::Monthly, 12);
        assert_eq!(input.validate(), Ok(()));
        assert_eq!(input.contribution(), Decimal::ZERO);
    }

    #[test]
    fn rejects_non_positive_principal() {
        let input = CalculatorInput::new(dec!(0), dec!(4), ReturnPeriod::Monthly, 12);
        assert!(matches!(
            input.validate(),
            Err(CalculatorError::InvalidInput(field, _)) if field == "principal"
        ));
    }

    #[test]
    fn contribution_amount_rules() {
        let base = CalculatorInput::new(dec!(1000), dec!(1), ReturnPeriod::Weekly, 4);

        let negative = base.clone().with_addition(dec!(-5));
        assert!(negative.validate().is_err());

        let mut missing = base.clone().with_withdrawal(dec!(10));
        missing.contribution_amount = None;
        assert!(missing.validate().is_err());

        // An amount with no contribution type is ignored, not rejected.
        let mut stray = base.clone();
        stray.contribution_amount = Some(dec!(50));
        assert_eq!(stray.validate(), Ok(()));
        assert_eq!(stray.contribution(), Decimal::ZERO);
    }

    #[test]
    fn deserializes_camel_case_with_defaults() {
        let json = r#"{
            "principal": "2500",
            "returnRate": "1.5",
            "returnPeriod": "quarterly",
            "periodCount": 8
        }"#;
        let input: CalculatorInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.currency, "USD");
        assert_eq!(input.return_period, ReturnPeriod::Quarterly);
        assert_eq!(input.contribution_type, ContributionType::None);
        assert_eq!(input.contribution_amount, None);
    }

    #[test]
    fn currency_symbols() {
        assert_eq!(currency_symbol("EUR"), "€");
        assert_eq!(currency_symbol("XYZ"), "$");
    }
}
