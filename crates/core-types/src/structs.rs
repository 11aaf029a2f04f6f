use crate::enums::Direction;
use crate::error::CoreError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single closed trade as recorded in the journal.
///
/// Trades are supplied by whatever persistence layer sits in front of the
/// analytics engine and are never mutated by it. The serialized form uses the
/// journal's camelCase export layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: String,
    pub symbol: String,
    pub direction: Direction,
    pub entry_price: Decimal,
    pub exit_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_size: Option<Decimal>,
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<Decimal>,
    #[serde(default)]
    pub strategy_tag: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub screenshots: Vec<String>,
    /// Self-reported emotional state, 1 (worst) to 5 (best).
    pub emotion_score: u8,
    /// Self-reported rule adherence, 1 (worst) to 5 (best).
    pub discipline_score: u8,
    #[serde(default)]
    pub exclude_from_stats: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Trade {
    /// Creates a trade with neutral psychology scores and no optional fields set.
    pub fn new(
        id: impl Into<String>,
        symbol: impl Into<String>,
        direction: Direction,
        entry_price: Decimal,
        exit_price: Decimal,
        entry_time: DateTime<Utc>,
        exit_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            direction,
            entry_price,
            exit_price,
            position_size: None,
            entry_time,
            exit_time,
            stop_loss: None,
            take_profit: None,
            strategy_tag: String::new(),
            notes: String::new(),
            screenshots: Vec::new(),
            emotion_score: 3,
            discipline_score: 3,
            exclude_from_stats: false,
            created_at: None,
            updated_at: None,
        }
    }

    /// Sets the planned stop-loss and take-profit levels.
    pub fn with_stops(mut self, stop_loss: Decimal, take_profit: Decimal) -> Self {
        self.stop_loss = Some(stop_loss);
        self.take_profit = Some(take_profit);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn excluded(mut self) -> Self {
        self.exclude_from_stats = true;
        self
    }

    /// Checks the record against the contract the analytics engine assumes.
    ///
    /// The engine itself never calls this; it is meant for whatever layer
    /// accepts trades from the outside world.
    pub fn validate(&self) -> Result<(), CoreError> {
        let positive = |field: &str, value: Decimal| {
            if value <= Decimal::ZERO {
                Err(CoreError::InvalidInput(
                    field.to_string(),
                    format!("must be greater than 0, got {value}"),
                ))
            } else {
                Ok(())
            }
        };

        positive("entryPrice", self.entry_price)?;
        positive("exitPrice", self.exit_price)?;
        if let Some(size) = self.position_size {
            positive("positionSize", size)?;
        }
        if let Some(stop_loss) = self.stop_loss {
            positive("stopLoss", stop_loss)?;
        }
        if let Some(take_profit) = self.take_profit {
            positive("takeProfit", take_profit)?;
        }

        if self.exit_time < self.entry_time {
            return Err(CoreError::InvalidInput(
                "exitTime".to_string(),
                format!("{} is before entryTime {}", self.exit_time, self.entry_time),
            ));
        }

        for (field, score) in [
            ("emotionScore", self.emotion_score),
            ("disciplineScore", self.discipline_score),
        ] {
            if !(1..=5).contains(&score) {
                return Err(CoreError::InvalidInput(
                    field.to_string(),
                    format!("must be between 1 and 5, got {score}"),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn sample() -> Trade {
        Trade::new(
            "t-1",
            "EURUSD",
            Direction::Long,
            dec!(1.1000),
            dec!(1.1050),
            Utc.with_ymd_and_hms(2024, 3, 4, 9, 30, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 4, 11, 0, 0).unwrap(),
        )
    }

    #[test]
    fn deserializes_journal_export_layout() {
        let json = r#"{
            "id": "demo-0-1",
            "symbol": "GBPUSD",
            "direction": "short",
            "entryPrice": 1.25,
            "exitPrice": "1.24",
            "entryTime": "2024-03-04T09:30:00.000Z",
            "exitTime": "2024-03-04T10:15:00Z",
            "stopLoss": 1.26,
            "strategyTag": "Breakout",
            "notes": "faded the open",
            "emotionScore": 4,
            "disciplineScore": 5,
            "excludeFromStats": false,
            "createdAt": "2024-03-04T09:30:00Z",
            "updatedAt": "2024-03-04T09:30:00Z"
        }"#;

        let trade: Trade = serde_json::from_str(json).unwrap();
        assert_eq!(trade.direction, Direction::Short);
        assert_eq!(trade.entry_price, dec!(1.25));
        assert_eq!(trade.exit_price, dec!(1.24));
        assert_eq!(trade.stop_loss, Some(dec!(1.26)));
        assert_eq!(trade.take_profit, None);
        assert_eq!(trade.strategy_tag, "Breakout");
        assert!(trade.screenshots.is_empty());
        assert!(trade.validate().is_ok());
    }

    #[test]
    fn validate_rejects_non_positive_prices() {
        let mut trade = sample();
        trade.exit_price = Decimal::ZERO;
        let err = trade.validate().unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidInput("exitPrice".into(), "must be greater than 0, got 0".into())
        );
    }

    #[test]
    fn validate_rejects_exit_before_entry() {
        let mut trade = sample();
        trade.exit_time = trade.entry_time - chrono::Duration::minutes(1);
        assert!(matches!(
            trade.validate(),
            Err(CoreError::InvalidInput(field, _)) if field == "exitTime"
        ));
    }

    #[test]
    fn validate_rejects_out_of_range_scores() {
        let mut trade = sample();
        trade.discipline_score = 6;
        assert!(matches!(
            trade.validate(),
            Err(CoreError::InvalidInput(field, _)) if field == "disciplineScore"
        ));
    }

    #[test]
    fn opposite_direction_flips() {
        assert_eq!(Direction::Long.opposite(), Direction::Short);
        assert_eq!(Direction::Short.opposite(), Direction::Long);
    }
}
