//! OHLCV bar representation.

use chrono::NaiveDate;

use crate::domain::error::LutraderError;

#[derive(Debug, Clone)]
pub struct OhlcvBar {
    pub code: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl OhlcvBar {
    /// Reject bars with non-finite price fields before they reach the
    /// indicator engine. Volume is integral and always finite.
    pub fn validate(&self) -> Result<(), LutraderError> {
        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(LutraderError::MalformedBar {
                    date: self.date,
                    field,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> OhlcvBar {
        OhlcvBar {
            code: "300863".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 105.0,
            volume: 50_000,
        }
    }

    #[test]
    fn valid_bar_passes() {
        assert!(sample_bar().validate().is_ok());
    }

    #[test]
    fn nan_close_rejected() {
        let mut bar = sample_bar();
        bar.close = f64::NAN;
        let err = bar.validate().unwrap_err();
        assert!(matches!(
            err,
            LutraderError::MalformedBar { field: "close", .. }
        ));
    }

    #[test]
    fn infinite_high_rejected() {
        let mut bar = sample_bar();
        bar.high = f64::INFINITY;
        let err = bar.validate().unwrap_err();
        assert!(matches!(
            err,
            LutraderError::MalformedBar { field: "high", .. }
        ));
    }
}
