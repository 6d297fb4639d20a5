//! Data access port trait.

use crate::domain::error::LutraderError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Bars for one symbol within the inclusive date range, oldest first.
    fn fetch_ohlcv(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, LutraderError>;

    fn list_symbols(&self) -> Result<Vec<String>, LutraderError>;
}
