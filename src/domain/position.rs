//! Position state, read-only to strategy rules.

use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct Position {
    pub size: i64,
    pub entry_price: f64,
    pub entry_date: NaiveDate,
}

impl Position {
    pub fn market_value(&self, price: f64) -> f64 {
        self.size as f64 * price
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.size as f64 * (price - self.entry_price)
    }
}
