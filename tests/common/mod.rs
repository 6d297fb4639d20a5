//! Shared helpers for integration tests.

use chrono::NaiveDate;
use lutrader::domain::error::LutraderError;
use lutrader::domain::ohlcv::OhlcvBar;
use lutrader::ports::data_port::DataPort;
use std::collections::HashMap;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn day(offset: usize) -> NaiveDate {
    date(2024, 1, 1) + chrono::Days::new(offset as u64)
}

pub fn bar(
    code: &str,
    offset: usize,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: i64,
) -> OhlcvBar {
    OhlcvBar {
        code: code.to_string(),
        date: day(offset),
        open,
        high,
        low,
        close,
        volume,
    }
}

/// 120-bar series engineered to round-trip exactly one trade: a long
/// uptrend, a two-bar washout that trips the reversal buy on bar 101, a
/// quiet recovery rally, and a blow-off reversal candle on bar 118 that
/// trips the standard windmill exit.
pub fn synthetic_cycle_series(code: &str) -> Vec<OhlcvBar> {
    let mut bars = Vec::with_capacity(120);

    // steady uptrend on slowly fading volume
    for k in 0..100usize {
        let c = 100.0 + k as f64;
        bars.push(bar(
            code,
            k,
            c - 0.5,
            c + 1.0,
            c - 1.0,
            c,
            50_000 - 100 * k as i64,
        ));
    }

    // two-bar washout; J collapses while the structure stays long
    bars.push(bar(code, 100, 198.0, 198.5, 192.0, 193.0, 40_000));
    bars.push(bar(code, 101, 192.0, 192.5, 185.0, 186.0, 39_900));

    // drift along the bottom
    bars.push(bar(code, 102, 185.5, 186.0, 180.5, 181.0, 39_800));
    bars.push(bar(code, 103, 181.0, 182.0, 180.0, 181.5, 39_700));
    bars.push(bar(code, 104, 181.5, 182.5, 180.8, 182.0, 39_600));
    for k in 105..110usize {
        bars.push(bar(code, k, 181.9, 182.8, 181.3, 182.2, 39_500));
    }

    // recovery rally that stretches J back up
    for k in 110..118usize {
        let c = 184.0 + 2.0 * (k - 110) as f64;
        bars.push(bar(code, k, c - 1.5, c + 1.0, c - 1.0, c, 39_000));
    }

    // blow-off reversal: bearish, long shadows, volume spike
    bars.push(bar(code, 118, 199.0, 203.0, 189.5, 191.0, 90_000));
    bars.push(bar(code, 119, 191.0, 192.0, 190.5, 191.5, 30_000));

    bars
}

/// In-memory data port keyed by symbol.
pub struct MockDataPort {
    data: HashMap<String, Vec<OhlcvBar>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        MockDataPort {
            data: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(code.to_string(), bars);
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, LutraderError> {
        let bars = self.data.get(code).ok_or_else(|| LutraderError::Data {
            reason: format!("no data for {}", code),
        })?;
        Ok(bars
            .iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .cloned()
            .collect())
    }

    fn list_symbols(&self) -> Result<Vec<String>, LutraderError> {
        let mut codes: Vec<String> = self.data.keys().cloned().collect();
        codes.sort();
        Ok(codes)
    }
}
