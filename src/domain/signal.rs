//! Trade signal emitted by a strategy rule.

use chrono::NaiveDate;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Buy,
    SellFull,
    SellHalf,
}

impl SignalKind {
    pub fn is_buy(&self) -> bool {
        matches!(self, SignalKind::Buy)
    }

    pub fn is_sell(&self) -> bool {
        !self.is_buy()
    }
}

/// One emitted trade signal, at most one per bar.
///
/// `conditions` records the outcome of every sub-condition the rule
/// evaluated; `metrics` carries the auxiliary values behind them.
#[derive(Debug, Clone)]
pub struct Signal {
    pub kind: SignalKind,
    pub strategy_name: &'static str,
    pub price: f64,
    pub size: i64,
    pub date: NaiveDate,
    pub conditions: BTreeMap<&'static str, bool>,
    pub metrics: BTreeMap<&'static str, f64>,
}
