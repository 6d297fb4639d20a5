//! Strategy rules: the per-bar evaluation context, the buy/sell rule
//! capability traits, and the closed name registry.

pub mod b1;
pub mod close_below_duokong;
pub mod standard_top_windmill;
pub mod suspected_top_windmill;

use crate::domain::engine::IndicatorEngine;
use crate::domain::error::LutraderError;
use crate::domain::indicator::kdj::KdjPoint;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::position::Position;
use crate::domain::signal::Signal;

/// Immutable per-bar view handed to every rule.
///
/// All series are aligned with `bars`; the current bar is the last element.
/// Built only after the engine has ingested at least one bar.
#[derive(Debug, Clone, Copy)]
pub struct SignalContext<'a> {
    pub bars: &'a [OhlcvBar],
    pub trend_line: &'a [f64],
    pub duokong_line: &'a [f64],
    pub ma60: &'a [f64],
    pub kdj: &'a [Option<KdjPoint>],
    pub vol_ma5: &'a [Option<f64>],
    pub vol_ma10: &'a [Option<f64>],
    pub position: Option<&'a Position>,
    pub cash: f64,
}

impl<'a> SignalContext<'a> {
    pub fn from_engine(
        engine: &'a IndicatorEngine,
        position: Option<&'a Position>,
        cash: f64,
    ) -> Self {
        debug_assert!(!engine.is_empty());
        SignalContext {
            bars: engine.bars(),
            trend_line: engine.trend_line(),
            duokong_line: engine.duokong_line(),
            ma60: engine.ma60(),
            kdj: engine.kdj(),
            vol_ma5: engine.vol_ma5(),
            vol_ma10: engine.vol_ma10(),
            position,
            cash,
        }
    }

    /// Index of the current bar.
    pub fn index(&self) -> usize {
        self.bars.len() - 1
    }

    pub fn bar(&self) -> &OhlcvBar {
        &self.bars[self.index()]
    }

    pub fn kdj_today(&self) -> Option<KdjPoint> {
        self.kdj[self.index()]
    }
}

/// Buy-side rule capability.
pub trait BuyRule {
    fn name(&self) -> &'static str;

    /// Evaluate the current bar; `Some` when every entry condition holds
    /// and a positive lot-rounded size results.
    fn check_signal(&self, ctx: &SignalContext) -> Option<Signal>;
}

/// Sell-side rule capability.
pub trait SellRule {
    fn name(&self) -> &'static str;

    fn check_signal(&self, ctx: &SignalContext) -> Option<Signal>;
}

/// Construction-time parameters shared by rule variants.
#[derive(Debug, Clone)]
pub struct RuleParams {
    pub lookback_n: usize,
    pub ma60_slope_days: usize,
    pub commission_rate: f64,
}

impl Default for RuleParams {
    fn default() -> Self {
        RuleParams {
            lookback_n: 25,
            ma60_slope_days: 10,
            commission_rate: 0.0002,
        }
    }
}

/// Closed set of buy rule variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuyRuleKind {
    B1,
}

impl BuyRuleKind {
    pub fn name(self) -> &'static str {
        match self {
            BuyRuleKind::B1 => b1::NAME,
        }
    }

    pub fn build(self, params: &RuleParams) -> Box<dyn BuyRule> {
        match self {
            BuyRuleKind::B1 => Box::new(b1::B1Rule::new(params.clone())),
        }
    }
}

/// Closed set of sell rule variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SellRuleKind {
    CloseBelowDuokong,
    StandardTopWindmill,
    SuspectedTopWindmill,
}

impl SellRuleKind {
    pub fn name(self) -> &'static str {
        match self {
            SellRuleKind::CloseBelowDuokong => close_below_duokong::NAME,
            SellRuleKind::StandardTopWindmill => standard_top_windmill::NAME,
            SellRuleKind::SuspectedTopWindmill => suspected_top_windmill::NAME,
        }
    }

    pub fn build(self) -> Box<dyn SellRule> {
        match self {
            SellRuleKind::CloseBelowDuokong => {
                Box::new(close_below_duokong::CloseBelowDuokongRule)
            }
            SellRuleKind::StandardTopWindmill => {
                Box::new(standard_top_windmill::StandardTopWindmillRule)
            }
            SellRuleKind::SuspectedTopWindmill => {
                Box::new(suspected_top_windmill::SuspectedTopWindmillRule)
            }
        }
    }
}

/// Name-to-variant table, built once at startup. Lookup of an unregistered
/// name is fatal at construction time.
#[derive(Debug, Clone)]
pub struct StrategyRegistry {
    buy: Vec<BuyRuleKind>,
    sell: Vec<SellRuleKind>,
}

impl StrategyRegistry {
    pub fn with_builtins() -> Self {
        StrategyRegistry {
            buy: vec![BuyRuleKind::B1],
            sell: vec![
                SellRuleKind::CloseBelowDuokong,
                SellRuleKind::StandardTopWindmill,
                SellRuleKind::SuspectedTopWindmill,
            ],
        }
    }

    pub fn buy_rule(
        &self,
        name: &str,
        params: &RuleParams,
    ) -> Result<Box<dyn BuyRule>, LutraderError> {
        self.buy
            .iter()
            .find(|kind| kind.name() == name)
            .map(|kind| kind.build(params))
            .ok_or_else(|| LutraderError::UnknownStrategy {
                kind: "buy",
                name: name.to_string(),
            })
    }

    pub fn sell_rule(&self, name: &str) -> Result<Box<dyn SellRule>, LutraderError> {
        self.sell
            .iter()
            .find(|kind| kind.name() == name)
            .map(|kind| kind.build())
            .ok_or_else(|| LutraderError::UnknownStrategy {
                kind: "sell",
                name: name.to_string(),
            })
    }

    pub fn buy_names(&self) -> Vec<&'static str> {
        self.buy.iter().map(|k| k.name()).collect()
    }

    pub fn sell_names(&self) -> Vec<&'static str> {
        self.sell.iter().map(|k| k.name()).collect()
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;
    use chrono::NaiveDate;

    /// Owns every series a [`SignalContext`] borrows, so rule tests can
    /// fabricate exactly the bar-aligned values they need.
    pub struct ContextFixture {
        pub bars: Vec<OhlcvBar>,
        pub trend_line: Vec<f64>,
        pub duokong_line: Vec<f64>,
        pub ma60: Vec<f64>,
        pub kdj: Vec<Option<KdjPoint>>,
        pub vol_ma5: Vec<Option<f64>>,
        pub vol_ma10: Vec<Option<f64>>,
        pub position: Option<Position>,
        pub cash: f64,
    }

    impl ContextFixture {
        /// `n` bars of neutral defaults: flat closes at 100, trend/duokong
        /// below price, undefined KDJ, flat volume averages.
        pub fn new(n: usize) -> Self {
            let bars = (0..n)
                .map(|i| OhlcvBar {
                    code: "TEST".into(),
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                        + chrono::Days::new(i as u64),
                    open: 99.5,
                    high: 101.0,
                    low: 99.0,
                    close: 100.0,
                    volume: 1_000,
                })
                .collect();
            ContextFixture {
                bars,
                trend_line: vec![95.0; n],
                duokong_line: vec![90.0; n],
                ma60: vec![80.0; n],
                kdj: vec![None; n],
                vol_ma5: vec![Some(1_000.0); n],
                vol_ma10: vec![Some(1_000.0); n],
                position: None,
                cash: 100_000.0,
            }
        }

        pub fn with_position(mut self, size: i64) -> Self {
            self.position = Some(Position {
                size,
                entry_price: 90.0,
                entry_date: self.bars[0].date,
            });
            self
        }

        pub fn set_kdj(&mut self, index: usize, k: f64, d: f64) {
            self.kdj[index] = Some(KdjPoint {
                k,
                d,
                j: 3.0 * k - 2.0 * d,
            });
        }

        pub fn set_j(&mut self, index: usize, j: f64) {
            // pick k = d = j so that 3k - 2d = j
            self.kdj[index] = Some(KdjPoint { k: j, d: j, j });
        }

        pub fn ctx(&self) -> SignalContext<'_> {
            SignalContext {
                bars: &self.bars,
                trend_line: &self.trend_line,
                duokong_line: &self.duokong_line,
                ma60: &self.ma60,
                kdj: &self.kdj,
                vol_ma5: &self.vol_ma5,
                vol_ma10: &self.vol_ma10,
                position: self.position.as_ref(),
                cash: self.cash,
            }
        }
    }
}
