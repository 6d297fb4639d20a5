//! Single-symbol scan: feed every bar through the indicator engine,
//! consult the signal generator inside the execute window, and route
//! emitted signals through the broker into the trade statistics.

use chrono::NaiveDate;

use crate::domain::error::LutraderError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::engine::IndicatorEngine;
use crate::domain::generator::SignalGenerator;
use crate::domain::position::Position;
use crate::domain::signal::Signal;
use crate::domain::stats::{StatsSummary, TradeStats};
use crate::domain::strategy::{RuleParams, SignalContext, StrategyRegistry};
use crate::ports::broker_port::{BrokerEvent, BrokerPort};

pub const DEFAULT_INITIAL_CASH: f64 = 500_000.0;

/// Everything a single-symbol run needs besides the bars and a broker.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub lookback_n: usize,
    pub ma60_slope_days: usize,
    pub commission_rate: f64,
    pub initial_cash: f64,
    /// Inclusive window outside of which no signals are evaluated;
    /// indicators still warm up on every bar.
    pub execute_start: Option<NaiveDate>,
    pub execute_end: Option<NaiveDate>,
    pub buy_rule: String,
    pub sell_rules: Vec<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            lookback_n: 25,
            ma60_slope_days: 10,
            commission_rate: 0.0002,
            initial_cash: DEFAULT_INITIAL_CASH,
            execute_start: None,
            execute_end: None,
            buy_rule: "B1".to_string(),
            sell_rules: vec![
                "close_below_duokong".to_string(),
                "standard_top_windmill".to_string(),
                "suspected_top_windmill".to_string(),
            ],
        }
    }
}

impl RunConfig {
    pub fn rule_params(&self) -> RuleParams {
        RuleParams {
            lookback_n: self.lookback_n,
            ma60_slope_days: self.ma60_slope_days,
            commission_rate: self.commission_rate,
        }
    }

    fn in_execute_window(&self, date: NaiveDate) -> bool {
        if let Some(start) = self.execute_start {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.execute_end {
            if date > end {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone)]
pub struct RunResult {
    pub signals: Vec<Signal>,
    pub stats: StatsSummary,
    pub open_position: Option<Position>,
    pub final_cash: f64,
}

pub fn run_scan(
    code: &str,
    bars: &[OhlcvBar],
    config: &RunConfig,
    broker: &mut dyn BrokerPort,
) -> Result<RunResult, LutraderError> {
    if bars.is_empty() {
        return Err(LutraderError::NoData {
            code: code.to_string(),
        });
    }

    let registry = StrategyRegistry::with_builtins();
    let generator = SignalGenerator::from_config(
        &registry,
        &config.rule_params(),
        &config.buy_rule,
        &config.sell_rules,
    )?;

    let mut engine = IndicatorEngine::new();
    let mut stats = TradeStats::new();
    let mut signals = Vec::new();

    for bar in bars {
        bar.validate()?;
        engine.update(bar.clone());

        if !config.in_execute_window(bar.date) {
            continue;
        }

        let position = broker.position().cloned();
        let ctx = SignalContext::from_engine(&engine, position.as_ref(), broker.cash());
        let Some(signal) = generator.check(&ctx) else {
            continue;
        };

        for event in broker.submit(&signal) {
            match event {
                BrokerEvent::Fill(fill) => stats.on_fill(&fill),
                BrokerEvent::TradeClosed(notice) => stats.on_trade_closed(&notice),
            }
        }
        signals.push(signal);
    }

    stats.record_open_entry();

    Ok(RunResult {
        signals,
        stats: stats.summary(),
        open_position: broker.position().cloned(),
        final_cash: broker.cash(),
    })
}
