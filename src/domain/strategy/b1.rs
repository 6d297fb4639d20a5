//! B1 reversal buy rule.
//!
//! Buys when a washed-out oscillator (J <= 14) coincides with a price that
//! is still structurally long: close above the duokong line, a recent close
//! above the trend line, a fading volume MA since the last volume peak, a
//! rising MA60, and the trend line itself above the duokong line.

use std::collections::BTreeMap;

use crate::domain::signal::{Signal, SignalKind};
use crate::domain::slope::least_squares_slope;
use crate::domain::strategy::{BuyRule, RuleParams, SignalContext};

pub const NAME: &str = "B1";

const LOT_SIZE: i64 = 100;

#[derive(Debug, Clone)]
pub struct B1Rule {
    params: RuleParams,
}

impl B1Rule {
    pub fn new(params: RuleParams) -> Self {
        B1Rule { params }
    }

    /// Offset (1..=lookback) of the maximum-volume bar in the trailing
    /// window. Ties resolve to the least-recent bar.
    fn max_volume_offset(&self, ctx: &SignalContext) -> usize {
        let i = ctx.index();
        let mut best_offset = 1;
        let mut best_volume = i64::MIN;
        for offset in 1..=self.params.lookback_n {
            let volume = ctx.bars[i - offset].volume;
            if volume >= best_volume {
                best_volume = volume;
                best_offset = offset;
            }
        }
        best_offset
    }
}

impl BuyRule for B1Rule {
    fn name(&self) -> &'static str {
        NAME
    }

    fn check_signal(&self, ctx: &SignalContext) -> Option<Signal> {
        let i = ctx.index();
        let bar = ctx.bar();
        let kdj_j = ctx.kdj_today().map(|p| p.j);

        let cond1 = kdj_j.is_some_and(|j| j <= 14.0);
        let cond2 = bar.close > ctx.duokong_line[i];

        // Conditions over the trailing window exclude the current bar and
        // stay false until a full window of history exists.
        let (cond3, cond4, vol_ma5_slope) = if i >= self.params.lookback_n {
            let cond3 = (1..=self.params.lookback_n)
                .any(|offset| ctx.bars[i - offset].close > ctx.trend_line[i - offset]);

            let t = self.max_volume_offset(ctx);
            let (cond4, slope) = if i + 1 >= t + 4 {
                let values: Option<Vec<f64>> = (1..=t)
                    .rev()
                    .map(|offset| ctx.vol_ma5[i - offset])
                    .collect();
                match values {
                    Some(values) => {
                        let slope = least_squares_slope(&values);
                        (slope < 0.0, slope)
                    }
                    None => (false, 0.0),
                }
            } else {
                (false, 0.0)
            };

            (cond3, cond4, slope)
        } else {
            (false, false, 0.0)
        };

        let days = self.params.ma60_slope_days;
        let (cond5, ma60_slope) = if i + 1 >= days {
            let values: Vec<f64> = (0..days).rev().map(|offset| ctx.ma60[i - offset]).collect();
            let slope = least_squares_slope(&values);
            (slope > 0.0, slope)
        } else {
            (false, 0.0)
        };

        let cond6 = ctx.trend_line[i] > ctx.duokong_line[i];

        if !(cond1 && cond2 && cond3 && cond4 && cond5 && cond6) {
            return None;
        }

        // All-in sizing, rounded down to whole lots, commission reserved.
        let max_cost = ctx.cash / (1.0 + self.params.commission_rate);
        let size = (max_cost / bar.close / LOT_SIZE as f64) as i64 * LOT_SIZE;
        if size <= 0 {
            return None;
        }

        let mut conditions = BTreeMap::new();
        conditions.insert("kdj_j_le_14", cond1);
        conditions.insert("close_above_duokong", cond2);
        conditions.insert("close_above_trend_history", cond3);
        conditions.insert("vol_ma5_slope_lt_0", cond4);
        conditions.insert("ma60_slope_gt_0", cond5);
        conditions.insert("trend_above_duokong", cond6);

        let mut metrics = BTreeMap::new();
        metrics.insert("kdj_j", kdj_j.unwrap_or(f64::NAN));
        metrics.insert("duokong_line", ctx.duokong_line[i]);
        metrics.insert("ma60_slope", ma60_slope);
        metrics.insert("vol_ma5_slope", vol_ma5_slope);

        Some(Signal {
            kind: SignalKind::Buy,
            strategy_name: NAME,
            price: bar.close,
            size,
            date: bar.date,
            conditions,
            metrics,
        })
    }
}
