//! Suspected top windmill: a bearish candle on heavy volume with J above
//! 70. Less confirmation than the standard windmill, so it trims half the
//! position instead of closing it.

use std::collections::BTreeMap;

use crate::domain::signal::{Signal, SignalKind};
use crate::domain::strategy::{SellRule, SignalContext};

pub const NAME: &str = "suspected_top_windmill";

const VOL_MA10_FACTOR: f64 = 1.3;

#[derive(Debug, Clone, Copy)]
pub struct SuspectedTopWindmillRule;

impl SellRule for SuspectedTopWindmillRule {
    fn name(&self) -> &'static str {
        NAME
    }

    fn check_signal(&self, ctx: &SignalContext) -> Option<Signal> {
        let position = ctx.position?;
        let i = ctx.index();
        let bar = ctx.bar();
        let volume = bar.volume as f64;
        let kdj_j = ctx.kdj_today().map(|p| p.j);

        let is_bearish = bar.close < bar.open;
        let volume_vs_ma10 = ctx.vol_ma10[i].is_some_and(|ma| volume >= VOL_MA10_FACTOR * ma);
        let j_stretched = kdj_j.is_some_and(|j| j > 70.0);

        if !(is_bearish && volume_vs_ma10 && j_stretched) {
            return None;
        }

        let size = position.size / 2;
        if size <= 0 {
            return None;
        }

        let mut conditions = BTreeMap::new();
        conditions.insert("is_bearish", is_bearish);
        conditions.insert("volume_ge_130pct_ma10", volume_vs_ma10);
        conditions.insert("kdj_j_gt_70", j_stretched);

        let mut metrics = BTreeMap::new();
        metrics.insert("duokong_line", ctx.duokong_line[i]);
        metrics.insert("volume", volume);
        metrics.insert("volume_ma10", ctx.vol_ma10[i].unwrap_or(f64::NAN));
        metrics.insert("kdj_j", kdj_j.unwrap_or(f64::NAN));

        Some(Signal {
            kind: SignalKind::SellHalf,
            strategy_name: NAME,
            price: bar.close,
            size,
            date: bar.date,
            conditions,
            metrics,
        })
    }
}
